//! Design inspection.
//!
//! Reads computed styles of the main layout once, for the report. Nothing here
//! is asserted.

use crate::driver::PageDriver;
use crate::error::DriverResult;
use serde::{Deserialize, Serialize};

/// Key present in the design query's result object
pub(crate) const DESIGN_QUERY_MARKER: &str = "containerMaxWidth";

/// Read-only expression returning the [`DesignSnapshot`] fields
pub const DESIGN_QUERY: &str = r"(() => {
    const container = document.querySelector('.container');
    const header = document.querySelector('header');
    const input = document.querySelector('#itemInput');
    const style = (el) => (el ? getComputedStyle(el) : null);
    const c = style(container);
    const h = style(header);
    const i = style(input);
    return {
        containerMaxWidth: c ? c.maxWidth : '',
        containerBorderRadius: c ? c.borderRadius : '',
        hasShadow: !!c && c.boxShadow !== 'none',
        headerBg: h ? h.backgroundImage : '',
        inputBorder: i ? i.border : '',
        headerPadding: h ? h.padding : '',
        hasTransition: !!c && c.transition !== 'all 0s ease 0s',
        viewportWidth: window.innerWidth,
        containerWidth: container ? container.offsetWidth : 0,
        itemCount: document.querySelectorAll('.shopping-item').length,
    };
})()";

/// Fixed observations printed after the run
pub const DESIGN_NOTES: &[&str] = &[
    "모던한 그라데이션 헤더",
    "부드러운 그림자 효과 (박스 쉐도우)",
    "둥근 모서리 (border-radius: 20px)",
    "라이트/다크 모드 지원",
    "부드러운 전환 애니메이션",
    "반응형 디자인 (모바일 ~ 데스크톱)",
    "직관적인 체크박스 & 삭제 버튼",
    "호버 시 시각적 피드백",
    "깔끔한 통계 표시",
];

/// Fixed improvement suggestions printed after the run
pub const SUGGESTIONS: &[&str] = &[
    "드래그 앤 드롭으로 순서 변경 기능 추가 고려",
    "카테고리별 그룹핑 기능 추가 고려",
    "완료 항목 일괄 삭제 버튼 추가 고려",
    "아이템 수정 기능 추가 고려",
];

/// Computed layout and style facts of the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignSnapshot {
    /// `max-width` of the container
    pub container_max_width: String,
    /// `border-radius` of the container
    pub container_border_radius: String,
    /// Container has a box shadow
    pub has_shadow: bool,
    /// `background-image` of the header
    #[serde(rename = "headerBg")]
    pub header_background: String,
    /// `border` of the item input
    pub input_border: String,
    /// `padding` of the header
    pub header_padding: String,
    /// Container declares a transition
    pub has_transition: bool,
    /// `window.innerWidth`
    pub viewport_width: u32,
    /// Rendered container width
    pub container_width: u32,
    /// Number of rendered items
    pub item_count: usize,
}

impl DesignSnapshot {
    /// Whether the header background is a gradient
    #[must_use]
    pub fn has_gradient_header(&self) -> bool {
        self.header_background.contains("gradient")
    }
}

/// Evaluate [`DESIGN_QUERY`] on the current page
pub async fn inspect<D: PageDriver + ?Sized>(driver: &D) -> DriverResult<DesignSnapshot> {
    let value = driver.evaluate(DESIGN_QUERY).await?;
    let snapshot: DesignSnapshot = serde_json::from_value(value)?;
    tracing::debug!(?snapshot, "design snapshot");
    Ok(snapshot)
}

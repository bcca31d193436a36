//! The acceptance checks.
//!
//! Eighteen named checks, run in declaration order against one shared
//! [`Session`]. Page state accumulates: later checks rely on the items and
//! theme earlier checks left behind.

use crate::app::{self, selectors, Theme};
use crate::driver::PageDriver;
use crate::error::{CheckError, CheckResult};
use crate::locator::Locator;
use crate::session::{Expectation, Session, Submit};
use std::fmt;

/// Added with the add button
pub const BUTTON_ITEM: &str = "우유";

/// Added with the confirm key; also looked up in durable storage
pub const ENTER_ITEM: &str = "계란";

/// Added back to back
pub const BATCH_ITEMS: [&str; 3] = ["빵", "사과", "치즈"];

/// Whitespace-only input that must be rejected
pub const BLANK_INPUT: &str = "   ";

/// Markup that must be rendered as text
pub const MARKUP_INPUT: &str = "<script>alert(\"xss\")</script>";

/// Tag that must never appear live in the list
const LIVE_SCRIPT_TAG: &str = "<script>";

/// Section of the run a check or banner belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Item management
    Functional,
    /// Light/dark switching
    Theme,
    /// Durable storage and reload
    Persistence,
    /// Style inspection
    Design,
    /// Viewport sweep
    Responsive,
}

impl Phase {
    /// Banner text
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Functional => "📋 [기능 테스트]",
            Self::Theme => "🌙 [다크모드 테스트]",
            Self::Persistence => "💾 [localStorage 테스트]",
            Self::Design => "🎨 [디자인 검토]",
            Self::Responsive => "📱 [반응형 테스트]",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Functional => "Functional",
            Self::Theme => "Theme",
            Self::Persistence => "Persistence",
            Self::Design => "Design",
            Self::Responsive => "Responsive",
        };
        f.write_str(name)
    }
}

/// One named acceptance check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    /// Title names the app
    PageLoads,
    /// Fresh list renders empty
    EmptyListPlaceholder,
    /// Add with the button
    AddViaButton,
    /// Add with the confirm key
    AddViaEnter,
    /// Add three items in a row
    AddBatch,
    /// Statistics show the total
    TotalStatistic,
    /// First item gets checked
    CheckFirstItem,
    /// First item gets unchecked
    UncheckFirstItem,
    /// Three checked items are counted
    CheckThreeItems,
    /// Hover-revealed delete removes one item
    DeleteItem,
    /// Whitespace is not added
    RejectBlankInput,
    /// Markup is shown as text
    EscapeMarkup,
    /// Theme switch to dark
    SwitchToDark,
    /// Theme switch back to light
    SwitchToLight,
    /// Items reach durable storage
    ItemsPersisted,
    /// Theme reaches durable storage
    ThemePersisted,
    /// Items survive a reload
    ItemsSurviveReload,
    /// Theme survives a reload
    ThemeSurvivesReload,
}

impl Check {
    /// Every check, in run order
    pub const ALL: [Self; 18] = [
        Self::PageLoads,
        Self::EmptyListPlaceholder,
        Self::AddViaButton,
        Self::AddViaEnter,
        Self::AddBatch,
        Self::TotalStatistic,
        Self::CheckFirstItem,
        Self::UncheckFirstItem,
        Self::CheckThreeItems,
        Self::DeleteItem,
        Self::RejectBlankInput,
        Self::EscapeMarkup,
        Self::SwitchToDark,
        Self::SwitchToLight,
        Self::ItemsPersisted,
        Self::ThemePersisted,
        Self::ItemsSurviveReload,
        Self::ThemeSurvivesReload,
    ];

    /// Name shown in the report
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PageLoads => "페이지가 정상적으로 로드됨",
            Self::EmptyListPlaceholder => "빈 리스트에 안내 메시지 표시",
            Self::AddViaButton => "아이템 추가 (버튼 클릭): \"우유\"",
            Self::AddViaEnter => "아이템 추가 (Enter 키): \"계란\"",
            Self::AddBatch => "여러 아이템 추가: \"빵\", \"사과\", \"치즈\"",
            Self::TotalStatistic => "통계 표시 업데이트 (총 5개 항목)",
            Self::CheckFirstItem => "아이템 체크 기능 (첫 번째 아이템)",
            Self::UncheckFirstItem => "아이템 체크 해제 기능",
            Self::CheckThreeItems => "여러 아이템 체크 (3개)",
            Self::DeleteItem => "아이템 삭제 기능",
            Self::RejectBlankInput => "빈 문자열 입력 방지",
            Self::EscapeMarkup => "XSS 공격 방어 (<script> 태그)",
            Self::SwitchToDark => "다크모드 전환",
            Self::SwitchToLight => "라이트모드 복귀",
            Self::ItemsPersisted => "localStorage에 데이터 저장",
            Self::ThemePersisted => "localStorage에 테마 저장",
            Self::ItemsSurviveReload => "페이지 새로고침 후 데이터 유지",
            Self::ThemeSurvivesReload => "페이지 새로고침 후 테마 유지",
        }
    }

    /// Section the check is reported under
    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            Self::SwitchToDark | Self::SwitchToLight => Phase::Theme,
            Self::ItemsPersisted
            | Self::ThemePersisted
            | Self::ItemsSurviveReload
            | Self::ThemeSurvivesReload => Phase::Persistence,
            _ => Phase::Functional,
        }
    }

    /// Perform the check's actions and assert on the result
    pub async fn run<D: PageDriver>(self, session: &mut Session<D>) -> CheckResult {
        match self {
            Self::PageLoads => page_loads(session).await,
            Self::EmptyListPlaceholder => empty_list_placeholder(session).await,
            Self::AddViaButton => add_via_button(session).await,
            Self::AddViaEnter => add_via_enter(session).await,
            Self::AddBatch => add_batch(session).await,
            Self::TotalStatistic => total_statistic(session).await,
            Self::CheckFirstItem => set_first_item(session, true).await,
            Self::UncheckFirstItem => set_first_item(session, false).await,
            Self::CheckThreeItems => check_three_items(session).await,
            Self::DeleteItem => delete_item(session).await,
            Self::RejectBlankInput => reject_blank_input(session).await,
            Self::EscapeMarkup => escape_markup(session).await,
            Self::SwitchToDark => switch_theme(session, Theme::Dark).await,
            Self::SwitchToLight => switch_theme(session, Theme::Light).await,
            Self::ItemsPersisted => items_persisted(session).await,
            Self::ThemePersisted => theme_persisted(session).await,
            Self::ItemsSurviveReload => items_survive_reload(session).await,
            Self::ThemeSurvivesReload => theme_survives_reload(session).await,
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> CheckResult {
    if condition {
        Ok(())
    } else {
        Err(CheckError::assertion(message()))
    }
}

async fn page_loads<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    let title = session.driver().title().await?;
    ensure(title.contains(app::APP_TITLE), || {
        format!("title {title:?} does not contain {:?}", app::APP_TITLE)
    })
}

async fn empty_list_placeholder<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    let empty = session.driver().count(selectors::EMPTY_LIST).await?;
    ensure(empty == 1, || {
        format!("expected one empty list placeholder, found {empty}")
    })
}

async fn add_via_button<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    session.add_item(BUTTON_ITEM, Submit::Click).await?;
    let first = session.driver().text_content(selectors::ITEM_TEXT).await?;
    ensure(first == BUTTON_ITEM, || {
        format!("first item is {first:?}, expected {BUTTON_ITEM:?}")
    })
}

/// Settle on some `.item-text` reading exactly `text`
async fn item_listed<D: PageDriver>(session: &Session<D>, text: &str) -> CheckResult {
    session
        .settle(&Expectation::TextsInclude {
            selector: selectors::ITEM_TEXT.to_string(),
            text: text.to_string(),
        })
        .await?;
    Ok(())
}

async fn add_via_enter<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    session.add_item(ENTER_ITEM, Submit::Enter).await?;
    item_listed(session, ENTER_ITEM).await?;
    let texts = session.driver().text_contents(selectors::ITEM_TEXT).await?;
    ensure(texts.iter().any(|t| t == ENTER_ITEM), || {
        format!("{ENTER_ITEM:?} missing from {texts:?}")
    })
}

async fn add_batch<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    for item in BATCH_ITEMS {
        session.add_item(item, Submit::Click).await?;
        item_listed(session, item).await?;
    }
    let texts = session.driver().text_contents(selectors::ITEM_TEXT).await?;
    let missing: Vec<&str> = BATCH_ITEMS
        .into_iter()
        .filter(|item| !texts.iter().any(|t| t == item))
        .collect();
    ensure(missing.is_empty(), || {
        format!("items {missing:?} missing from {texts:?}")
    })
}

/// Settle on `#stats` containing `expected`, then assert it
async fn statistic_shows<D: PageDriver>(session: &Session<D>, expected: String) -> CheckResult {
    session
        .settle(&Expectation::TextContains {
            selector: selectors::STATS.to_string(),
            text: expected.clone(),
        })
        .await?;
    let stats = session.driver().text_content(selectors::STATS).await?;
    ensure(stats.contains(&expected), || {
        format!("statistics {stats:?} do not contain {expected:?}")
    })
}

async fn total_statistic<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    let expected = session.ledger().total_label();
    statistic_shows(session, expected).await
}

async fn set_first_item<D: PageDriver>(session: &mut Session<D>, checked: bool) -> CheckResult {
    session.toggle_item(0).await?;
    let row = Locator::first(selectors::ITEM);
    let has = session.driver().has_class(&row, app::CHECKED_CLASS).await?;
    ensure(has == checked, || {
        if checked {
            format!("'{row}' is not marked '{}'", app::CHECKED_CLASS)
        } else {
            format!("'{row}' is still marked '{}'", app::CHECKED_CLASS)
        }
    })
}

async fn check_three_items<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    for index in 0..3 {
        session.toggle_item(index).await?;
    }
    let expected = session.ledger().completed_label();
    statistic_shows(session, expected).await
}

async fn delete_item<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    let before = session.driver().count(selectors::ITEM).await?;
    session.delete_item(0).await?;
    let after = session.driver().count(selectors::ITEM).await?;
    ensure(after + 1 == before, || {
        format!("expected {} items after delete, found {after}", before.saturating_sub(1))
    })
}

async fn reject_blank_input<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    let before = session.driver().count(selectors::ITEM).await?;
    session.add_item(BLANK_INPUT, Submit::Click).await?;
    let after = session.driver().count(selectors::ITEM).await?;
    ensure(after == before, || {
        format!("blank input changed item count from {before} to {after}")
    })
}

async fn escape_markup<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    session.add_item(MARKUP_INPUT, Submit::Click).await?;
    let html = session.driver().inner_html(selectors::LIST).await?;
    ensure(!html.contains(LIVE_SCRIPT_TAG), || {
        format!("list markup contains a live {LIVE_SCRIPT_TAG} element")
    })
}

async fn read_theme<D: PageDriver>(session: &Session<D>) -> Result<Option<String>, CheckError> {
    Ok(session
        .driver()
        .attribute(selectors::ROOT, app::THEME_ATTRIBUTE)
        .await?)
}

async fn switch_theme<D: PageDriver>(session: &mut Session<D>, target: Theme) -> CheckResult {
    let tracked = session.toggle_theme().await?;
    let marker = read_theme(session).await?;
    ensure(tracked == target && marker.as_deref() == Some(target.as_str()), || {
        format!(
            "'{}' is {marker:?}, expected {:?}",
            app::THEME_ATTRIBUTE,
            target.as_str()
        )
    })
}

async fn items_persisted<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    let stored = session
        .driver()
        .storage_item(app::ITEMS_STORAGE_KEY)
        .await?;
    ensure(
        stored.as_deref().is_some_and(|s| s.contains(ENTER_ITEM)),
        || {
            format!(
                "storage '{}' does not mention {ENTER_ITEM:?}",
                app::ITEMS_STORAGE_KEY
            )
        },
    )
}

async fn theme_persisted<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    let expected = session.toggle_theme().await?;
    let stored = session
        .driver()
        .storage_item(app::THEME_STORAGE_KEY)
        .await?;
    ensure(stored.as_deref() == Some(expected.as_str()), || {
        format!(
            "storage '{}' is {stored:?}, expected {:?}",
            app::THEME_STORAGE_KEY,
            expected.as_str()
        )
    })
}

async fn items_survive_reload<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    let before = session.driver().count(selectors::ITEM).await?;
    session.reload().await?;
    session
        .settle(&Expectation::Count {
            selector: selectors::ITEM.to_string(),
            expected: before,
        })
        .await?;
    let after = session.driver().count(selectors::ITEM).await?;
    ensure(after == before, || {
        format!("{before} items before reload, {after} after")
    })
}

async fn theme_survives_reload<D: PageDriver>(session: &mut Session<D>) -> CheckResult {
    let expected = session.theme();
    let marker = read_theme(session).await?;
    ensure(marker.as_deref() == Some(expected.as_str()), || {
        format!(
            "'{}' is {marker:?} after reload, expected {:?}",
            app::THEME_ATTRIBUTE,
            expected.as_str()
        )
    })
}

//! Console reporting.
//!
//! Everything the run prints goes through [`Reporter`]: phase banners, one
//! PASS/FAIL line per check as it finishes, artifact notices, the design and
//! viewport readings, the tally summary, and the closing notes. Colour and
//! quiet mode behave like the rest of the tooling: plain `PASS`/`FAIL`
//! prefixes without colour, and failures print even when quiet.

use crate::check::Phase;
use crate::config::ViewportSpec;
use crate::design::{DesignSnapshot, DESIGN_NOTES, SUGGESTIONS};
use crate::orchestrator::{Artifact, RunTally, ViewportReading};
use console::{style, Style, Term};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Width of the horizontal rules
const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone)]
enum Sink {
    Term(Term),
    Buffer(Arc<Mutex<Vec<String>>>),
}

impl Sink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        match self {
            Self::Term(term) => term.write_line(line),
            Self::Buffer(lines) => {
                let mut lines = lines
                    .lock()
                    .map_err(|_| io::Error::other("report buffer poisoned"))?;
                lines.push(line.to_string());
                Ok(())
            }
        }
    }
}

/// Renders run progress and results
#[derive(Debug, Clone)]
pub struct Reporter {
    sink: Sink,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Reporter writing to stdout
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            sink: Sink::Term(Term::stdout()),
            use_color,
            quiet,
        }
    }

    /// Reporter collecting lines in memory
    #[must_use]
    pub fn buffered(use_color: bool, quiet: bool) -> Self {
        Self {
            sink: Sink::Buffer(Arc::default()),
            use_color,
            quiet,
        }
    }

    /// Lines collected by a buffered reporter (empty for stdout)
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match &self.sink {
            Sink::Term(_) => Vec::new(),
            Sink::Buffer(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
        }
    }

    fn line(&self, text: &str) {
        if let Err(err) = self.sink.write_line(text) {
            tracing::debug!(error = %err, "report line dropped");
        }
    }

    fn rule(&self, ch: char) {
        self.line(&ch.to_string().repeat(RULE_WIDTH));
    }

    fn emphasis(&self, text: &str) -> String {
        if self.use_color {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Opening lines with the page under test
    pub fn run_started(&self, url: &str) {
        if self.quiet {
            return;
        }
        self.line(&self.emphasis("🧪 쇼핑 리스트 앱 테스트 시작"));
        self.rule('=');
        self.line("");
        self.line(&format!("📍 테스트 URL: {url}"));
    }

    /// Section banner
    pub fn banner(&self, phase: Phase) {
        if self.quiet {
            return;
        }
        self.line("");
        self.line(&self.emphasis(phase.title()));
        self.rule('-');
    }

    /// A check held
    pub fn check_passed(&self, name: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("✅ PASS:").green().bold().to_string()
        } else {
            "PASS:".to_string()
        };
        self.line(&format!("{prefix} {name}"));
    }

    /// A check did not hold; always printed
    pub fn check_failed(&self, name: &str, error: &str) {
        let prefix = if self.use_color {
            style("❌ FAIL:").red().bold().to_string()
        } else {
            "FAIL:".to_string()
        };
        self.line(&format!("{prefix} {name}"));
        self.line(&format!("   에러: {error}"));
    }

    /// Something informational went wrong
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };
        self.line(&format!("{prefix} {message}"));
    }

    /// A screenshot was written
    pub fn artifact_saved(&self, artifact: Artifact, path: &Path) {
        if self.quiet {
            return;
        }
        self.line(&format!(
            "📸 {} 스크린샷 저장: {}",
            artifact.label(),
            path.display()
        ));
    }

    /// Computed layout facts
    pub fn design(&self, snapshot: &DesignSnapshot) {
        if self.quiet {
            return;
        }
        let applied = |on: bool| if on { "적용됨" } else { "없음" };
        self.line("");
        self.line("📐 레이아웃 분석:");
        self.line(&format!(
            "   - 컨테이너 최대 너비: {}",
            snapshot.container_max_width
        ));
        self.line(&format!(
            "   - 테두리 둥글기: {}",
            snapshot.container_border_radius
        ));
        self.line(&format!("   - 그림자 효과: {}", applied(snapshot.has_shadow)));
        self.line(&format!(
            "   - 전환 애니메이션: {}",
            applied(snapshot.has_transition)
        ));
        self.line("");
        self.line("🖼️ 시각적 요소:");
        let header = if snapshot.has_gradient_header() {
            "그라데이션 적용"
        } else {
            snapshot.header_background.as_str()
        };
        self.line(&format!("   - 헤더 배경: {header}"));
        self.line(&format!("   - 입력창 테두리: {}", snapshot.input_border));
        self.line(&format!("   - 현재 아이템 수: {}개", snapshot.item_count));
    }

    /// One responsive sweep reading
    pub fn viewport(&self, reading: &ViewportReading) {
        if self.quiet {
            return;
        }
        let mark = match (reading.visible, self.use_color) {
            (true, true) => style("✓").green().to_string(),
            (false, true) => style("✗").red().to_string(),
            (true, false) => "✓".to_string(),
            (false, false) => "✗".to_string(),
        };
        self.line(&format!(
            "   {}: 컨테이너 {}px {mark}",
            reading.viewport, reading.container_width
        ));
    }

    /// A sweep viewport could not be read
    pub fn viewport_skipped(&self, viewport: &ViewportSpec, reason: &str) {
        self.warning(&format!("{viewport}: {reason}"));
    }

    /// Pass/fail totals and success rate; printed when quiet only if something failed
    pub fn summary(&self, tally: &RunTally, duration: Duration) {
        if self.quiet && tally.failed == 0 {
            return;
        }
        self.line("");
        self.rule('=');
        self.line(&self.emphasis("📊 테스트 결과 요약"));
        self.rule('=');

        let rate = format_rate(tally.success_rate());
        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            self.line(&format!("   ✅ 통과: {}개", passed_style.apply_to(tally.passed)));
            let failed = if tally.failed > 0 {
                failed_style.apply_to(tally.failed).to_string()
            } else {
                tally.failed.to_string()
            };
            self.line(&format!("   ❌ 실패: {failed}개"));
        } else {
            self.line(&format!("   ✅ 통과: {}개", tally.passed));
            self.line(&format!("   ❌ 실패: {}개", tally.failed));
        }
        self.line(&format!("   📈 성공률: {rate}"));
        self.line(&format!("   ⏱ 소요 시간: {:.2}s", duration.as_secs_f64()));
    }

    /// Fixed design notes and improvement suggestions
    pub fn closing_notes(&self) {
        if self.quiet {
            return;
        }
        self.line("");
        self.line(&self.emphasis("🎨 디자인 평가 요약"));
        self.rule('=');
        for note in DESIGN_NOTES {
            self.line(&format!("   ✓ {note}"));
        }
        self.line("");
        self.line(&self.emphasis("💡 개선 제안"));
        self.rule('=');
        for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
            self.line(&format!("   {}. {suggestion}", i + 1));
        }
    }

    /// Announce the pause before the browser closes
    pub fn closing_in(&self, pause: Duration) {
        if self.quiet {
            return;
        }
        self.line("");
        self.line(&format!(
            "⏳ {}초 후 브라우저가 닫힙니다...",
            pause.as_secs_f64()
        ));
    }

    /// Final line
    pub fn finished(&self) {
        if self.quiet {
            return;
        }
        self.line("");
        self.line("🏁 테스트 완료!");
    }
}

/// Success rate as a percentage, or `n/a` when nothing ran
#[must_use]
pub fn format_rate(rate: Option<u32>) -> String {
    rate.map_or_else(|| "n/a".to_string(), |r| format!("{r}%"))
}

//! Full acceptance runs against the in-memory shopping-list page.
//!
//! These drive the orchestrator end to end: all eighteen checks, the theme
//! captures, the design inspection and the responsive sweep, and the
//! guaranteed browser release.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use listprobe::{
    Artifact, Check, HarnessConfig, HarnessError, MockFault, MockShoppingPage, Orchestrator,
    Reporter, RunPlan, Step, Theme, ViewportSpec, WaitOptions,
};
use tempfile::TempDir;

fn fast_config(dir: &TempDir) -> HarnessConfig {
    HarnessConfig::default()
        .with_app_path(dir.path().join("index.html"))
        .with_artifact_dir(dir.path().join("shots"))
        .with_wait(
            WaitOptions::new()
                .with_timeout(25)
                .with_initial_interval(1)
                .with_max_interval(5),
        )
        .with_quiet_period(1)
}

fn orchestrator(page: MockShoppingPage, dir: &TempDir) -> Orchestrator<MockShoppingPage> {
    Orchestrator::new(page, fast_config(dir), Reporter::buffered(false, false))
}

// ============================================================================
// Well-behaved page
// ============================================================================

#[tokio::test]
async fn test_full_run_passes_every_check() {
    let dir = TempDir::new().unwrap();
    let mut orch = orchestrator(MockShoppingPage::new(), &dir);
    let report = orch.run().await.unwrap();

    assert_eq!(report.outcomes.len(), 18);
    assert_eq!(report.tally.passed, 18);
    assert_eq!(report.tally.failed, 0);
    assert_eq!(report.tally.success_rate(), Some(100));
    assert!(report.all_passed());

    let names: Vec<&str> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
    let expected: Vec<&str> = Check::ALL.iter().map(|c| c.name()).collect();
    assert_eq!(names, expected);
    assert!(orch.driver().is_closed());
}

#[tokio::test]
async fn test_screenshots_written_with_expected_sizes() {
    let dir = TempDir::new().unwrap();
    let mut orch = orchestrator(MockShoppingPage::new(), &dir);
    let report = orch.run().await.unwrap();

    for artifact in [Artifact::Dark, Artifact::Light, Artifact::Mobile] {
        let captured = report.artifact(artifact).unwrap();
        assert!(captured.path.exists(), "{}", captured.path.display());
        assert!(captured.path.ends_with(artifact.file_name()));
    }
    assert_eq!(
        report.artifact(Artifact::Dark).unwrap().dimensions,
        Some((1280, 800))
    );
    assert_eq!(
        report.artifact(Artifact::Mobile).unwrap().dimensions,
        Some((375, 667))
    );
}

#[tokio::test]
async fn test_design_and_sweep_are_reported_but_not_tallied() {
    let dir = TempDir::new().unwrap();
    let mut orch = orchestrator(MockShoppingPage::new(), &dir);
    let report = orch.run().await.unwrap();

    let design = report.design.as_ref().unwrap();
    assert_eq!(design.item_count, 5);
    assert_eq!(design.container_border_radius, "20px");

    let widths: Vec<(String, u32)> = report
        .viewports
        .iter()
        .map(|r| (r.viewport.label.clone(), r.container_width))
        .collect();
    assert_eq!(
        widths,
        vec![
            ("데스크톱".to_string(), 600),
            ("태블릿".to_string(), 600),
            ("모바일".to_string(), 335),
        ]
    );
    assert!(report.viewports.iter().all(|r| r.visible));
    assert_eq!(report.tally.total(), 18);
}

#[tokio::test]
async fn test_design_inspection_restores_light_theme() {
    let dir = TempDir::new().unwrap();
    let mut orch = orchestrator(MockShoppingPage::new(), &dir);
    orch.run().await.unwrap();
    assert_eq!(orch.session().theme(), Theme::Light);
    assert_eq!(orch.driver().theme(), Theme::Light);
}

#[tokio::test]
async fn test_report_lines_in_order() {
    let dir = TempDir::new().unwrap();
    let reporter = Reporter::buffered(false, false);
    let mut orch = Orchestrator::new(MockShoppingPage::new(), fast_config(&dir), reporter.clone());
    orch.run().await.unwrap();

    let lines = reporter.lines();
    let position = |needle: &str| {
        lines
            .iter()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("missing line containing {needle:?}"))
    };
    assert!(position("PASS: 다크모드 전환") < position("다크모드 스크린샷 저장"));
    assert!(position("다크모드 스크린샷 저장") < position("PASS: 라이트모드 복귀"));
    assert!(position("[반응형 테스트]") < position("모바일 (375x667)"));
    assert!(position("📈 성공률: 100%") < position("💡 개선 제안"));
    assert_eq!(lines.last().unwrap(), "🏁 테스트 완료!");
}

// ============================================================================
// Failure isolation
// ============================================================================

#[tokio::test]
async fn test_blank_input_fault_fails_exactly_one_check() {
    let dir = TempDir::new().unwrap();
    let page = MockShoppingPage::new().with_fault(MockFault::AcceptsBlankInput);
    let mut orch = orchestrator(page, &dir);
    let report = orch.run().await.unwrap();

    assert_eq!(report.outcomes.len(), 18);
    assert_eq!(report.tally.failed, 1);
    let failed: Vec<&str> = report.failures().map(|o| o.name.as_str()).collect();
    assert_eq!(failed, vec![Check::RejectBlankInput.name()]);
    assert_eq!(report.tally.success_rate(), Some(94));
}

#[tokio::test]
async fn test_forgetful_reload_fails_only_reload_checks() {
    let dir = TempDir::new().unwrap();
    let page = MockShoppingPage::new().with_fault(MockFault::ForgetsOnReload);
    let mut orch = orchestrator(page, &dir);
    let report = orch.run().await.unwrap();

    let failed: Vec<&str> = report.failures().map(|o| o.name.as_str()).collect();
    assert_eq!(
        failed,
        vec![
            Check::ItemsSurviveReload.name(),
            Check::ThemeSurvivesReload.name()
        ]
    );
    assert_eq!(report.outcomes.len(), 18);
}

#[tokio::test]
async fn test_ignored_theme_toggle_fails_theme_checks_and_still_captures() {
    let dir = TempDir::new().unwrap();
    let page = MockShoppingPage::new().with_fault(MockFault::IgnoresThemeToggle);
    let mut orch = orchestrator(page, &dir);
    let report = orch.run().await.unwrap();

    let failed: Vec<&str> = report.failures().map(|o| o.name.as_str()).collect();
    assert!(failed.contains(&Check::SwitchToDark.name()));
    assert!(failed.contains(&Check::ThemePersisted.name()));
    assert!(failed.contains(&Check::ThemeSurvivesReload.name()));
    assert!(!failed.contains(&Check::ItemsSurviveReload.name()));
    assert_eq!(report.tally.total(), 18);
    assert!(report.artifact(Artifact::Dark).is_some());
}

#[tokio::test]
async fn test_delete_all_fault_cascades_without_aborting() {
    let dir = TempDir::new().unwrap();
    let page = MockShoppingPage::new().with_fault(MockFault::DeletesAll);
    let mut orch = orchestrator(page, &dir);
    let report = orch.run().await.unwrap();

    let delete = report.outcome(Check::DeleteItem.name()).unwrap();
    assert!(!delete.passed);
    assert!(delete.error.as_deref().unwrap().contains("after delete"));
    assert_eq!(report.outcomes.len(), 18);
    assert!(orch.driver().is_closed());
}

#[tokio::test]
async fn test_failure_lines_carry_error_text() {
    let dir = TempDir::new().unwrap();
    let reporter = Reporter::buffered(false, true);
    let page = MockShoppingPage::new().with_fault(MockFault::RendersRawMarkup);
    let mut orch = Orchestrator::new(page, fast_config(&dir), reporter.clone());
    orch.run().await.unwrap();

    let lines = reporter.lines();
    let fail = lines
        .iter()
        .position(|l| l == &format!("FAIL: {}", Check::EscapeMarkup.name()))
        .unwrap();
    assert!(lines[fail + 1].starts_with("   에러: "));
    assert!(!lines.iter().any(|l| l.starts_with("PASS:")));
}

// ============================================================================
// Setup and teardown
// ============================================================================

#[tokio::test]
async fn test_navigation_failure_is_setup_error_and_closes() {
    let dir = TempDir::new().unwrap();
    let page = MockShoppingPage::new().with_fault(MockFault::FailsNavigation);
    let mut orch = orchestrator(page, &dir);
    let err = orch.run().await.unwrap_err();

    assert!(matches!(err, HarnessError::Setup(_)));
    assert!(orch.driver().is_closed());
    assert!(!orch.driver().was_called("click"));
}

#[tokio::test]
async fn test_finish_line_printed_after_setup_failure() {
    let dir = TempDir::new().unwrap();
    let reporter = Reporter::buffered(false, false);
    let page = MockShoppingPage::new().with_fault(MockFault::FailsNavigation);
    let mut orch = Orchestrator::new(page, fast_config(&dir), reporter.clone());
    assert!(orch.run().await.is_err());

    assert_eq!(reporter.lines().last().unwrap(), "🏁 테스트 완료!");
}

#[tokio::test]
async fn test_close_failure_is_teardown_error() {
    let dir = TempDir::new().unwrap();
    let page = MockShoppingPage::new().with_fault(MockFault::FailsClose);
    let mut orch = orchestrator(page, &dir);
    let err = orch.run().await.unwrap_err();

    assert!(matches!(err, HarnessError::Teardown(_)));
    assert!(orch.driver().was_called("close"));
}

#[tokio::test]
async fn test_finish_line_printed_after_close_failure() {
    let dir = TempDir::new().unwrap();
    let reporter = Reporter::buffered(false, false);
    let page = MockShoppingPage::new().with_fault(MockFault::FailsClose);
    let mut orch = Orchestrator::new(page, fast_config(&dir), reporter.clone());
    assert!(orch.run().await.is_err());

    let lines = reporter.lines();
    assert_eq!(lines.last().unwrap(), "🏁 테스트 완료!");
    assert!(lines.iter().any(|l| l.contains("📈 성공률: 100%")));
}

#[tokio::test]
async fn test_starts_at_configured_viewport_and_url() {
    let dir = TempDir::new().unwrap();
    let mut orch = orchestrator(MockShoppingPage::new(), &dir);
    orch.run().await.unwrap();

    let calls = orch.driver().calls();
    assert_eq!(calls[0], "viewport:1280x800");
    assert!(calls[1].starts_with("goto:file:///"));
    assert!(calls[1].ends_with("index.html"));
    assert_eq!(calls.last().unwrap(), "close");
}

// ============================================================================
// Custom plans and sweeps
// ============================================================================

#[tokio::test]
async fn test_custom_sweep_drives_mobile_capture() {
    let dir = TempDir::new().unwrap();
    let narrow = ViewportSpec::new("narrow", 320, 568).unwrap();
    let config = fast_config(&dir).with_sweep(vec![ViewportSpec::tablet(), narrow]);
    let mut orch = Orchestrator::new(
        MockShoppingPage::new(),
        config,
        Reporter::buffered(false, false),
    );
    let report = orch.run().await.unwrap();

    assert_eq!(report.viewports.len(), 2);
    assert_eq!(
        report.artifact(Artifact::Mobile).unwrap().dimensions,
        Some((320, 568))
    );
}

#[tokio::test]
async fn test_empty_plan_has_no_rate() {
    let dir = TempDir::new().unwrap();
    let reporter = Reporter::buffered(false, false);
    let mut orch = Orchestrator::new(MockShoppingPage::new(), fast_config(&dir), reporter.clone())
        .with_plan(RunPlan::new(vec![Step::DesignInspection]));
    let report = orch.run().await.unwrap();

    assert!(report.outcomes.is_empty());
    assert_eq!(report.tally.success_rate(), None);
    assert!(reporter.lines().iter().any(|l| l.ends_with("성공률: n/a")));
}

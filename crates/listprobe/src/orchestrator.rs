//! Test orchestration.
//!
//! The [`Orchestrator`] walks a [`RunPlan`] step by step against one
//! [`Session`]. Each check is isolated: whatever it returns, assertion failure
//! or driver error, becomes a [`TestOutcome`] and the run moves on. Only setup
//! (navigation) and teardown (closing the browser) can end a run early, and
//! the browser is closed on every path out of [`Orchestrator::run`].

use crate::app::{selectors, Theme};
use crate::check::{Check, Phase};
use crate::config::{HarnessConfig, ViewportSpec};
use crate::design::{self, DesignSnapshot};
use crate::driver::PageDriver;
use crate::error::{DriverResult, HarnessError, HarnessResult};
use crate::reporter::Reporter;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

// =============================================================================
// PLAN
// =============================================================================

/// A screenshot taken at a fixed point of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Artifact {
    /// After switching to dark mode
    Dark,
    /// After switching back to light mode
    Light,
    /// At the smallest sweep viewport
    Mobile,
}

impl Artifact {
    /// File name inside the artifact directory
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Dark => "screenshot-dark.png",
            Self::Light => "screenshot-light.png",
            Self::Mobile => "screenshot-mobile.png",
        }
    }

    /// Label used in the report
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dark => "다크모드",
            Self::Light => "라이트모드",
            Self::Mobile => "모바일",
        }
    }
}

/// One step of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Print a section banner
    Banner(Phase),
    /// Run and tally a check
    Check(Check),
    /// Write a screenshot
    Capture(Artifact),
    /// Toggle until the page shows this theme
    RestoreTheme(Theme),
    /// Read and print computed styles
    DesignInspection,
    /// Visit every configured viewport and print container readings
    ResponsiveSweep,
}

/// Ordered steps of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    steps: Vec<Step>,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self::standard()
    }
}

impl RunPlan {
    /// Plan from explicit steps
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// The full acceptance run
    #[must_use]
    pub fn standard() -> Self {
        let mut steps = Vec::with_capacity(32);
        let mut phase = None;
        for check in Check::ALL {
            if phase != Some(check.phase()) {
                phase = Some(check.phase());
                steps.push(Step::Banner(check.phase()));
            }
            steps.push(Step::Check(check));
            match check {
                Check::SwitchToDark => steps.push(Step::Capture(Artifact::Dark)),
                Check::SwitchToLight => steps.push(Step::Capture(Artifact::Light)),
                _ => {}
            }
        }
        steps.extend([
            Step::Banner(Phase::Design),
            Step::RestoreTheme(Theme::Light),
            Step::DesignInspection,
            Step::Banner(Phase::Responsive),
            Step::ResponsiveSweep,
            Step::Capture(Artifact::Mobile),
        ]);
        Self { steps }
    }

    /// All steps in order
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Checks in run order
    pub fn checks(&self) -> impl Iterator<Item = Check> + '_ {
        self.steps.iter().filter_map(|step| match step {
            Step::Check(check) => Some(*check),
            _ => None,
        })
    }

    /// Number of checks the plan runs
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.checks().count()
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Result of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Check name
    pub name: String,
    /// Whether the check held
    pub passed: bool,
    /// Failure message
    pub error: Option<String>,
    /// Time the check took
    pub duration: Duration,
}

impl TestOutcome {
    /// Create a passing outcome
    #[must_use]
    pub fn pass(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error: None,
            duration,
        }
    }

    /// Create a failing outcome
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.into()),
            duration,
        }
    }
}

/// Pass/fail counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTally {
    /// Checks that held
    pub passed: usize,
    /// Checks that did not
    pub failed: usize,
}

impl RunTally {
    /// Count one outcome
    pub fn record(&mut self, outcome: &TestOutcome) {
        if outcome.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Checks counted
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Percentage of checks that held, rounded half up; `None` if nothing ran
    #[must_use]
    pub fn success_rate(&self) -> Option<u32> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let rate = (200 * self.passed + total) / (2 * total);
        u32::try_from(rate).ok()
    }
}

/// Container reading at one sweep viewport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportReading {
    /// Viewport visited
    pub viewport: ViewportSpec,
    /// Whether the container was visible
    pub visible: bool,
    /// Rendered container width in CSS pixels
    pub container_width: u32,
}

/// A screenshot that was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedArtifact {
    /// Which screenshot
    pub artifact: Artifact,
    /// Where it was written
    pub path: PathBuf,
    /// Pixel size of the PNG, if it could be read back
    pub dimensions: Option<(u32, u32)>,
}

/// Everything a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// One outcome per check, in run order
    pub outcomes: Vec<TestOutcome>,
    /// Counters over `outcomes`
    pub tally: RunTally,
    /// Computed styles, if the inspection succeeded
    pub design: Option<DesignSnapshot>,
    /// Responsive sweep readings
    pub viewports: Vec<ViewportReading>,
    /// Screenshots written
    pub artifacts: Vec<CapturedArtifact>,
    /// Wall time of the run
    pub duration: Duration,
}

impl RunReport {
    /// Whether every check held
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.tally.failed == 0
    }

    /// Outcomes that did not hold
    pub fn failures(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    /// Outcome of the named check
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&TestOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    /// Path of a written screenshot
    #[must_use]
    pub fn artifact(&self, artifact: Artifact) -> Option<&CapturedArtifact> {
        self.artifacts.iter().find(|a| a.artifact == artifact)
    }
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

/// Runs a plan against one page
#[derive(Debug)]
pub struct Orchestrator<D> {
    session: Session<D>,
    config: HarnessConfig,
    plan: RunPlan,
    reporter: Reporter,
}

impl<D: PageDriver> Orchestrator<D> {
    /// Orchestrator for the standard plan
    #[must_use]
    pub fn new(driver: D, config: HarnessConfig, reporter: Reporter) -> Self {
        Self {
            session: Session::new(driver, &config),
            config,
            plan: RunPlan::standard(),
            reporter,
        }
    }

    /// Replace the plan
    #[must_use]
    pub fn with_plan(mut self, plan: RunPlan) -> Self {
        self.plan = plan;
        self
    }

    /// The plan that will run
    #[must_use]
    pub const fn plan(&self) -> &RunPlan {
        &self.plan
    }

    /// The underlying driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        self.session.driver()
    }

    /// The session shared by the checks
    #[must_use]
    pub const fn session(&self) -> &Session<D> {
        &self.session
    }

    /// Give the driver back
    #[must_use]
    pub fn into_driver(self) -> D {
        self.session.into_driver()
    }

    /// Execute the plan, then close the browser.
    ///
    /// Check failures are part of the report. Errors are returned only for
    /// setup and teardown; the browser is closed in either case.
    pub async fn run(&mut self) -> HarnessResult<RunReport> {
        let executed = self.execute().await;

        if executed.is_ok() && !self.config.final_pause().is_zero() {
            self.reporter.closing_in(self.config.final_pause());
            tokio::time::sleep(self.config.final_pause()).await;
        }

        let closed = self.session.driver_mut().close().await;
        self.reporter.finished();
        match (executed, closed) {
            (Ok(report), Ok(())) => Ok(report),
            (Ok(_), Err(err)) => {
                tracing::error!(error = %err, "browser did not close cleanly");
                Err(HarnessError::Teardown(err))
            }
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                tracing::warn!(error = %close_err, "close after failed run also failed");
                Err(err)
            }
        }
    }

    async fn execute(&mut self) -> HarnessResult<RunReport> {
        let started = Instant::now();
        self.setup().await?;

        let mut report = RunReport::default();
        for step in self.plan.steps.clone() {
            match step {
                Step::Banner(phase) => {
                    tracing::info!(%phase, "phase");
                    self.reporter.banner(phase);
                }
                Step::Check(check) => {
                    let outcome = self.run_check(check).await;
                    report.tally.record(&outcome);
                    report.outcomes.push(outcome);
                }
                Step::Capture(artifact) => {
                    if let Some(captured) = self.capture(artifact).await {
                        report.artifacts.push(captured);
                    }
                }
                Step::RestoreTheme(theme) => {
                    if let Err(err) = self.session.ensure_theme(theme).await {
                        self.informational_failure("theme restore", &err.to_string());
                    }
                }
                Step::DesignInspection => {
                    report.design = self.inspect_design().await;
                }
                Step::ResponsiveSweep => {
                    report.viewports = self.sweep().await;
                }
            }
        }

        report.duration = started.elapsed();
        self.reporter.summary(&report.tally, report.duration);
        self.reporter.closing_notes();
        tracing::info!(
            passed = report.tally.passed,
            failed = report.tally.failed,
            "run finished"
        );
        Ok(report)
    }

    async fn setup(&mut self) -> HarnessResult<()> {
        std::fs::create_dir_all(&self.config.artifact_dir)?;
        let url = self.config.app_url();
        let driver = self.session.driver_mut();
        driver
            .set_viewport(&self.config.viewport)
            .await
            .map_err(HarnessError::Setup)?;
        driver.goto(&url).await.map_err(HarnessError::Setup)?;
        tracing::info!(%url, "page under test loaded");
        self.reporter.run_started(&url);
        Ok(())
    }

    /// Run one check, recover its error, print and return its outcome
    pub async fn run_check(&mut self, check: Check) -> TestOutcome {
        let started = Instant::now();
        let result = check.run(&mut self.session).await;
        let duration = started.elapsed();
        match result {
            Ok(()) => {
                tracing::debug!(check = check.name(), ?duration, "check passed");
                self.reporter.check_passed(check.name());
                TestOutcome::pass(check.name(), duration)
            }
            Err(err) => {
                let kind = if err.is_assertion() {
                    "assertion"
                } else {
                    "driver"
                };
                tracing::warn!(check = check.name(), kind, error = %err, "check failed");
                let message = err.to_string();
                self.reporter.check_failed(check.name(), &message);
                TestOutcome::fail(check.name(), message, duration)
            }
        }
    }

    async fn capture(&mut self, artifact: Artifact) -> Option<CapturedArtifact> {
        let path = self.config.artifact_dir.join(artifact.file_name());
        let result: DriverResult<()> = async {
            if artifact == Artifact::Mobile {
                if let Some(viewport) = self.config.smallest_viewport().cloned() {
                    self.session.resize(&viewport).await?;
                }
            }
            self.session.driver().screenshot(&path).await
        }
        .await;

        match result {
            Ok(()) => {
                let dimensions = image::image_dimensions(&path).ok();
                tracing::info!(path = %path.display(), ?dimensions, "screenshot written");
                self.reporter.artifact_saved(artifact, &path);
                Some(CapturedArtifact {
                    artifact,
                    path,
                    dimensions,
                })
            }
            Err(err) => {
                self.informational_failure(artifact.file_name(), &err.to_string());
                None
            }
        }
    }

    async fn inspect_design(&self) -> Option<DesignSnapshot> {
        match design::inspect(self.session.driver()).await {
            Ok(snapshot) => {
                self.reporter.design(&snapshot);
                Some(snapshot)
            }
            Err(err) => {
                self.informational_failure("design inspection", &err.to_string());
                None
            }
        }
    }

    async fn sweep(&mut self) -> Vec<ViewportReading> {
        let mut readings = Vec::with_capacity(self.config.sweep.len());
        for viewport in self.config.sweep.clone() {
            match self.read_viewport(&viewport).await {
                Ok(reading) => {
                    tracing::info!(
                        viewport = %reading.viewport,
                        visible = reading.visible,
                        width = reading.container_width,
                        "viewport reading"
                    );
                    self.reporter.viewport(&reading);
                    readings.push(reading);
                }
                Err(err) => {
                    tracing::warn!(%viewport, error = %err, "viewport reading failed");
                    self.reporter.viewport_skipped(&viewport, &err.to_string());
                }
            }
        }
        readings
    }

    async fn read_viewport(&mut self, viewport: &ViewportSpec) -> DriverResult<ViewportReading> {
        self.session.resize(viewport).await?;
        let driver = self.session.driver();
        Ok(ViewportReading {
            viewport: viewport.clone(),
            visible: driver.is_visible(selectors::CONTAINER).await?,
            container_width: driver.offset_width(selectors::CONTAINER).await?,
        })
    }

    fn informational_failure(&self, what: &str, message: &str) {
        tracing::warn!(what, error = message, "informational step failed");
        self.reporter.warning(&format!("{what}: {message}"));
    }
}

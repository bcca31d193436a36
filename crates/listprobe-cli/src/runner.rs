//! Suite execution against a real browser

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use listprobe::{Orchestrator, PageDriver, RunReport};

/// Run the suite on `driver` and turn failed checks into an error
pub async fn run_with<D: PageDriver>(driver: D, config: &CliConfig) -> CliResult<RunReport> {
    let mut orchestrator = Orchestrator::new(driver, config.harness.clone(), config.reporter());
    let report = orchestrator.run().await?;
    if report.all_passed() {
        Ok(report)
    } else {
        Err(CliError::ChecksFailed {
            failed: report.tally.failed,
            total: report.tally.total(),
        })
    }
}

/// Launch Chromium and run the suite
#[cfg(feature = "browser")]
pub async fn run_suite(config: &CliConfig) -> CliResult<RunReport> {
    use listprobe::{BrowserConfig, ChromiumDriver, HarnessError};

    let browser = BrowserConfig::from(&config.harness);
    tracing::info!(app = %config.harness.app_path.display(), "launching chromium");
    let driver = ChromiumDriver::launch(&browser)
        .await
        .map_err(HarnessError::Setup)?;
    run_with(driver, config).await
}

/// Without the `browser` feature there is nothing to drive
#[cfg(not(feature = "browser"))]
pub async fn run_suite(_config: &CliConfig) -> CliResult<RunReport> {
    Err(CliError::Unsupported {
        message: "browser support not compiled in; rebuild with --features browser".to_string(),
    })
}

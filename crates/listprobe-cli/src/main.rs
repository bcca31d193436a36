//! Listprobe CLI: run the shopping-list acceptance suite
//!
//! ## Usage
//!
//! ```bash
//! listprobe                              # headless run against ./index.html
//! listprobe --headed --pause-ms 5000     # watch the run, linger before closing
//! listprobe --config listprobe.yaml -v   # YAML settings, info logs on stderr
//! listprobe --no-sandbox --artifacts out # inside a container, screenshots to out/
//! ```

use clap::Parser;
use listprobe_cli::{logging, run_suite, Cli, CliConfig, CliResult};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli)?;
    logging::init(config.verbosity);

    let report = run_suite(&config).await?;
    tracing::info!(
        passed = report.tally.passed,
        artifacts = report.artifacts.len(),
        "all checks passed"
    );
    Ok(())
}

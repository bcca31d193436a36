//! Listprobe: browser-driven acceptance harness for a shopping-list web app
//!
//! Drives a rendered page through a fixed sequence of eighteen checks (item
//! management, theme switching, persistence across reload), isolates each
//! check's failure, tallies the outcomes and writes screenshots at key states.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    LISTPROBE Architecture                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ RunPlan    │    │ Orchestr-  │    │ PageDriver │            │
//! │   │ (18 checks)│───►│ ator +     │───►│ Chromium / │            │
//! │   │            │    │ Session    │    │ Mock page  │            │
//! │   └────────────┘    └─────┬──────┘    └────────────┘            │
//! │                           ▼                                     │
//! │                    ┌────────────┐                               │
//! │                    │ Reporter   │  console + PNG artifacts      │
//! │                    └────────────┘                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use listprobe::{HarnessConfig, MockShoppingPage, Orchestrator, Reporter};
//!
//! # async fn demo() -> listprobe::HarnessResult<()> {
//! let config = HarnessConfig::default().with_artifact_dir("target/shots");
//! let mut orchestrator = Orchestrator::new(MockShoppingPage::new(), config, Reporter::default());
//! let report = orchestrator.run().await?;
//! assert_eq!(report.outcomes.len(), 18);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod app;
#[allow(clippy::missing_errors_doc)]
mod browser;
#[allow(clippy::missing_errors_doc)]
mod check;
#[allow(clippy::missing_errors_doc)]
mod config;
#[allow(clippy::missing_errors_doc)]
mod design;
#[allow(clippy::missing_errors_doc)]
mod driver;
mod error;
pub mod locator;
pub mod mock;
#[allow(clippy::missing_errors_doc)]
mod orchestrator;
mod reporter;
#[allow(clippy::missing_errors_doc)]
mod session;
#[allow(clippy::missing_errors_doc)]
mod wait;

pub use app::Theme;
pub use browser::{BrowserConfig, CLEAR_STORAGE_ONCE};
#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use check::{Check, Phase, BATCH_ITEMS, BLANK_INPUT, BUTTON_ITEM, ENTER_ITEM, MARKUP_INPUT};
pub use config::{
    default_app_path, file_url, HarnessConfig, ViewportSpec, DEFAULT_APP_FILE,
    DEFAULT_QUIET_PERIOD_MS,
};
pub use design::{inspect, DesignSnapshot, DESIGN_NOTES, DESIGN_QUERY, SUGGESTIONS};
pub use driver::PageDriver;
pub use error::{CheckError, CheckResult, DriverError, DriverResult, HarnessError, HarnessResult};
pub use locator::Locator;
pub use mock::{MockFault, MockItem, MockShoppingPage};
pub use orchestrator::{
    Artifact, CapturedArtifact, Orchestrator, RunPlan, RunReport, RunTally, Step, TestOutcome,
    ViewportReading,
};
pub use reporter::{format_rate, Reporter};
pub use session::{Expectation, Ledger, Session, Submit};
pub use wait::{
    wait_for, Backoff, WaitCondition, WaitOptions, WaitResult, DEFAULT_BACKOFF_MULTIPLIER,
    DEFAULT_INITIAL_INTERVAL_MS, DEFAULT_MAX_INTERVAL_MS, DEFAULT_SETTLE_TIMEOUT_MS,
};

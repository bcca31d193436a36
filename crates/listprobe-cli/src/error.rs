//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// The run finished but some checks did not hold
    #[error("{failed} of {total} checks failed")]
    ChecksFailed {
        /// Failed checks
        failed: usize,
        /// Checks run
        total: usize,
    },

    /// Launch, navigation, teardown or configuration problem
    #[error(transparent)]
    Harness(#[from] listprobe::HarnessError),

    /// Feature not compiled in
    #[error("{message}")]
    Unsupported {
        /// Error message
        message: String,
    },
}

impl CliError {
    /// Whether the run itself completed and only checks failed
    #[must_use]
    pub const fn is_check_failure(&self) -> bool {
        matches!(self, Self::ChecksFailed { .. })
    }
}

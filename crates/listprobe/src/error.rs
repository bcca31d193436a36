//! Error types for Listprobe.
//!
//! Three layers, three enums:
//!
//! - [`DriverError`]: a page operation itself failed (element missing, CDP error).
//! - [`CheckError`]: a check did not hold. Wraps driver errors so that both are
//!   recovered at the check boundary and reported the same way.
//! - [`HarnessError`]: the run as a whole could not proceed (config, launch,
//!   navigation, teardown).

use thiserror::Error;

/// Result type for page operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Result of a single check
pub type CheckResult = Result<(), CheckError>;

/// Result type for run-level operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors raised by the browser control adapter
#[derive(Debug, Error)]
pub enum DriverError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// No element matched a locator
    #[error("No element matches '{selector}' at index {index}")]
    ElementNotFound {
        /// CSS selector
        selector: String,
        /// Match index that was requested
        index: usize,
    },

    /// In-page evaluation error
    #[error("Page evaluation failed: {message}")]
    Evaluation {
        /// Error message
        message: String,
    },

    /// Input simulation error
    #[error("Input simulation failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Viewport emulation error
    #[error("Viewport change failed: {message}")]
    Viewport {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Browser shutdown error
    #[error("Failed to close browser: {message}")]
    Close {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DriverError {
    /// Create an element-not-found error
    #[must_use]
    pub fn not_found(selector: impl Into<String>, index: usize) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
            index,
        }
    }

    /// Create an evaluation error
    #[must_use]
    pub fn evaluation(message: impl ToString) -> Self {
        Self::Evaluation {
            message: message.to_string(),
        }
    }

    /// Create an input error
    #[must_use]
    pub fn input(message: impl ToString) -> Self {
        Self::Input {
            message: message.to_string(),
        }
    }

    /// Create a screenshot error
    #[must_use]
    pub fn screenshot(message: impl ToString) -> Self {
        Self::Screenshot {
            message: message.to_string(),
        }
    }
}

/// Why a check did not pass
#[derive(Debug, Error)]
pub enum CheckError {
    /// The expected condition was not met
    #[error("{0}")]
    Assertion(String),

    /// A page operation failed while the check was running
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl CheckError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion(message.into())
    }

    /// Whether this is an assertion failure rather than an adapter error
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

/// Errors that stop a whole run
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Browser launch or initial navigation failed
    #[error("Setup failed: {0}")]
    Setup(#[source] DriverError),

    /// Browser could not be released cleanly
    #[error("Teardown failed: {0}")]
    Teardown(#[source] DriverError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML config error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl HarnessError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_selector_and_index() {
        let err = DriverError::not_found(".checkbox", 2);
        assert_eq!(
            err.to_string(),
            "No element matches '.checkbox' at index 2"
        );
    }

    #[test]
    fn test_check_error_from_driver_is_transparent() {
        let err: CheckError = DriverError::input("detached node").into();
        assert!(!err.is_assertion());
        assert_eq!(err.to_string(), "Input simulation failed: detached node");
    }

    #[test]
    fn test_assertion_message_is_verbatim() {
        let err = CheckError::assertion("expected 5 items, found 4");
        assert!(err.is_assertion());
        assert_eq!(err.to_string(), "expected 5 items, found 4");
    }

    #[test]
    fn test_harness_setup_wraps_source() {
        let err = HarnessError::Setup(DriverError::Navigation {
            url: "file:///index.html".to_string(),
            message: "net::ERR_FILE_NOT_FOUND".to_string(),
        });
        let text = err.to_string();
        assert!(text.starts_with("Setup failed"));
        assert!(text.contains("ERR_FILE_NOT_FOUND"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_error() {
        let err = HarnessError::config("sweep is empty");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("sweep is empty"));
    }
}

//! Settle waits.
//!
//! After a state-changing action (add, delete, toggle, theme switch, resize)
//! the harness polls the page until the expected state is observable instead
//! of sleeping for a fixed time. Polling backs off exponentially and gives up
//! after a bounded timeout; giving up is not an error, the caller asserts on
//! whatever the page shows at that point.

use crate::error::DriverResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default upper bound for a settle wait (2 seconds)
pub const DEFAULT_SETTLE_TIMEOUT_MS: u64 = 2_000;

/// Default first polling interval (25ms)
pub const DEFAULT_INITIAL_INTERVAL_MS: u64 = 25;

/// Default ceiling for the polling interval (400ms)
pub const DEFAULT_MAX_INTERVAL_MS: u64 = 400;

/// Default growth factor between polls
pub const DEFAULT_BACKOFF_MULTIPLIER: u32 = 2;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for settle waits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// First polling interval in milliseconds
    pub initial_interval_ms: u64,
    /// Largest polling interval in milliseconds
    pub max_interval_ms: u64,
    /// Interval growth factor (1 = constant polling)
    pub multiplier: u32,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_SETTLE_TIMEOUT_MS,
            initial_interval_ms: DEFAULT_INITIAL_INTERVAL_MS,
            max_interval_ms: DEFAULT_MAX_INTERVAL_MS,
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the first polling interval in milliseconds
    #[must_use]
    pub const fn with_initial_interval(mut self, interval_ms: u64) -> Self {
        self.initial_interval_ms = interval_ms;
        self
    }

    /// Set the polling interval ceiling in milliseconds
    #[must_use]
    pub const fn with_max_interval(mut self, interval_ms: u64) -> Self {
        self.max_interval_ms = interval_ms;
        self
    }

    /// Set the backoff multiplier
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Polling intervals, growing until the ceiling
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        let max = Duration::from_millis(self.max_interval_ms.max(self.initial_interval_ms));
        Backoff {
            next: Duration::from_millis(self.initial_interval_ms),
            max,
            multiplier: self.multiplier.max(1),
        }
    }
}

/// Infinite sequence of polling intervals
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    max: Duration,
    multiplier: u32,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next;
        self.next = current.saturating_mul(self.multiplier).min(self.max);
        Some(current)
    }
}

// =============================================================================
// WAIT CONDITIONS
// =============================================================================

/// Something observable on the page that a wait can poll
#[async_trait]
pub trait WaitCondition: Send + Sync {
    /// Observe the page once
    async fn check(&self) -> DriverResult<bool>;

    /// Human-readable description for logs
    fn description(&self) -> String;
}

/// Outcome of a settle wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitResult {
    /// Whether the condition held before the timeout
    pub satisfied: bool,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of observations made
    pub attempts: u32,
    /// What was waited for
    pub waited_for: String,
}

impl WaitResult {
    /// Whether the wait gave up
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        !self.satisfied
    }
}

/// Poll `condition` until it holds or `options.timeout` elapses.
///
/// The condition is always observed at least once, and once more after the
/// deadline passes, so a zero timeout degenerates into a single check.
/// Adapter errors abort the wait and propagate.
pub async fn wait_for<C>(condition: &C, options: &WaitOptions) -> DriverResult<WaitResult>
where
    C: WaitCondition + ?Sized,
{
    let start = Instant::now();
    let deadline = options.timeout();
    let mut intervals = options.backoff();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        if condition.check().await? {
            return Ok(WaitResult {
                satisfied: true,
                elapsed: start.elapsed(),
                attempts,
                waited_for: condition.description(),
            });
        }

        let elapsed = start.elapsed();
        if elapsed >= deadline {
            tracing::debug!(
                condition = %condition.description(),
                attempts,
                "settle wait timed out"
            );
            return Ok(WaitResult {
                satisfied: false,
                elapsed,
                attempts,
                waited_for: condition.description(),
            });
        }

        let pause = intervals
            .next()
            .unwrap_or(Duration::ZERO)
            .min(deadline - elapsed);
        tokio::time::sleep(pause).await;
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Harness configuration.
//!
//! `HarnessConfig::default()` reproduces the fixed acceptance run; every field
//! can be overridden from a YAML file or by the CLI.

use crate::error::{HarnessError, HarnessResult};
use crate::wait::WaitOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default quiet period for checks that expect nothing to change (200ms)
pub const DEFAULT_QUIET_PERIOD_MS: u64 = 200;

/// File name of the page under test, next to the harness
pub const DEFAULT_APP_FILE: &str = "index.html";

/// A named viewport size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSpec {
    /// Display label (e.g. "모바일")
    pub label: String,
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
}

impl ViewportSpec {
    /// Create a viewport, rejecting zero dimensions
    pub fn new(label: impl Into<String>, width: u32, height: u32) -> HarnessResult<Self> {
        let spec = Self {
            label: label.into(),
            width,
            height,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check that both dimensions are positive
    pub fn validate(&self) -> HarnessResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HarnessError::config(format!(
                "viewport '{}' must have positive dimensions, got {}x{}",
                self.label, self.width, self.height
            )));
        }
        Ok(())
    }

    /// Rendered area in square pixels
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// The desktop size the run starts with
    #[must_use]
    pub fn desktop() -> Self {
        Self {
            label: "데스크톱".to_string(),
            width: 1280,
            height: 800,
        }
    }

    /// Tablet portrait size
    #[must_use]
    pub fn tablet() -> Self {
        Self {
            label: "태블릿".to_string(),
            width: 768,
            height: 1024,
        }
    }

    /// Phone portrait size
    #[must_use]
    pub fn mobile() -> Self {
        Self {
            label: "모바일".to_string(),
            width: 375,
            height: 667,
        }
    }
}

impl std::fmt::Display for ViewportSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}x{})", self.label, self.width, self.height)
    }
}

/// Configuration for one acceptance run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Path of the page under test
    pub app_path: PathBuf,
    /// Run the browser without a window
    pub headless: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<PathBuf>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Viewport the run starts with
    pub viewport: ViewportSpec,
    /// Viewports visited by the responsive sweep, in order
    pub sweep: Vec<ViewportSpec>,
    /// Directory screenshots are written to
    pub artifact_dir: PathBuf,
    /// Settle wait tuning
    pub wait: WaitOptions,
    /// Pause used when a check expects the page not to change
    pub quiet_period_ms: u64,
    /// Pause before closing the browser, for a human watching a headed run
    pub final_pause_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            app_path: default_app_path(),
            headless: true,
            chromium_path: None,
            sandbox: true,
            viewport: ViewportSpec::desktop(),
            sweep: vec![
                ViewportSpec::desktop(),
                ViewportSpec::tablet(),
                ViewportSpec::mobile(),
            ],
            artifact_dir: PathBuf::from("."),
            wait: WaitOptions::default(),
            quiet_period_ms: DEFAULT_QUIET_PERIOD_MS,
            final_pause_ms: 0,
        }
    }
}

impl HarnessConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document; missing fields keep their defaults
    pub fn from_yaml_str(yaml: &str) -> HarnessResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file
    pub fn load(path: &Path) -> HarnessResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Reject configurations the run cannot honor
    pub fn validate(&self) -> HarnessResult<()> {
        self.viewport.validate()?;
        if self.sweep.is_empty() {
            return Err(HarnessError::config(
                "responsive sweep needs at least one viewport",
            ));
        }
        for viewport in &self.sweep {
            viewport.validate()?;
        }
        Ok(())
    }

    /// Set the page under test
    #[must_use]
    pub fn with_app_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.app_path = path.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set the screenshot directory
    #[must_use]
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    /// Replace the responsive sweep
    #[must_use]
    pub fn with_sweep(mut self, sweep: Vec<ViewportSpec>) -> Self {
        self.sweep = sweep;
        self
    }

    /// Set settle wait tuning
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Set the quiet period in milliseconds
    #[must_use]
    pub const fn with_quiet_period(mut self, ms: u64) -> Self {
        self.quiet_period_ms = ms;
        self
    }

    /// Set the pause before closing in milliseconds
    #[must_use]
    pub const fn with_final_pause(mut self, ms: u64) -> Self {
        self.final_pause_ms = ms;
        self
    }

    /// Quiet period as Duration
    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    /// Final pause as Duration
    #[must_use]
    pub const fn final_pause(&self) -> Duration {
        Duration::from_millis(self.final_pause_ms)
    }

    /// Smallest viewport of the sweep (by area), used for the mobile capture
    #[must_use]
    pub fn smallest_viewport(&self) -> Option<&ViewportSpec> {
        self.sweep.iter().min_by_key(|v| v.area())
    }

    /// `file://` URL of the page under test
    #[must_use]
    pub fn app_url(&self) -> String {
        file_url(&self.app_path)
    }
}

/// `index.html` next to the running executable, else at the workspace root
#[must_use]
pub fn default_app_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    resolve_app_path(exe_dir.as_deref())
}

fn resolve_app_path(exe_dir: Option<&Path>) -> PathBuf {
    if let Some(candidate) = exe_dir.map(|dir| dir.join(DEFAULT_APP_FILE)) {
        if candidate.is_file() {
            return candidate;
        }
    }
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(DEFAULT_APP_FILE)
}

/// Build a `file:///` URL from a filesystem path
#[must_use]
pub fn file_url(path: &Path) -> String {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    });
    let text = resolved.to_string_lossy().replace('\\', "/");
    format!("file:///{}", text.trim_start_matches('/'))
}

//! CLI configuration

use crate::commands::Cli;
use crate::error::CliResult;
use listprobe::{HarnessConfig, Reporter};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Quiet - failures and a failing summary only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - info logs on stderr
    Verbose,
    /// Debug - debug logs on stderr
    Debug,
}

impl Verbosity {
    /// Derive from the `-q` flag and the `-v` count; quiet wins
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Default log filter for this level
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }
}

/// Resolved CLI settings
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Settings for the run itself
    pub harness: HarnessConfig,
}

impl CliConfig {
    /// Load the config file (if any) and apply command-line overrides
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let mut harness = match &cli.config {
            Some(path) => HarnessConfig::load(path)?,
            None => HarnessConfig::default(),
        };

        if let Some(app) = &cli.app {
            harness = harness.with_app_path(app);
        }
        if cli.headed {
            harness = harness.with_headless(false);
        }
        if let Some(chromium) = &cli.chromium {
            harness = harness.with_chromium_path(chromium);
        }
        if cli.no_sandbox {
            harness = harness.with_no_sandbox();
        }
        if let Some(dir) = &cli.artifacts {
            harness = harness.with_artifact_dir(dir);
        }
        if let Some(pause) = cli.pause_ms {
            harness = harness.with_final_pause(pause);
        }
        harness.validate()?;

        Ok(Self {
            verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
            color: cli.color.into(),
            harness,
        })
    }

    /// Console reporter honoring colour and quiet settings
    #[must_use]
    pub fn reporter(&self) -> Reporter {
        Reporter::new(self.color.should_color(), self.verbosity.is_quiet())
    }
}

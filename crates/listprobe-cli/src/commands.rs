//! CLI command definitions using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Listprobe: run the shopping-list acceptance suite in Chromium
#[derive(Parser, Debug)]
#[command(name = "listprobe")]
#[command(author, version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "LISTPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Page under test (defaults to index.html at the workspace root)
    #[arg(long, env = "LISTPROBE_APP")]
    pub app: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Path to the chromium binary
    #[arg(long, env = "LISTPROBE_CHROMIUM")]
    pub chromium: Option<PathBuf>,

    /// Disable the chromium sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Directory screenshots are written to
    #[arg(long)]
    pub artifacts: Option<PathBuf>,

    /// Pause before closing the browser, in milliseconds
    #[arg(long)]
    pub pause_ms: Option<u64>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only failures and a failing summary)
    #[arg(short, long)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorArg,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["listprobe"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.headed);
        assert!(!cli.no_sandbox);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.color, ColorArg::Auto);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "listprobe",
            "--config",
            "listprobe.yaml",
            "--app",
            "site/index.html",
            "--headed",
            "--chromium",
            "/usr/bin/chromium",
            "--no-sandbox",
            "--artifacts",
            "shots",
            "--pause-ms",
            "5000",
            "--color",
            "never",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("listprobe.yaml")));
        assert_eq!(cli.app, Some(PathBuf::from("site/index.html")));
        assert!(cli.headed);
        assert_eq!(cli.chromium, Some(PathBuf::from("/usr/bin/chromium")));
        assert!(cli.no_sandbox);
        assert_eq!(cli.artifacts, Some(PathBuf::from("shots")));
        assert_eq!(cli.pause_ms, Some(5000));
        assert_eq!(cli.color, ColorArg::Never);
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["listprobe", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_invalid_color_rejected() {
        assert!(Cli::try_parse_from(["listprobe", "--color", "sometimes"]).is_err());
    }

    #[test]
    fn test_pause_must_be_number() {
        assert!(Cli::try_parse_from(["listprobe", "--pause-ms", "soon"]).is_err());
    }

    #[test]
    fn test_color_arg_conversion() {
        assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
        assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
    }

    #[test]
    fn test_command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

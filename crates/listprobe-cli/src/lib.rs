//! Listprobe CLI Library
//!
//! Argument parsing, configuration merging, logging setup and suite
//! execution for the `listprobe` binary.

#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod logging;
mod runner;

pub use commands::{Cli, ColorArg};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use runner::{run_suite, run_with};

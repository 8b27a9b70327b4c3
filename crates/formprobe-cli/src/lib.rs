//! Formprobe CLI library
//!
//! Command-line runner for the profile form scenarios.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)] // durations shown with two decimals

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, FixturesArgs, FormatArg, ListArgs, RunArgs, SuiteArg,
};
pub use config::{load_harness_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{format_catalog, format_result, format_summary, ProgressReporter};
pub use runner::{load_fixtures, resolve_config, scenario_filter, RunCommand};

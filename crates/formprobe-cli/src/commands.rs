//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use formprobe::Suite;
use std::path::PathBuf;

/// Formprobe: page-object checks for the user profile creation form
#[derive(Parser, Debug)]
#[command(name = "formprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against the profile form
    Run(RunArgs),

    /// List the scenario catalog
    List(ListArgs),

    /// Print the built-in fixtures as YAML
    Fixtures(FixturesArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Root URL of the application under test
    #[arg(long)]
    pub base_url: Option<String>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Fixture file (YAML) replacing the built-in fixtures
    #[arg(long)]
    pub fixtures: Option<PathBuf>,

    /// Only run scenarios of this suite
    #[arg(short, long)]
    pub suite: Option<SuiteArg>,

    /// Only run scenarios whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Disable the Chromium sandbox (containers, CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Element wait timeout in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Run against the built-in simulation of the form instead of a browser
    #[arg(long)]
    pub simulate: bool,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list scenarios of this suite
    #[arg(short, long)]
    pub suite: Option<SuiteArg>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the fixtures command
#[derive(Parser, Debug)]
pub struct FixturesArgs {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Suite selection
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuiteArg {
    /// Required fields present or missing
    #[value(alias = "mandatory")]
    MandatoryFields,
    /// Format rules of individual fields
    #[value(alias = "field")]
    FieldValidation,
    /// Optional fields
    #[value(alias = "optional")]
    OptionalFields,
    /// Labels, options, markup and feedback
    #[value(alias = "ui")]
    UiDefects,
}

impl From<SuiteArg> for Suite {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::MandatoryFields => Self::MandatoryFields,
            SuiteArg::FieldValidation => Self::FieldValidation,
            SuiteArg::OptionalFields => Self::OptionalFields,
            SuiteArg::UiDefects => Self::UiDefects,
        }
    }
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

/// Color choice argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Auto-detect
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
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "formprobe",
            "-vv",
            "run",
            "--base-url",
            "http://127.0.0.1:8080",
            "--suite",
            "ui",
            "--filter",
            "label",
            "--headed",
            "--no-sandbox",
            "--timeout",
            "2000",
            "--format",
            "json",
            "--fail-fast",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.base_url.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(args.suite, Some(SuiteArg::UiDefects));
        assert_eq!(args.filter.as_deref(), Some("label"));
        assert!(args.headed && args.no_sandbox && args.fail_fast);
        assert!(!args.simulate);
        assert_eq!(args.timeout, Some(2000));
        assert_eq!(args.format, FormatArg::Json);
    }

    #[test]
    fn test_suite_arg_maps_to_suite() {
        for (arg, suite) in [
            (SuiteArg::MandatoryFields, Suite::MandatoryFields),
            (SuiteArg::FieldValidation, Suite::FieldValidation),
            (SuiteArg::OptionalFields, Suite::OptionalFields),
            (SuiteArg::UiDefects, Suite::UiDefects),
        ] {
            assert_eq!(Suite::from(arg), suite);
        }
    }

    #[test]
    fn test_unknown_suite_rejected() {
        assert!(Cli::try_parse_from(["formprobe", "list", "--suite", "smoke"]).is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["formprobe"]).is_err());
    }
}

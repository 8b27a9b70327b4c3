//! Formprobe CLI: run the profile form scenarios
//!
//! ## Usage
//!
//! ```bash
//! formprobe run                           # All scenarios against localhost:3000
//! formprobe run --suite ui --format json  # One suite, machine-readable
//! formprobe run --simulate                # No browser needed
//! formprobe list                          # Scenario catalog
//! formprobe fixtures > fixtures.yaml      # Starting point for custom data
//! ```

use clap::Parser;
use formprobe::{FormFixtures, ScenarioFilter};
use formprobe_cli::{
    format_catalog, load_harness_config, Cli, CliConfig, CliError, CliResult, Commands,
    ConfigArgs, FixturesArgs, FormatArg, ListArgs, RunCommand, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ScenariosFailed { .. }) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match cli.command {
        Commands::Run(args) => RunCommand::new(config).execute(&args).map(|_| ()),
        Commands::List(args) => run_list(&args),
        Commands::Fixtures(args) => run_fixtures(&args),
        Commands::Config(args) => run_config(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into())
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_list(args: &ListArgs) -> CliResult<()> {
    let mut filter = ScenarioFilter::all();
    if let Some(suite) = args.suite {
        filter = filter.with_suite(suite.into());
    }
    let scenarios = filter.select();

    match args.format {
        FormatArg::Text => print!("{}", format_catalog(&scenarios)),
        FormatArg::Json => println!("{}", serde_json::to_string_pretty(&scenarios)?),
    }
    Ok(())
}

fn run_fixtures(args: &FixturesArgs) -> CliResult<()> {
    let yaml = FormFixtures::default().to_yaml()?;
    match args.output {
        Some(ref path) => std::fs::write(path, yaml)?,
        None => print!("{yaml}"),
    }
    Ok(())
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let config = load_harness_config(args.config.as_deref())?;
    let yaml = serde_yaml_ng::to_string(&config)
        .map_err(|e| CliError::config(format!("cannot render configuration: {e}")))?;
    print!("{yaml}");
    Ok(())
}

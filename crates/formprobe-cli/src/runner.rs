//! Scenario run orchestration

use crate::commands::{FormatArg, RunArgs};
use crate::config::{load_harness_config, CliConfig};
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use formprobe::{
    simulated_profile_app, FormFixtures, HarnessConfig, MockSessions, RunReport, ScenarioFilter,
    SessionFactory, SuiteRunner,
};
use tracing::info;

/// Harness configuration for a run: file, environment, then flags
pub fn resolve_config(args: &RunArgs) -> CliResult<HarnessConfig> {
    let mut config = load_harness_config(args.config.as_deref())?;
    if let Some(ref url) = args.base_url {
        config.base_url.clone_from(url);
    }
    if args.headed {
        config.browser.headless = false;
    }
    if args.no_sandbox {
        config.browser.sandbox = false;
    }
    if let Some(timeout) = args.timeout {
        config.element_timeout_ms = timeout;
    }
    if let Some(ref path) = args.fixtures {
        config.fixtures_path = Some(path.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Scenario selection from the run flags
#[must_use]
pub fn scenario_filter(args: &RunArgs) -> ScenarioFilter {
    let mut filter = ScenarioFilter::all();
    if let Some(suite) = args.suite {
        filter = filter.with_suite(suite.into());
    }
    if let Some(ref text) = args.filter {
        filter = filter.with_name(text.clone());
    }
    filter
}

/// Fixtures named by the configuration, or the built-in set
pub fn load_fixtures(config: &HarnessConfig) -> CliResult<FormFixtures> {
    match config.fixtures_path {
        Some(ref path) => Ok(FormFixtures::load(path)?),
        None => Ok(FormFixtures::default()),
    }
}

/// Executes `formprobe run`
#[derive(Debug)]
pub struct RunCommand {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl RunCommand {
    /// Create a run command with the given output settings
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, reporter }
    }

    /// Run the selected scenarios and print the report.
    ///
    /// Fails with [`CliError::ScenariosFailed`] when any scenario failed;
    /// known defects do not fail the run.
    pub fn execute(&mut self, args: &RunArgs) -> CliResult<RunReport> {
        let harness = resolve_config(args)?;
        let fixtures = load_fixtures(&harness)?;
        let filter = scenario_filter(args);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let report = runtime.block_on(self.run_sessions(&harness, fixtures, &filter, args))?;

        match args.format {
            FormatArg::Text => self.reporter.summary(&report),
            FormatArg::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        if report.is_success() {
            Ok(report)
        } else {
            Err(CliError::ScenariosFailed {
                failed: report.failed(),
                total: report.total(),
            })
        }
    }

    async fn run_sessions(
        &mut self,
        harness: &HarnessConfig,
        fixtures: FormFixtures,
        filter: &ScenarioFilter,
        args: &RunArgs,
    ) -> CliResult<RunReport> {
        if args.simulate {
            info!(base_url = %harness.base_url, "running against the simulated form");
            let sessions = MockSessions::new(simulated_profile_app(&harness.base_url));
            return Ok(self.run_suite(sessions, harness, fixtures, filter, args).await);
        }
        self.run_browser(harness, fixtures, filter, args).await
    }

    #[cfg(feature = "browser")]
    async fn run_browser(
        &mut self,
        harness: &HarnessConfig,
        fixtures: FormFixtures,
        filter: &ScenarioFilter,
        args: &RunArgs,
    ) -> CliResult<RunReport> {
        info!(
            base_url = %harness.base_url,
            headless = harness.browser.headless,
            "launching chromium"
        );
        let sessions = formprobe::ChromiumSessions::launch(&harness.browser).await?;
        let runner = self.runner(sessions, harness, fixtures, args);
        let report = self.drive(&runner, filter, args).await;
        runner.into_factory().shutdown().await?;
        Ok(report)
    }

    #[cfg(not(feature = "browser"))]
    async fn run_browser(
        &mut self,
        _harness: &HarnessConfig,
        _fixtures: FormFixtures,
        _filter: &ScenarioFilter,
        _args: &RunArgs,
    ) -> CliResult<RunReport> {
        Err(CliError::Unsupported(
            "browser support not compiled in; rebuild with --features browser or use --simulate"
                .to_string(),
        ))
    }

    async fn run_suite<F: SessionFactory>(
        &mut self,
        factory: F,
        harness: &HarnessConfig,
        fixtures: FormFixtures,
        filter: &ScenarioFilter,
        args: &RunArgs,
    ) -> RunReport {
        let runner = self.runner(factory, harness, fixtures, args);
        self.drive(&runner, filter, args).await
    }

    fn runner<F: SessionFactory>(
        &self,
        factory: F,
        harness: &HarnessConfig,
        fixtures: FormFixtures,
        args: &RunArgs,
    ) -> SuiteRunner<F> {
        SuiteRunner::new(factory, harness.base_url.clone())
            .with_fixtures(fixtures)
            .with_wait_options(harness.wait_options())
            .with_fail_fast(args.fail_fast)
    }

    async fn drive<F: SessionFactory>(
        &mut self,
        runner: &SuiteRunner<F>,
        filter: &ScenarioFilter,
        args: &RunArgs,
    ) -> RunReport {
        let text = args.format == FormatArg::Text;
        if text {
            self.reporter
                .header(&format!("Profile form checks against {}", runner.base_url()));
            self.reporter
                .start_progress(filter.select().len() as u64, "starting");
        }

        let reporter = &self.reporter;
        let report = runner
            .run_with_progress(filter, |scenario, result| {
                if text {
                    reporter.scenario_finished(scenario, result);
                }
            })
            .await;

        self.reporter.finish();
        if text && self.config.verbosity.is_verbose() {
            self.reporter.info(&format!("run id {}", report.run_id));
        }
        report
    }
}

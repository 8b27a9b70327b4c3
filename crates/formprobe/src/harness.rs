//! Suite runner.
//!
//! Scenarios run strictly one after another, each in a fresh session that is
//! opened before and closed after the scenario, whether it passed or not.

use crate::driver::ProbeDriver;
use crate::fixtures::FormFixtures;
use crate::mock::MockDriver;
use crate::profile_form::ProfileFormPage;
use crate::result::ProbeResult;
use crate::scenario::{catalog, run_scenario, Scenario, Suite};
use crate::wait::WaitOptions;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

/// Opens and closes browser sessions for the runner
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Session type handed to scenarios
    type Driver: ProbeDriver;

    /// Open a fresh session
    async fn open(&self) -> ProbeResult<Self::Driver>;

    /// Close a session opened by this factory
    async fn close(&self, driver: Self::Driver) -> ProbeResult<()>;
}

/// Sessions cloned from a template [`MockDriver`]
#[derive(Debug, Clone)]
pub struct MockSessions {
    template: MockDriver,
}

impl MockSessions {
    /// Every session starts as a copy of `template`
    #[must_use]
    pub const fn new(template: MockDriver) -> Self {
        Self { template }
    }
}

#[async_trait]
impl SessionFactory for MockSessions {
    type Driver = MockDriver;

    async fn open(&self) -> ProbeResult<MockDriver> {
        Ok(self.template.clone())
    }

    async fn close(&self, _driver: MockDriver) -> ProbeResult<()> {
        Ok(())
    }
}

/// Classified result of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "kebab-case")]
pub enum Outcome {
    /// Behaved as expected
    Passed,
    /// Did not behave as expected and no defect is documented
    Failed(String),
    /// Failed the way its documented defect predicts
    KnownDefect(String),
    /// A documented defect did not reproduce
    UnexpectedPass,
}

impl Outcome {
    /// Classify a scenario's result against its documented defect.
    ///
    /// Only assertion failures count as the documented defect; a timeout or
    /// session error in a known-defect scenario is still a failure.
    #[must_use]
    pub fn classify(scenario: &Scenario, result: &ProbeResult<()>) -> Self {
        match (result, scenario.known_defect) {
            (Ok(()), None) => Self::Passed,
            (Ok(()), Some(_)) => Self::UnexpectedPass,
            (Err(e), Some(_)) if e.is_assertion() => Self::KnownDefect(e.to_string()),
            (Err(e), _) => Self::Failed(e.to_string()),
        }
    }

    /// Whether this outcome fails the run
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Short label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed(_) => "FAIL",
            Self::KnownDefect(_) => "XFAIL",
            Self::UnexpectedPass => "XPASS",
        }
    }
}

/// Result of running a single scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: String,
    /// Suite
    pub suite: Suite,
    /// Classified outcome
    pub outcome: Outcome,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl ScenarioResult {
    /// Duration as Duration
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Report of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique id of this run
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Application under test
    pub base_url: String,
    /// Per-scenario results in run order
    pub results: Vec<ScenarioResult>,
    /// Total duration in milliseconds
    pub duration_ms: u64,
}

impl RunReport {
    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Number of scenarios run
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed))
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(Outcome::is_failure)
    }

    /// Count scenarios that reproduced their documented defect
    #[must_use]
    pub fn known_defects(&self) -> usize {
        self.count(|o| matches!(o, Outcome::KnownDefect(_)))
    }

    /// Count documented defects that did not reproduce
    #[must_use]
    pub fn unexpected_passes(&self) -> usize {
        self.count(|o| matches!(o, Outcome::UnexpectedPass))
    }

    /// Failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results
            .iter()
            .filter(|r| r.outcome.is_failure())
            .collect()
    }

    /// No scenario failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Selects scenarios by suite and name fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioFilter {
    /// Only this suite
    pub suite: Option<Suite>,
    /// Only names containing this text
    pub name_contains: Option<String>,
}

impl ScenarioFilter {
    /// Match everything
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one suite
    #[must_use]
    pub const fn with_suite(mut self, suite: Suite) -> Self {
        self.suite = Some(suite);
        self
    }

    /// Restrict to names containing `text`
    #[must_use]
    pub fn with_name(mut self, text: impl Into<String>) -> Self {
        self.name_contains = Some(text.into());
        self
    }

    /// Whether `scenario` is selected
    #[must_use]
    pub fn matches(&self, scenario: &Scenario) -> bool {
        self.suite.map_or(true, |s| s == scenario.suite)
            && self
                .name_contains
                .as_deref()
                .map_or(true, |text| scenario.name.contains(text))
    }

    /// Selected scenarios in catalog order
    #[must_use]
    pub fn select(&self) -> Vec<&'static Scenario> {
        catalog().iter().filter(|s| self.matches(s)).collect()
    }
}

/// Sequential suite runner
#[derive(Debug)]
pub struct SuiteRunner<F: SessionFactory> {
    factory: F,
    base_url: String,
    fixtures: FormFixtures,
    wait: WaitOptions,
    fail_fast: bool,
}

impl<F: SessionFactory> SuiteRunner<F> {
    /// Runner against the form at `base_url`
    pub fn new(factory: F, base_url: impl Into<String>) -> Self {
        Self {
            factory,
            base_url: base_url.into(),
            fixtures: FormFixtures::default(),
            wait: WaitOptions::default(),
            fail_fast: false,
        }
    }

    /// Use custom fixtures
    #[must_use]
    pub fn with_fixtures(mut self, fixtures: FormFixtures) -> Self {
        self.fixtures = fixtures;
        self
    }

    /// Use custom wait options
    #[must_use]
    pub fn with_wait_options(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Stop after the first failed scenario
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// The session factory
    #[must_use]
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Give the session factory back, e.g. to shut a shared browser down
    pub fn into_factory(self) -> F {
        self.factory
    }

    /// Application under test
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run every selected scenario
    pub async fn run(&self, filter: &ScenarioFilter) -> RunReport {
        self.run_with_progress(filter, |_, _| {}).await
    }

    /// Run every selected scenario, reporting each result as it completes
    pub async fn run_with_progress(
        &self,
        filter: &ScenarioFilter,
        mut on_result: impl FnMut(&Scenario, &ScenarioResult),
    ) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::new();

        for scenario in filter.select() {
            let result = self.run_one(scenario).await;
            on_result(scenario, &result);
            let stop = self.fail_fast && result.outcome.is_failure();
            results.push(result);
            if stop {
                warn!(scenario = scenario.name, "fail-fast: stopping run");
                break;
            }
        }

        RunReport {
            run_id: Uuid::new_v4(),
            started_at,
            base_url: self.base_url.clone(),
            results,
            duration_ms: millis(start.elapsed()),
        }
    }

    /// Run one scenario in its own session
    pub async fn run_one(&self, scenario: &Scenario) -> ScenarioResult {
        info!(scenario = scenario.name, suite = %scenario.suite, "scenario started");
        let start = Instant::now();

        let result = match self.factory.open().await {
            Ok(mut driver) => {
                let result = self.execute(scenario, &mut driver).await;
                if let Err(e) = self.factory.close(driver).await {
                    warn!(scenario = scenario.name, error = %e, "failed to close session");
                }
                result
            }
            Err(e) => Err(e),
        };

        let outcome = Outcome::classify(scenario, &result);
        match &outcome {
            Outcome::UnexpectedPass => warn!(
                scenario = scenario.name,
                defect = scenario.known_defect.unwrap_or_default(),
                "documented defect did not reproduce"
            ),
            other => info!(scenario = scenario.name, outcome = other.label(), "scenario finished"),
        }

        ScenarioResult {
            name: scenario.name.to_string(),
            suite: scenario.suite,
            outcome,
            duration_ms: millis(start.elapsed()),
        }
    }

    async fn execute(&self, scenario: &Scenario, driver: &mut F::Driver) -> ProbeResult<()> {
        let mut page = ProfileFormPage::with_options(driver, self.wait);
        page.navigate_to_form(&self.base_url).await?;
        run_scenario(scenario.id, &mut page, &self.fixtures).await
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ProbeError;
    use crate::scenario::ScenarioId;
    use crate::simulated::simulated_profile_app;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const BASE: &str = "http://form.test";

    fn runner() -> SuiteRunner<MockSessions> {
        SuiteRunner::new(MockSessions::new(simulated_profile_app(BASE)), BASE)
    }

    /// Counts opens and closes; sessions point at an unreachable URL
    #[derive(Debug, Default, Clone)]
    struct CountingSessions {
        opened: Arc<AtomicUsize>,
        closed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SessionFactory for CountingSessions {
        type Driver = MockDriver;

        async fn open(&self) -> ProbeResult<MockDriver> {
            let _ = self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(MockDriver::new())
        }

        async fn close(&self, _driver: MockDriver) -> ProbeResult<()> {
            let _ = self.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn test_classify() {
            let plain = ScenarioId::EmailInvalid.scenario();
            let defect = ScenarioId::LinkedinOptional.scenario();
            let assertion = Err(ProbeError::assertion("nope"));
            let timeout = Err(ProbeError::Timeout {
                selector: ".error-message".to_string(),
                ms: 5000,
            });

            assert_eq!(Outcome::classify(plain, &Ok(())), Outcome::Passed);
            assert_eq!(Outcome::classify(defect, &Ok(())), Outcome::UnexpectedPass);
            assert!(matches!(
                Outcome::classify(defect, &assertion),
                Outcome::KnownDefect(_)
            ));
            assert!(Outcome::classify(defect, &timeout).is_failure());
            assert!(Outcome::classify(plain, &assertion).is_failure());
        }

        #[test]
        fn test_outcome_json() {
            let json = serde_json::to_string(&Outcome::KnownDefect("x".to_string())).unwrap();
            assert_eq!(json, r#"{"status":"known-defect","message":"x"}"#);
            let json = serde_json::to_string(&Outcome::Passed).unwrap();
            assert_eq!(json, r#"{"status":"passed"}"#);
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_select_all() {
            assert_eq!(ScenarioFilter::all().select().len(), catalog().len());
        }

        #[test]
        fn test_select_by_suite_and_name() {
            let ui = ScenarioFilter::all().with_suite(Suite::UiDefects).select();
            assert_eq!(ui.len(), 7);
            let phone = ScenarioFilter::all().with_name("phone").select();
            assert_eq!(phone.len(), 3);
            let none = ScenarioFilter::all()
                .with_suite(Suite::UiDefects)
                .with_name("phone")
                .select();
            assert!(none.is_empty());
        }
    }

    mod runner_tests {
        use super::*;

        #[tokio::test]
        async fn test_full_run_against_simulated_app() {
            let report = runner().run(&ScenarioFilter::all()).await;
            assert_eq!(report.total(), 24);
            assert_eq!(report.failed(), 0, "{:?}", report.failures());
            assert_eq!(report.known_defects(), 11);
            assert_eq!(report.passed(), 13);
            assert_eq!(report.unexpected_passes(), 0);
            assert!(report.is_success());
            assert_eq!(report.base_url, BASE);
        }

        #[tokio::test]
        async fn test_fixed_defect_is_unexpected_pass() {
            let mut fixtures = FormFixtures::default();
            fixtures.ui.address_label = "Address (optioal)".to_string();
            let report = runner()
                .with_fixtures(fixtures)
                .run(&ScenarioFilter::all().with_name("address-label"))
                .await;
            assert_eq!(report.results[0].outcome, Outcome::UnexpectedPass);
            assert!(report.is_success());
        }

        #[tokio::test]
        async fn test_sessions_closed_after_failure() {
            let sessions = CountingSessions::default();
            let runner = SuiteRunner::new(sessions.clone(), BASE);
            let report = runner
                .run(&ScenarioFilter::all().with_suite(Suite::FieldValidation))
                .await;
            assert_eq!(report.failed(), 5);
            assert_eq!(sessions.opened.load(Ordering::SeqCst), 5);
            assert_eq!(sessions.closed.load(Ordering::SeqCst), 5);
            assert!(matches!(
                &report.results[0].outcome,
                Outcome::Failed(msg) if msg.contains("Navigation")
            ));
        }

        #[tokio::test]
        async fn test_fail_fast_stops_after_first_failure() {
            let runner = SuiteRunner::new(CountingSessions::default(), BASE).with_fail_fast(true);
            let mut seen = Vec::new();
            let report = runner
                .run_with_progress(&ScenarioFilter::all(), |s, _| seen.push(s.name))
                .await;
            assert_eq!(report.total(), 1);
            assert_eq!(seen, ["all-mandatory-fields-valid"]);
            assert!(!report.is_success());
        }

        #[tokio::test]
        async fn test_report_serializes() {
            let report = runner()
                .run(&ScenarioFilter::all().with_name("first-name-missing"))
                .await;
            let json = serde_json::to_value(&report).unwrap();
            assert_eq!(json["results"][0]["name"], "first-name-missing");
            assert_eq!(json["results"][0]["suite"], "mandatory-fields");
            assert_eq!(json["results"][0]["outcome"]["status"], "passed");
        }
    }
}

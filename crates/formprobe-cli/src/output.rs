//! Output formatting and progress reporting

use console::{style, Style, Term};
use formprobe::{Outcome, RunReport, Scenario, ScenarioResult};
use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for scenario execution
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    /// Report one finished scenario
    pub fn scenario_finished(&self, scenario: &Scenario, result: &ScenarioResult) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
            pb.set_message(scenario.name.to_string());
        }
        if self.quiet && !result.outcome.is_failure() {
            return;
        }

        let line = format_result(scenario, result, self.use_color);
        match self.progress_bar {
            Some(ref pb) => pb.println(line),
            None => {
                let _ = self.term.write_line(&line);
            }
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print the run summary
    pub fn summary(&self, report: &RunReport) {
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format_summary(report, self.use_color));
    }
}

/// One line per scenario: label, name, then the reason when there is one
#[must_use]
pub fn format_result(scenario: &Scenario, result: &ScenarioResult, use_color: bool) -> String {
    let label = result.outcome.label();
    let label = if use_color {
        let styled = match result.outcome {
            Outcome::Passed => style(label).green().bold(),
            Outcome::Failed(_) => style(label).red().bold(),
            Outcome::KnownDefect(_) => style(label).yellow(),
            Outcome::UnexpectedPass => style(label).magenta().bold(),
        };
        styled.to_string()
    } else {
        label.to_string()
    };

    let detail = match &result.outcome {
        Outcome::Passed => String::new(),
        Outcome::Failed(message) => format!(": {message}"),
        Outcome::KnownDefect(_) => scenario
            .known_defect
            .map(|defect| format!(" (known defect: {defect})"))
            .unwrap_or_default(),
        Outcome::UnexpectedPass => " (documented defect no longer reproduces)".to_string(),
    };

    format!(
        "{label:>5} {} [{}ms]{detail}",
        scenario.name, result.duration_ms
    )
}

/// Totals line for a finished run
#[must_use]
pub fn format_summary(report: &RunReport, use_color: bool) -> String {
    let status = if report.is_success() { "PASSED" } else { "FAILED" };
    let secs = report.duration_ms as f64 / 1000.0;
    let counts = format!(
        "{} scenarios in {secs:.2}s ({} passed, {} failed, {} known defects, {} unexpected passes)",
        report.total(),
        report.passed(),
        report.failed(),
        report.known_defects(),
        report.unexpected_passes(),
    );

    if use_color {
        let status_style = if report.is_success() {
            Style::new().green().bold()
        } else {
            Style::new().red().bold()
        };
        format!("{} {counts}", status_style.apply_to(status))
    } else {
        format!("{status} {counts}")
    }
}

/// The scenario catalog as text, one scenario per line
#[must_use]
pub fn format_catalog(scenarios: &[&Scenario]) -> String {
    let width = scenarios.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for scenario in scenarios {
        let marker = if scenario.known_defect.is_some() {
            "*"
        } else {
            " "
        };
        out.push_str(&format!(
            "{marker} {:<width$}  {:<16}  {}\n",
            scenario.name,
            scenario.suite.name(),
            scenario.description,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use formprobe::{find, Suite};

    fn result(outcome: Outcome) -> ScenarioResult {
        ScenarioResult {
            name: "password-empty".to_string(),
            suite: Suite::MandatoryFields,
            outcome,
            duration_ms: 12,
        }
    }

    mod result_line_tests {
        use super::*;

        #[test]
        fn test_pass_line() {
            let scenario = find("password-empty").unwrap();
            let line = format_result(scenario, &result(Outcome::Passed), false);
            assert_eq!(line, " PASS password-empty [12ms]");
        }

        #[test]
        fn test_known_defect_line_names_defect() {
            let scenario = find("password-empty").unwrap();
            let line = format_result(
                scenario,
                &result(Outcome::KnownDefect("Assertion failed".to_string())),
                false,
            );
            assert!(line.starts_with("XFAIL password-empty"));
            assert!(line.contains("known defect: \"Passwords do not match\""));
        }

        #[test]
        fn test_failure_line_has_reason() {
            let scenario = find("password-empty").unwrap();
            let line = format_result(
                scenario,
                &result(Outcome::Failed("No element matches #password".to_string())),
                false,
            );
            assert!(line.ends_with(": No element matches #password"));
        }
    }

    mod catalog_tests {
        use super::*;

        #[test]
        fn test_catalog_marks_known_defects() {
            let scenarios: Vec<_> = formprobe::catalog().iter().collect();
            let text = format_catalog(&scenarios);
            assert_eq!(text.lines().count(), scenarios.len());
            let linkedin = text
                .lines()
                .find(|l| l.contains("linkedin-optional"))
                .unwrap();
            assert!(linkedin.starts_with('*'));
            let first = text
                .lines()
                .find(|l| l.contains("first-name-missing"))
                .unwrap();
            assert!(first.starts_with(' '));
        }
    }
}

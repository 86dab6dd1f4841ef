//! Run report rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::runner::{CheckResult, Outcome};

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Deployment that was checked.
    pub base_url: String,
    /// Run start.
    pub started_at: DateTime<Utc>,
    /// Run end.
    pub finished_at: DateTime<Utc>,
    /// Every check, in execution order.
    pub results: Vec<CheckResult>,
}

/// Outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Passed checks.
    pub passed: usize,
    /// Failed checks.
    pub failed: usize,
    /// Skipped checks.
    pub skipped: usize,
}

impl Tally {
    fn add(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed(_) => self.failed += 1,
            Outcome::Skipped(_) => self.skipped += 1,
        }
    }

    /// All checks counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

/// Output formats of the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// One line per check plus totals.
    #[default]
    Text,
    /// The serialized [`Report`].
    Json,
}

impl Report {
    /// Totals over the whole run.
    #[must_use]
    pub fn tally(&self) -> Tally {
        let mut tally = Tally::default();
        for result in &self.results {
            tally.add(&result.outcome);
        }
        tally
    }

    /// Totals per suite, keyed by suite name.
    #[must_use]
    pub fn by_suite(&self) -> BTreeMap<&str, Tally> {
        let mut suites: BTreeMap<&str, Tally> = BTreeMap::new();
        for result in &self.results {
            suites
                .entry(result.suite.as_str())
                .or_default()
                .add(&result.outcome);
        }
        suites
    }

    /// Checks that failed.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| r.outcome.is_failed())
    }

    /// True when no check failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Render in `format`.
    pub fn render(&self, format: ReportFormat) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    /// Human-readable report.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "VetBuddy API smoke run against {}", self.base_url);
        let _ = writeln!(out, "{}", "=".repeat(60));

        let mut current_suite = "";
        for result in &self.results {
            if result.suite != current_suite {
                current_suite = result.suite.as_str();
                let _ = writeln!(out, "\n[{current_suite}]");
            }
            let (icon, status) = match &result.outcome {
                Outcome::Passed => ("✅", "PASS"),
                Outcome::Failed(_) => ("❌", "FAIL"),
                Outcome::Skipped(_) => ("⏭️", "SKIP"),
            };
            let _ = write!(out, "{icon} {status}: {} ({} ms)", result.name, result.elapsed_ms);
            if let Some(reason) = result.outcome.reason() {
                let _ = write!(out, " - {reason}");
            }
            out.push('\n');
        }

        let _ = writeln!(out, "\n{}", "=".repeat(60));
        let _ = writeln!(out, "SUMMARY");
        for (suite, tally) in self.by_suite() {
            let _ = writeln!(
                out,
                "  {suite:<14} {}/{} passed, {} failed, {} skipped",
                tally.passed,
                tally.total(),
                tally.failed,
                tally.skipped
            );
        }

        let tally = self.tally();
        let elapsed = self.finished_at - self.started_at;
        let _ = writeln!(
            out,
            "Total: {} checks, {} passed, {} failed, {} skipped in {:.1}s",
            tally.total(),
            tally.passed,
            tally.failed,
            tally.skipped,
            elapsed.num_milliseconds() as f64 / 1000.0
        );

        if tally.failed > 0 {
            let _ = writeln!(out, "\nFailed checks:");
            for result in self.failures() {
                let _ = writeln!(
                    out,
                    "  - {}/{}: {}",
                    result.suite,
                    result.name,
                    result.outcome.reason().unwrap_or_default()
                );
            }
        }
        out
    }
}

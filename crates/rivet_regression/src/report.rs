//! Per-case results and the aggregated regression report.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::case::{Priority, TestCase, TestCategory};

/// Outcome of one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    /// Case id.
    pub id: String,
    /// Case name.
    pub name: String,
    /// Case category.
    pub category: TestCategory,
    /// Case priority.
    pub priority: Priority,
    /// Whether every expectation and the custom check held.
    pub passed: bool,
    /// Wall-clock time spent on the case.
    pub duration: Duration,
    /// Failure description, including caught panics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CaseResult {
    /// Builds a result for `case`.
    pub fn new(case: &TestCase, duration: Duration, message: Option<String>) -> Self {
        Self {
            id: case.id.clone(),
            name: case.name.clone(),
            category: case.category,
            priority: case.priority,
            passed: message.is_none(),
            duration,
            message,
        }
    }
}

/// Pass/fail counts for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Cases run.
    pub total: usize,
    /// Cases passed.
    pub passed: usize,
    /// Cases failed.
    pub failed: usize,
}

/// Aggregate of a regression run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionReport {
    /// Results in execution order.
    pub results: Vec<CaseResult>,
    /// Cases run.
    pub total: usize,
    /// Cases passed.
    pub passed: usize,
    /// Cases failed.
    pub failed: usize,
    /// Wall-clock time for the whole run.
    pub duration: Duration,
    /// Counts per category.
    pub by_category: BTreeMap<TestCategory, CategorySummary>,
}

impl RegressionReport {
    /// Folds case results into a report.
    pub fn from_results(results: Vec<CaseResult>, duration: Duration) -> Self {
        let mut by_category: BTreeMap<TestCategory, CategorySummary> = BTreeMap::new();
        for result in &results {
            let entry = by_category.entry(result.category).or_default();
            entry.total += 1;
            if result.passed {
                entry.passed += 1;
            } else {
                entry.failed += 1;
            }
        }
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            duration,
            by_category,
            results,
        }
    }

    /// `true` when no case failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// The failing results.
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// One-line human summary.
    pub fn summary_line(&self) -> String {
        let status = if self.is_success() { "ok" } else { "FAILED" };
        format!(
            "test result: {status}. {} passed; {} failed; finished in {:.2}s",
            self.passed,
            self.failed,
            self.duration.as_secs_f64()
        )
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

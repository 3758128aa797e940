//! Executes cases, isolating each one and catching panics.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::case::{CaseContext, TestCase};
use crate::error::RegressionError;
use crate::registry::Registry;
use crate::report::{CaseResult, RegressionReport};

/// Runs cases from a [`Registry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Runner {
    /// Stop after the first failing case.
    pub fail_fast: bool,
}

impl Runner {
    /// A runner that runs every selected case.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets fail-fast mode.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Runs one case. Panics inside the case become failures.
    pub fn run_case(&self, case: &TestCase) -> CaseResult {
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| execute(case)));
        let message = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(message)) => Some(message),
            Err(payload) => Some(format!("panicked: {}", panic_message(payload.as_ref()))),
        };
        let result = CaseResult::new(case, start.elapsed(), message);
        match &result.message {
            None => debug!(case = %case.id, "passed"),
            Some(message) => warn!(case = %case.id, %message, "failed"),
        }
        result
    }

    /// Runs the case with `id`.
    pub fn run_id(&self, registry: &Registry, id: &str) -> Result<RegressionReport, RegressionError> {
        let case = registry
            .get(id)
            .ok_or_else(|| RegressionError::UnknownCase(id.to_string()))?;
        Ok(self.run_cases([case]))
    }

    /// Runs every case of `suite`.
    pub fn run_suite(
        &self,
        registry: &Registry,
        suite: &str,
    ) -> Result<RegressionReport, RegressionError> {
        let cases = registry.suite(suite)?;
        info!(suite, cases = cases.len(), "running suite");
        Ok(self.run_cases(cases))
    }

    /// Runs every case of each named suite, in order.
    pub fn run_suites(
        &self,
        registry: &Registry,
        suites: &[String],
    ) -> Result<RegressionReport, RegressionError> {
        let mut cases = Vec::new();
        for suite in suites {
            cases.extend(registry.suite(suite)?);
        }
        Ok(self.run_cases(cases))
    }

    /// Runs every registered case.
    pub fn run_all(&self, registry: &Registry) -> RegressionReport {
        info!(cases = registry.len(), "running all suites");
        self.run_cases(registry.all())
    }

    /// Runs `cases` in order and folds the results.
    pub fn run_cases<'a>(&self, cases: impl IntoIterator<Item = &'a TestCase>) -> RegressionReport {
        let start = Instant::now();
        let mut results = Vec::new();
        for case in cases {
            let result = self.run_case(case);
            let failed = !result.passed;
            results.push(result);
            if failed && self.fail_fast {
                break;
            }
        }
        RegressionReport::from_results(results, start.elapsed())
    }
}

fn execute(case: &TestCase) -> Result<(), String> {
    let context = CaseContext::build(case)?;
    for expectation in &case.expectations {
        context.verify(expectation)?;
    }
    if let Some(check) = case.check {
        check(&context)?;
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{Expectation, TestCategory};

    fn passing(id: &str) -> TestCase {
        TestCase::new(id, "passes", TestCategory::Unit)
            .source("module m(); endmodule")
            .expect(Expectation::Parses)
    }

    fn failing(id: &str) -> TestCase {
        TestCase::new(id, "fails", TestCategory::Unit)
            .source("module m(); endmodule")
            .expect(Expectation::ParseFails)
    }

    fn panicking(id: &str) -> TestCase {
        TestCase::new(id, "panics", TestCategory::EdgeCase).check(|_| panic!("kaboom"))
    }

    #[test]
    fn pass_and_fail() {
        let runner = Runner::new();
        assert!(runner.run_case(&passing("p")).passed);
        let result = runner.run_case(&failing("f"));
        assert!(!result.passed);
        assert!(result.message.unwrap().contains("expected no module"));
    }

    #[test]
    fn panics_are_caught() {
        let result = Runner::new().run_case(&panicking("x"));
        assert!(!result.passed);
        assert_eq!(result.message.as_deref(), Some("panicked: kaboom"));
    }

    #[test]
    fn fail_fast_stops_early() {
        let cases = [failing("a"), passing("b"), passing("c")];
        let report = Runner::new().fail_fast(true).run_cases(&cases);
        assert_eq!(report.total, 1);
        let report = Runner::new().run_cases(&cases);
        assert_eq!(report.total, 3);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn run_by_id_and_suite() {
        let mut reg = Registry::new();
        reg.register("s", passing("p1")).unwrap();
        reg.register("s", failing("f1")).unwrap();
        let runner = Runner::new();
        assert_eq!(runner.run_id(&reg, "p1").unwrap().passed, 1);
        assert!(matches!(
            runner.run_id(&reg, "zz"),
            Err(RegressionError::UnknownCase(_))
        ));
        let report = runner.run_suite(&reg, "s").unwrap();
        assert_eq!((report.passed, report.failed), (1, 1));
        assert!(runner.run_suites(&reg, &["s".into(), "t".into()]).is_err());
        assert_eq!(runner.run_all(&reg).total, 2);
    }
}

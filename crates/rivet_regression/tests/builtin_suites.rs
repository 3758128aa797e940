//! The shipped suites run green and report sensibly.

use rivet_regression::{Registry, Runner, TestCategory, BUILTIN_SUITES};

#[test]
fn all_builtin_cases_pass() {
    let registry = Registry::builtin();
    let report = Runner::new().run_all(&registry);
    assert_eq!(report.total, registry.len());
    for failure in report.failures() {
        panic!("{} failed: {:?}", failure.id, failure.message);
    }
    assert!(report.is_success());
}

#[test]
fn each_suite_runs_on_its_own() {
    let registry = Registry::builtin();
    let runner = Runner::new();
    let mut total = 0;
    for suite in BUILTIN_SUITES {
        let report = runner.run_suite(&registry, suite).unwrap();
        assert!(report.total > 0, "{suite}");
        assert!(report.is_success(), "{suite}");
        total += report.total;
    }
    assert_eq!(total, registry.len());
}

#[test]
fn single_case_by_id() {
    let registry = Registry::builtin();
    let report = Runner::new().run_id(&registry, "sim-003").unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.results[0].name, "flop fires from the first clock toggle");
}

#[test]
fn report_groups_by_category() {
    let report = Runner::new().run_all(&Registry::builtin());
    let summed: usize = report.by_category.values().map(|c| c.total).sum();
    assert_eq!(summed, report.total);
    assert!(report.by_category.contains_key(&TestCategory::EdgeCase));
    let json = report.to_json().unwrap();
    assert!(json.contains("\"by_category\""));
}

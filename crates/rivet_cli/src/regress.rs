//! `rivet regress`: run the built-in regression suites.
//!
//! Suite selection: `--case` runs a single case, `--suite` runs the named
//! suites, otherwise `regression.suites` from `rivet.toml`, otherwise all.

use rivet_regression::{RegressionReport, Registry, Runner};

use crate::pipeline::load_project_config;
use crate::{GlobalArgs, RegressArgs, ReportFormat};

/// Runs the `rivet regress` command. Returns exit code 1 if any case failed.
pub fn run(args: &RegressArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_project_config(global)?;
    let registry = Registry::builtin();

    if args.list {
        print!("{}", render_listing(&registry));
        return Ok(0);
    }

    let runner = Runner::new().fail_fast(args.fail_fast || config.regression.fail_fast);
    let report = if let Some(id) = &args.case {
        runner.run_id(&registry, id)?
    } else if !args.suites.is_empty() {
        runner.run_suites(&registry, &args.suites)?
    } else if !config.regression.suites.is_empty() {
        runner.run_suites(&registry, &config.regression.suites)?
    } else {
        runner.run_all(&registry)
    };

    match args.format {
        ReportFormat::Text => print!("{}", render_report(&report)),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }
    if !global.quiet && args.format == ReportFormat::Json {
        eprintln!("   {}", report.summary_line());
    }
    Ok(if report.is_success() { 0 } else { 1 })
}

/// `test <id> ... ok|FAILED` per case, a failures section, then the summary.
fn render_report(report: &RegressionReport) -> String {
    let mut out = format!("running {} cases\n", report.total);
    for result in &report.results {
        let status = if result.passed { "ok" } else { "FAILED" };
        out.push_str(&format!("test {} ({}) ... {status}\n", result.id, result.name));
    }

    if !report.is_success() {
        out.push_str("\nfailures:\n");
        for failure in report.failures() {
            let message = failure.message.as_deref().unwrap_or("");
            out.push_str(&format!("    {}: {message}\n", failure.id));
        }
    }

    out.push('\n');
    for (category, summary) in &report.by_category {
        out.push_str(&format!(
            "{category}: {} passed; {} failed\n",
            summary.passed, summary.failed
        ));
    }
    out.push_str(&report.summary_line());
    out.push('\n');
    out
}

fn render_listing(registry: &Registry) -> String {
    let mut out = String::new();
    for suite in registry.suite_names() {
        out.push_str(&format!("{suite}:\n"));
        for case in registry.suite(suite).unwrap_or_default() {
            out.push_str(&format!("    {}  {}\n", case.id, case.name));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rivet_regression::{CaseResult, TestCase, TestCategory};

    fn args() -> RegressArgs {
        RegressArgs {
            suites: Vec::new(),
            case: None,
            fail_fast: false,
            list: false,
            format: ReportFormat::Text,
        }
    }

    #[test]
    fn report_lists_failures() {
        let ok = TestCase::new("a-1", "fine", TestCategory::Unit);
        let bad = TestCase::new("a-2", "broken", TestCategory::EdgeCase);
        let report = RegressionReport::from_results(
            vec![
                CaseResult::new(&ok, Duration::ZERO, None),
                CaseResult::new(&bad, Duration::ZERO, Some("boom".into())),
            ],
            Duration::ZERO,
        );
        let out = render_report(&report);
        assert!(out.starts_with("running 2 cases\n"));
        assert!(out.contains("test a-1 (fine) ... ok\n"));
        assert!(out.contains("test a-2 (broken) ... FAILED\n"));
        assert!(out.contains("failures:\n    a-2: boom\n"));
        assert!(out.contains("unit: 1 passed; 0 failed\n"));
        assert!(out.contains("edge_case: 0 passed; 1 failed\n"));
        assert!(out.contains("test result: FAILED. 1 passed; 1 failed"));
    }

    #[test]
    fn listing_names_every_suite() {
        let out = render_listing(&Registry::builtin());
        for suite in rivet_regression::BUILTIN_SUITES {
            assert!(out.contains(&format!("{suite}:\n")), "missing {suite}");
        }
        assert!(out.contains("    lex-001  "));
    }

    #[test]
    fn runs_builtin_suites() {
        let global = GlobalArgs::for_tests();
        assert_eq!(run(&args(), &global).unwrap(), 0);

        let single = RegressArgs {
            case: Some("sim-001".into()),
            format: ReportFormat::Json,
            ..args()
        };
        assert_eq!(run(&single, &global).unwrap(), 0);
    }

    #[test]
    fn unknown_suite_is_an_error() {
        let bad = RegressArgs {
            suites: vec!["nope".into()],
            ..args()
        };
        let err = run(&bad, &GlobalArgs::for_tests()).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}

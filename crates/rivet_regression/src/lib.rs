//! Regression harness for the Rivet front end and simulator.
//!
//! A [`Registry`] stores [`TestCase`]s by id and groups them into suites;
//! [`Registry::builtin`] carries the standard lexer, parser, validator,
//! evaluator, simulation, and testbench suites. A [`Runner`] executes cases in
//! isolation, each with its own parse and its own simulation kernel, and folds
//! the outcomes into a [`RegressionReport`].

#![warn(missing_docs)]

pub mod builtin;
pub mod case;
pub mod error;
pub mod registry;
pub mod report;
pub mod runner;

pub use builtin::BUILTIN_SUITES;
pub use case::{check_eq, CaseContext, CheckFn, Expectation, Priority, TestCase, TestCategory};
pub use error::RegressionError;
pub use registry::Registry;
pub use report::{CaseResult, CategorySummary, RegressionReport};
pub use runner::Runner;

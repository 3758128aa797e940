//! Test case definitions and the context a case is checked against.

use std::fmt;

use rivet_diagnostics::DiagnosticCode;
use rivet_ir::Module;
use rivet_parser::{parse_module, parse_verilog, ValidationReport};
use rivet_sim::{ClockStimulus, SimConfig, SimKernel, TriggerMode};
use serde::{Deserialize, Serialize};

/// What a case exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCategory {
    /// A single function in isolation.
    Unit,
    /// Several stages chained together.
    Integration,
    /// A previously broken behaviour.
    Regression,
    /// Larger inputs or long runs.
    Performance,
    /// Malformed or degenerate input.
    EdgeCase,
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestCategory::Unit => "unit",
            TestCategory::Integration => "integration",
            TestCategory::Regression => "regression",
            TestCategory::Performance => "performance",
            TestCategory::EdgeCase => "edge_case",
        };
        f.write_str(s)
    }
}

/// How much a failure matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Cosmetic.
    Low,
    /// Normal.
    #[default]
    Medium,
    /// Important behaviour.
    High,
    /// Core contract.
    Critical,
}

/// A declarative condition checked after the case context is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// The structural parser recovers a module.
    Parses,
    /// The structural parser finds no module.
    ParseFails,
    /// The validator reports no errors.
    Valid,
    /// The validator reports this code at least once.
    Diagnostic(DiagnosticCode),
    /// After simulation, `signal` holds `value`.
    FinalValue {
        /// Signal name.
        signal: String,
        /// Expected committed value.
        value: i64,
    },
    /// After simulation, the sampled trace of `signal` equals `values`.
    Waveform {
        /// Signal name.
        signal: String,
        /// Expected 0/1 samples, one per time point.
        values: Vec<u8>,
    },
    /// After simulation, the waveform has this many time points.
    Samples(usize),
}

/// A custom check run after the expectations.
pub type CheckFn = fn(&CaseContext<'_>) -> Result<(), String>;

/// A single regression case.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Unique id such as `sim-003`.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the case exercises.
    pub category: TestCategory,
    /// How much a failure matters.
    pub priority: Priority,
    /// Verilog source the context is built from; may be empty.
    pub source: String,
    /// Steps to simulate; `None` skips simulation.
    pub max_steps: Option<u64>,
    /// Clock stimulus for the simulation.
    pub clocks: Vec<ClockStimulus>,
    /// Trigger mode for the simulation.
    pub trigger: TriggerMode,
    /// Declarative checks.
    pub expectations: Vec<Expectation>,
    /// Optional custom check.
    pub check: Option<CheckFn>,
}

impl TestCase {
    /// Starts a case with no source, no simulation, and no checks.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: TestCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            priority: Priority::default(),
            source: String::new(),
            max_steps: None,
            clocks: Vec::new(),
            trigger: TriggerMode::default(),
            expectations: Vec::new(),
            check: None,
        }
    }

    /// Sets the priority.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the source text.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Simulates the source for `steps` steps.
    pub fn simulate(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Adds a clock toggled every `half_period` steps.
    pub fn clock(mut self, signal: impl Into<String>, half_period: u64) -> Self {
        self.clocks.push(ClockStimulus {
            signal: signal.into(),
            half_period,
        });
        self
    }

    /// Uses edge-accurate triggering.
    pub fn edge_triggered(mut self) -> Self {
        self.trigger = TriggerMode::Edge;
        self
    }

    /// Adds an expectation.
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Sets the custom check.
    pub fn check(mut self, check: CheckFn) -> Self {
        self.check = Some(check);
        self
    }

    /// Simulation configuration derived from this case.
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            max_steps: self.max_steps.unwrap_or(0),
            clocks: self.clocks.clone(),
            trigger: self.trigger,
            ..SimConfig::default()
        }
    }
}

/// Everything a case can inspect: the parsed module, the validator report,
/// and a kernel that has already run `max_steps` steps.
#[derive(Debug)]
pub struct CaseContext<'a> {
    /// The case being checked.
    pub case: &'a TestCase,
    /// The structural parse, if it succeeded.
    pub module: Option<Module>,
    /// The validator report.
    pub validation: ValidationReport,
    /// The kernel after simulation, if the case simulates and the source parsed.
    pub kernel: Option<SimKernel>,
}

impl<'a> CaseContext<'a> {
    /// Parses, validates, and optionally simulates the case source. Each call
    /// builds its own kernel.
    pub fn build(case: &'a TestCase) -> Result<Self, String> {
        let module = parse_module(&case.source);
        let validation = parse_verilog(&case.source);
        let kernel = match (&module, case.max_steps) {
            (Some(module), Some(steps)) => {
                let mut kernel =
                    SimKernel::new(module, &case.sim_config()).map_err(|e| e.to_string())?;
                kernel.run(steps);
                Some(kernel)
            }
            _ => None,
        };
        Ok(Self {
            case,
            module,
            validation,
            kernel,
        })
    }

    /// The parsed module, or an error message.
    pub fn module(&self) -> Result<&Module, String> {
        self.module
            .as_ref()
            .ok_or_else(|| "source did not parse".to_string())
    }

    /// The simulated kernel, or an error message.
    pub fn kernel(&self) -> Result<&SimKernel, String> {
        self.kernel
            .as_ref()
            .ok_or_else(|| "case was not simulated".to_string())
    }

    /// Checks one expectation.
    pub fn verify(&self, expectation: &Expectation) -> Result<(), String> {
        match expectation {
            Expectation::Parses => self.module().map(|_| ()),
            Expectation::ParseFails => match &self.module {
                None => Ok(()),
                Some(m) => Err(format!("expected no module, parsed `{}`", m.name)),
            },
            Expectation::Valid => {
                if self.validation.is_valid() {
                    Ok(())
                } else {
                    let codes: Vec<String> = self
                        .validation
                        .errors
                        .iter()
                        .map(|d| d.code.to_string())
                        .collect();
                    Err(format!("expected no errors, got {}", codes.join(", ")))
                }
            }
            Expectation::Diagnostic(code) => {
                if self.validation.has_code(*code) {
                    Ok(())
                } else {
                    Err(format!("expected diagnostic {code}"))
                }
            }
            Expectation::FinalValue { signal, value } => {
                let actual = self.kernel()?.value(signal);
                check_eq(&format!("final value of `{signal}`"), actual, Some(*value))
            }
            Expectation::Waveform { signal, values } => {
                let kernel = self.kernel()?;
                let trace = kernel
                    .waveform()
                    .signal(signal)
                    .ok_or_else(|| format!("no trace for `{signal}`"))?;
                check_eq(&format!("trace of `{signal}`"), &trace.values, values)
            }
            Expectation::Samples(count) => {
                let actual = self.kernel()?.waveform().time.len();
                check_eq("sample count", actual, *count)
            }
        }
    }
}

/// Returns an error describing the mismatch when `actual != expected`.
pub fn check_eq<T: PartialEq + fmt::Debug>(what: &str, actual: T, expected: T) -> Result<(), String> {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("{what}: expected {expected:?}, got {actual:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let case = TestCase::new("x-1", "demo", TestCategory::Unit)
            .priority(Priority::High)
            .source("module m(); endmodule")
            .simulate(4)
            .clock("clk", 2)
            .edge_triggered()
            .expect(Expectation::Parses);
        assert_eq!(case.priority, Priority::High);
        assert_eq!(case.max_steps, Some(4));
        assert_eq!(case.sim_config().clocks.len(), 1);
        assert_eq!(case.sim_config().trigger, TriggerMode::Edge);
        assert_eq!(case.expectations.len(), 1);
    }

    #[test]
    fn context_without_simulation() {
        let case = TestCase::new("x-2", "no sim", TestCategory::Unit).source("module m(); endmodule");
        let ctx = CaseContext::build(&case).unwrap();
        assert!(ctx.module().is_ok());
        assert!(ctx.kernel().is_err());
        assert!(ctx.verify(&Expectation::Parses).is_ok());
        assert!(ctx.verify(&Expectation::ParseFails).is_err());
        assert!(ctx.verify(&Expectation::Samples(1)).is_err());
    }

    #[test]
    fn context_with_simulation() {
        let case = TestCase::new("x-3", "sim", TestCategory::Integration)
            .source("module m(input clk, output reg q); always @(posedge clk) q = 1; endmodule")
            .simulate(3)
            .clock("clk", 1);
        let ctx = CaseContext::build(&case).unwrap();
        assert!(ctx.verify(&Expectation::Samples(4)).is_ok());
        assert!(ctx
            .verify(&Expectation::FinalValue {
                signal: "q".into(),
                value: 1
            })
            .is_ok());
        let err = ctx
            .verify(&Expectation::FinalValue {
                signal: "q".into(),
                value: 0,
            })
            .unwrap_err();
        assert!(err.contains("final value of `q`"));
    }

    #[test]
    fn bad_stimulus_fails_build() {
        let case = TestCase::new("x-4", "bad", TestCategory::EdgeCase)
            .source("module m(input a); endmodule")
            .simulate(1)
            .clock("nope", 1);
        let err = CaseContext::build(&case).unwrap_err();
        assert!(err.contains("nope"));
    }

    #[test]
    fn category_display_and_order() {
        assert_eq!(TestCategory::EdgeCase.to_string(), "edge_case");
        assert!(Priority::Critical > Priority::Low);
    }
}

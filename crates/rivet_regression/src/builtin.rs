//! The standard suites shipped with Rivet.

use std::collections::HashMap;

use rivet_diagnostics::DiagnosticCode;
use rivet_ir::{PortDirection, Statement};
use rivet_parser::{tokenize, Keyword, TokenKind};
use rivet_sim::{evaluate, simulate, SimError};
use rivet_testbench::generate_testbench;

use crate::case::{check_eq, CaseContext, Expectation, Priority, TestCase, TestCategory};
use crate::registry::Registry;

type Env = HashMap<String, i64>;

/// Names of the built-in suites, in run order.
pub const BUILTIN_SUITES: [&str; 6] = [
    "lexer",
    "parser",
    "validator",
    "evaluator",
    "simulation",
    "testbench",
];

const FLOP: &str = "module t(input clk, output reg q); always @(posedge clk) q = 1; endmodule";

const COUNTER: &str = "\
module counter(input clk, input rst, output reg [3:0] count);
  always @(posedge clk) begin
    if (rst)
      count <= 0;
    else
      count <= count + 1;
  end
endmodule
";

const FILTER: &str = "\
module filter(
    input clk,
    input rst_n,
    input [7:0] data_in,
    output reg [7:0] data_out
);
endmodule
";

impl Registry {
    /// A registry holding every built-in suite.
    pub fn builtin() -> Self {
        let mut registry = Registry::new();
        let suites: [(&str, Vec<TestCase>); 6] = [
            ("lexer", lexer_cases()),
            ("parser", parser_cases()),
            ("validator", validator_cases()),
            ("evaluator", evaluator_cases()),
            ("simulation", simulation_cases()),
            ("testbench", testbench_cases()),
        ];
        for (suite, cases) in suites {
            for case in cases {
                // Built-in ids are unique; a clash is a programming error caught by tests.
                if let Err(err) = registry.register(suite, case) {
                    tracing::error!(%err, "skipping built-in case");
                }
            }
        }
        registry
    }
}

fn lexer_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("lex-001", "module header positions", TestCategory::Unit)
            .priority(Priority::Critical)
            .check(|_| {
                let tokens = tokenize("module m(a);");
                check_eq("token count", tokens.len(), 6)?;
                check_eq("first kind", tokens[0].kind, TokenKind::Keyword(Keyword::Module))?;
                check_eq("name column", tokens[1].column, 8)
            }),
        TestCase::new("lex-002", "comments survive as tokens", TestCategory::Unit).check(|_| {
            let tokens = tokenize("// header\nwire w; /* tail */");
            let comments = tokens.iter().filter(|t| t.kind == TokenKind::Comment).count();
            check_eq("comment tokens", comments, 2)?;
            check_eq("wire line", tokens[1].line, 2)
        }),
        TestCase::new("lex-003", "sized literals are single tokens", TestCategory::Unit).check(
            |_| {
                let texts: Vec<String> = tokenize("x = 4'b1010 + 8'hFF;")
                    .into_iter()
                    .map(|t| t.text)
                    .collect();
                check_eq("texts", texts.join(" "), "x = 4'b1010 + 8'hFF ;".to_string())
            },
        ),
        TestCase::new("lex-004", "unknown characters are dropped", TestCategory::EdgeCase).check(
            |_| {
                let texts: Vec<String> = tokenize("a \u{00a7} b").into_iter().map(|t| t.text).collect();
                check_eq("texts", texts, vec!["a".to_string(), "b".to_string()])
            },
        ),
    ]
}

fn parser_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("parse-001", "ANSI ports with widths", TestCategory::Unit)
            .priority(Priority::Critical)
            .source(FILTER)
            .expect(Expectation::Parses)
            .check(|ctx| {
                let module = ctx.module()?;
                check_eq("port count", module.ports.len(), 4)?;
                check_eq("data_in width", module.width_of("data_in"), Some(8))?;
                check_eq(
                    "data_out direction",
                    module.port("data_out").map(|p| p.direction),
                    Some(PortDirection::Output),
                )
            }),
        TestCase::new("parse-002", "text without a module", TestCategory::EdgeCase)
            .source("wire x; assign x = 1;")
            .expect(Expectation::ParseFails),
        TestCase::new("parse-003", "empty module is valid", TestCategory::EdgeCase)
            .source("module t(); endmodule")
            .expect(Expectation::Parses)
            .expect(Expectation::Valid),
        TestCase::new("parse-004", "always body becomes a statement tree", TestCategory::Unit)
            .source(COUNTER)
            .check(|ctx| {
                let module = ctx.module()?;
                check_eq("always blocks", module.always_blocks.len(), 1)?;
                let block = &module.always_blocks[0];
                check_eq(
                    "sensitivity",
                    block.sensitivity_list.clone(),
                    vec!["posedge".to_string(), "clk".to_string()],
                )?;
                let first = block
                    .body
                    .first()
                    .and_then(|id| module.statements.try_get(*id))
                    .ok_or("empty body")?;
                match first {
                    Statement::If { condition, .. } => check_eq("condition", condition.as_str(), "rst"),
                    other => Err(format!("expected if statement, got {other:?}")),
                }
            }),
    ]
}

fn validator_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("val-001", "balanced module has no errors", TestCategory::Unit)
            .priority(Priority::Critical)
            .source(COUNTER)
            .expect(Expectation::Valid),
        TestCase::new("val-002", "missing endmodule reported once", TestCategory::Unit)
            .priority(Priority::High)
            .source("module m(input a);\n  wire b;\n")
            .expect(Expectation::Diagnostic(DiagnosticCode::MissingEndmodule))
            .check(|ctx| check_eq("error count", ctx.validation.errors.len(), 1)),
        TestCase::new("val-003", "implicit sensitivity is only a warning", TestCategory::Unit)
            .source("module m(input a, output reg y);\n  always @(*) y = a;\nendmodule\n")
            .expect(Expectation::Valid)
            .expect(Expectation::Diagnostic(DiagnosticCode::ImplicitSensitivity)),
        TestCase::new("val-004", "unbalanced parentheses", TestCategory::EdgeCase)
            .source("module m(input a;\nendmodule\n")
            .expect(Expectation::Diagnostic(DiagnosticCode::UnmatchedParentheses)),
        TestCase::new("val-005", "parser and validator may disagree", TestCategory::Regression)
            .source("module m(input a);\n  wire b\nendmodule\n")
            .expect(Expectation::Parses)
            .expect(Expectation::Diagnostic(DiagnosticCode::MissingSemicolon)),
    ]
}

fn evaluator_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("eval-001", "sized binary literal", TestCategory::Unit)
            .priority(Priority::Critical)
            .check(|_| check_eq("4'b1010", evaluate("4'b1010", &Env::new()), 10)),
        TestCase::new("eval-002", "binary operators", TestCategory::Unit).check(|_| {
            let env: Env = [("a".to_string(), 6), ("b".to_string(), 3)].into();
            check_eq("2 + 3", evaluate("2 + 3", &env), 5)?;
            check_eq("a & b", evaluate("a & b", &env), 2)?;
            check_eq("a == b", evaluate("a == b", &env), 0)
        }),
        TestCase::new("eval-003", "unbound names read as zero", TestCategory::EdgeCase)
            .check(|_| check_eq("ghost + 1", evaluate("ghost + 1", &Env::new()), 1)),
        TestCase::new("eval-004", "malformed text degrades to zero", TestCategory::EdgeCase).check(
            |_| {
                let env = Env::new();
                for text in ["", "a b c d", "1 / 0", "( 1", "4'q9", "1 << 99"] {
                    check_eq(text, evaluate(text, &env), 0)?;
                }
                Ok(())
            },
        ),
    ]
}

fn simulation_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("sim-001", "one sample per step plus the initial one", TestCategory::Unit)
            .priority(Priority::Critical)
            .source(FLOP)
            .simulate(10)
            .expect(Expectation::Samples(11)),
        TestCase::new("sim-002", "flop without stimulus never fires", TestCategory::Integration)
            .source(FLOP)
            .simulate(5)
            .expect(Expectation::Waveform {
                signal: "q".into(),
                values: vec![0; 6],
            }),
        TestCase::new("sim-003", "flop fires from the first clock toggle", TestCategory::Integration)
            .priority(Priority::High)
            .source(FLOP)
            .simulate(5)
            .clock("clk", 1)
            .expect(Expectation::Waveform {
                signal: "q".into(),
                values: vec![0, 1, 1, 1, 1, 1],
            }),
        TestCase::new("sim-004", "undeclared operands keep the target at zero", TestCategory::EdgeCase)
            .source("module t(output y); assign y = a + b; endmodule")
            .simulate(4)
            .expect(Expectation::FinalValue {
                signal: "y".into(),
                value: 0,
            }),
        TestCase::new("sim-005", "edge triggering counts rising edges", TestCategory::Integration)
            .source(COUNTER)
            .simulate(8)
            .clock("clk", 1)
            .edge_triggered()
            .expect(Expectation::FinalValue {
                signal: "count".into(),
                value: 4,
            }),
        TestCase::new("sim-006", "level triggering counts every toggle", TestCategory::Regression)
            .source(COUNTER)
            .simulate(20)
            .clock("clk", 1)
            .expect(Expectation::FinalValue {
                signal: "count".into(),
                value: 4,
            }),
        TestCase::new("sim-007", "parse failure surfaces as an error", TestCategory::EdgeCase)
            .check(|_| match simulate("not verilog", 3) {
                Err(SimError::ParseFailed) => Ok(()),
                other => Err(format!("expected ParseFailed, got {other:?}")),
            }),
        TestCase::new("sim-008", "long run stays bounded", TestCategory::Performance)
            .priority(Priority::Low)
            .source(COUNTER)
            .simulate(2_000)
            .clock("clk", 3)
            .check(|ctx: &CaseContext<'_>| {
                let kernel = ctx.kernel()?;
                check_eq("time", kernel.time(), 2_000)?;
                check_eq("coverage cap", kernel.stats().coverage <= 100.0, true)
            }),
    ]
}

fn testbench_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("tb-001", "one declaration and connection per port", TestCategory::Unit)
            .priority(Priority::High)
            .source(FILTER)
            .check(|ctx| {
                let tb = generate_testbench(ctx.module()?);
                for port in &ctx.module()?.ports {
                    let connection = format!("({})", port.name);
                    check_eq(&connection, tb.matches(&connection).count(), 1)?;
                }
                check_eq("reg count", tb.matches("    reg ").count(), 3)?;
                check_eq("wire count", tb.matches("    wire ").count(), 1)
            }),
        TestCase::new("tb-002", "generation is idempotent", TestCategory::Unit)
            .source(COUNTER)
            .check(|ctx| {
                let module = ctx.module()?;
                check_eq("second run", generate_testbench(module), generate_testbench(module))
            }),
        TestCase::new("tb-003", "clock and reset stubs", TestCategory::Integration)
            .source(FILTER)
            .check(|ctx| {
                let tb = generate_testbench(ctx.module()?);
                check_eq("clock stub", tb.contains("forever #5 clk = ~clk;"), true)?;
                check_eq("reset release", tb.contains("rst_n = 1;"), true)?;
                check_eq("finish", tb.contains("$finish;"), true)
            }),
    ]
}

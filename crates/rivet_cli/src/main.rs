//! Rivet CLI: the command-line front end for the Rivet Verilog toolkit.
//!
//! `rivet lex`, `rivet parse` and `rivet check` expose the front end,
//! `rivet sim` runs the time-stepped simulator, `rivet testbench` writes a
//! skeleton testbench for a module, and `rivet regress` runs the built-in
//! regression suites.

#![warn(missing_docs)]

mod check;
mod lex;
mod parse;
mod pipeline;
mod regress;
mod sim;
mod testbench;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use rivet_sim::{ClockStimulus, Drive};
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the `-v` derived log filter.
const LOG_ENV: &str = "RIVET_LOG";

/// Rivet: lexer, validator and simulator for a small Verilog subset.
#[derive(Parser, Debug)]
#[command(name = "rivet", version, about = "Rivet Verilog toolkit")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `rivet.toml` to use instead of the one in the current directory.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token stream of a source file.
    Lex(LexArgs),
    /// Validate a source file and print its diagnostics.
    Check(CheckArgs),
    /// Print the recovered module structure as JSON.
    Parse(ParseArgs),
    /// Simulate the module in a source file.
    Sim(SimArgs),
    /// Generate a testbench skeleton for the module in a source file.
    Testbench(TestbenchArgs),
    /// Run the built-in regression suites.
    Regress(RegressArgs),
}

/// Arguments for `rivet lex`.
#[derive(Parser, Debug)]
pub struct LexArgs {
    /// Verilog source file.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `rivet check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Verilog source file.
    pub file: PathBuf,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `rivet parse`.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Verilog source file.
    pub file: PathBuf,
}

/// Arguments for `rivet sim`.
#[derive(Parser, Debug)]
pub struct SimArgs {
    /// Verilog source file.
    pub file: PathBuf,

    /// Number of steps to run (overrides `simulation.max_steps`).
    #[arg(long)]
    pub steps: Option<u64>,

    /// Comma-separated signals to report (overrides `simulation.signals`).
    #[arg(long, value_delimiter = ',')]
    pub signals: Vec<String>,

    /// Trigger always blocks on edges instead of levels.
    #[arg(long)]
    pub edge: bool,

    /// Toggle a clock, as `signal` or `signal:half_period`. Repeatable.
    #[arg(long = "clock", value_parser = sim::parse_clock)]
    pub clocks: Vec<ClockStimulus>,

    /// Force a value at a step, as `signal=value@time`. Repeatable.
    #[arg(long = "drive", value_parser = sim::parse_drive)]
    pub drives: Vec<Drive>,

    /// Write the waveform to this VCD file.
    #[arg(long)]
    pub vcd: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `rivet testbench`.
#[derive(Parser, Debug)]
pub struct TestbenchArgs {
    /// Verilog source file containing the unit under test.
    pub file: PathBuf,

    /// Output path; prints to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `rivet regress`.
#[derive(Parser, Debug)]
pub struct RegressArgs {
    /// Suite to run. Repeatable; defaults to `regression.suites`, then all.
    #[arg(long = "suite")]
    pub suites: Vec<String>,

    /// Run a single case by id.
    #[arg(long = "case", conflicts_with = "suites")]
    pub case: Option<String>,

    /// Stop at the first failing case.
    #[arg(long)]
    pub fail_fast: bool,

    /// List suites and case ids without running them.
    #[arg(long)]
    pub list: bool,

    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format shared by the reporting commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Number of `-v` flags given.
    pub verbose: u8,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let color = match cli.color {
        ColorChoice::Auto => std::io::stdout().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Lex(ref args) => lex::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::Parse(ref args) => parse::run(args, &global),
        Command::Sim(ref args) => sim::run(args, &global),
        Command::Testbench(ref args) => testbench::run(args, &global),
        Command::Regress(ref args) => regress::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RIVET_LOG` wins over `-v`.
fn init_logging(quiet: bool, verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(log_level(quiet, verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
impl GlobalArgs {
    /// Quiet, colorless settings with no explicit config.
    pub(crate) fn for_tests() -> Self {
        Self {
            quiet: true,
            verbose: 0,
            color: false,
            config: None,
        }
    }
}

//! `rivet sim`: run the time-stepped simulator on a module.
//!
//! Starts from the `[simulation]` table of `rivet.toml` (or the defaults) and
//! lets command-line flags override it. Prints the sampled waveform to stdout,
//! the run statistics to stderr, and optionally writes a VCD file.

use std::fs::File;
use std::io::{BufWriter, Write};

use rivet_config::SimulationConfig;
use rivet_parser::parse_literal;
use rivet_sim::{ClockStimulus, Drive, SimConfig, SimulationResult, TriggerMode};
use tracing::debug;

use crate::pipeline::{load_project_config, read_source};
use crate::{GlobalArgs, ReportFormat, SimArgs};

/// Half period used by `--clock NAME` without an explicit `:N`.
pub const DEFAULT_HALF_PERIOD: u64 = 1;

/// Runs the `rivet sim` command.
pub fn run(args: &SimArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project_config(global)?;
    let config = build_config(args, &project.simulation);
    debug!(?config, "simulation config");

    let source = read_source(&args.file)?;
    let result = rivet_sim::run(&source, &config)?;

    match args.format {
        ReportFormat::Text => print!("{}", render_waveform(&result)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    if let Some(path) = &args.vcd {
        let mut writer = BufWriter::new(File::create(path)?);
        result.waveform.write_vcd(&mut writer, &result.module_name)?;
        writer.flush()?;
    }

    if !global.quiet {
        let stats = &result.stats;
        eprintln!(
            "   Simulated `{}`: {} steps, {} signals, {} events, {:.1}% activity",
            result.module_name,
            stats.total_steps,
            stats.signal_count,
            stats.event_count,
            stats.coverage
        );
        if let Some(path) = &args.vcd {
            eprintln!("   Waveform: {}", path.display());
        }
    }
    Ok(0)
}

/// Applies command-line overrides on top of the configured defaults.
fn build_config(args: &SimArgs, base: &SimulationConfig) -> SimConfig {
    let mut config = base.to_sim_config();
    if let Some(steps) = args.steps {
        config.max_steps = steps;
    }
    if !args.signals.is_empty() {
        config.signals = args.signals.clone();
    }
    if args.edge {
        config.trigger = TriggerMode::Edge;
    }
    if !args.clocks.is_empty() {
        config.clocks = args.clocks.clone();
    }
    if !args.drives.is_empty() {
        config.drives = args.drives.clone();
    }
    config
}

/// One row per signal: the name, padded, then its samples as `0`/`1`.
fn render_waveform(result: &SimulationResult) -> String {
    let signals = &result.waveform.signals;
    let width = signals.keys().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for (name, trace) in signals {
        let bits: String = trace
            .values
            .iter()
            .map(|v| if *v == 0 { '0' } else { '1' })
            .collect();
        out.push_str(&format!("{name:<width$}  {bits}\n"));
    }
    out
}

/// Parses `--clock NAME[:HALF_PERIOD]`.
pub fn parse_clock(s: &str) -> Result<ClockStimulus, String> {
    let (signal, half_period) = match s.split_once(':') {
        Some((signal, half)) => {
            let half: u64 = half
                .parse()
                .map_err(|_| format!("invalid half period `{half}`"))?;
            (signal, half)
        }
        None => (s, DEFAULT_HALF_PERIOD),
    };
    if signal.is_empty() {
        return Err("clock signal name is empty".to_string());
    }
    if half_period == 0 {
        return Err("half period must be at least 1".to_string());
    }
    Ok(ClockStimulus {
        signal: signal.to_string(),
        half_period,
    })
}

/// Parses `--drive NAME=VALUE@TIME`. `VALUE` may be a sized literal.
pub fn parse_drive(s: &str) -> Result<Drive, String> {
    let (signal, rest) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE@TIME, got `{s}`"))?;
    let (value, time) = rest
        .split_once('@')
        .ok_or_else(|| format!("expected NAME=VALUE@TIME, got `{s}`"))?;
    if signal.is_empty() {
        return Err("drive signal name is empty".to_string());
    }
    let value = match value.strip_prefix('-') {
        Some(magnitude) => parse_literal(magnitude).map(i64::wrapping_neg),
        None => parse_literal(value),
    }
    .ok_or_else(|| format!("invalid value `{value}`"))?;
    let time = time
        .parse()
        .map_err(|_| format!("invalid time `{time}`"))?;
    Ok(Drive {
        time,
        signal: signal.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const TOGGLE: &str = "module t(input clk, output reg q);\n  always @(posedge clk) q = ~q;\nendmodule\n";

    fn args(file: PathBuf) -> SimArgs {
        SimArgs {
            file,
            steps: None,
            signals: Vec::new(),
            edge: false,
            clocks: Vec::new(),
            drives: Vec::new(),
            vcd: None,
            format: ReportFormat::Text,
        }
    }

    #[test]
    fn clock_specs() {
        assert_eq!(
            parse_clock("clk:4").unwrap(),
            ClockStimulus {
                signal: "clk".into(),
                half_period: 4
            }
        );
        assert_eq!(parse_clock("clk").unwrap().half_period, DEFAULT_HALF_PERIOD);
        assert!(parse_clock(":3").is_err());
        assert!(parse_clock("clk:0").is_err());
        assert!(parse_clock("clk:fast").is_err());
    }

    #[test]
    fn drive_specs() {
        let drive = parse_drive("rst_n=1@20").unwrap();
        assert_eq!((drive.signal.as_str(), drive.value, drive.time), ("rst_n", 1, 20));
        assert_eq!(parse_drive("bus=8'hFF@3").unwrap().value, 255);
        assert_eq!(parse_drive("d=-2@0").unwrap().value, -2);
        assert!(parse_drive("rst=1").is_err());
        assert!(parse_drive("=1@0").is_err());
        assert!(parse_drive("rst=x@0").is_err());
        assert!(parse_drive("rst=1@later").is_err());
    }

    #[test]
    fn flags_override_config() {
        let base = SimulationConfig {
            max_steps: 50,
            signals: vec!["a".into()],
            clocks: vec![parse_clock("clk:5").unwrap()],
            ..SimulationConfig::default()
        };
        let untouched = build_config(&args("x.v".into()), &base);
        assert_eq!(untouched.max_steps, 50);
        assert_eq!(untouched.clocks[0].half_period, 5);
        assert_eq!(untouched.trigger, TriggerMode::Level);

        let mut overridden = args("x.v".into());
        overridden.steps = Some(3);
        overridden.edge = true;
        overridden.clocks = vec![parse_clock("clk:1").unwrap()];
        let config = build_config(&overridden, &base);
        assert_eq!(config.max_steps, 3);
        assert_eq!(config.signals, vec!["a"]);
        assert_eq!(config.trigger, TriggerMode::Edge);
        assert_eq!(config.clocks[0].half_period, 1);
    }

    #[test]
    fn renders_aligned_rows() {
        let source = "module m(input a, output reg long_name);\nendmodule\n";
        let config = SimConfig {
            max_steps: 2,
            ..SimConfig::default()
        };
        let result = rivet_sim::run(source, &config).unwrap();
        assert_eq!(render_waveform(&result), "a          000\nlong_name  000\n");
    }

    #[test]
    fn run_writes_vcd() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("t.v");
        let vcd = dir.path().join("t.vcd");
        fs::write(&src, TOGGLE).unwrap();

        let mut sim = args(src);
        sim.steps = Some(4);
        sim.edge = true;
        sim.clocks = vec![parse_clock("clk").unwrap()];
        sim.vcd = Some(vcd.clone());
        assert_eq!(run(&sim, &GlobalArgs::for_tests()).unwrap(), 0);

        let dump = fs::read_to_string(&vcd).unwrap();
        assert!(dump.contains("$scope module t $end"));
        assert!(dump.contains("$var wire 1 ! clk $end"));
        assert!(dump.contains("#4"));
    }

    #[test]
    fn unknown_clock_is_an_error() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("t.v");
        fs::write(&src, TOGGLE).unwrap();
        let mut sim = args(src);
        sim.clocks = vec![parse_clock("nope").unwrap()];
        let err = run(&sim, &GlobalArgs::for_tests()).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}

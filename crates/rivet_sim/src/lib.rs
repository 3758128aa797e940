//! Time-stepped simulator for modules recovered by `rivet_parser`.
//!
//! The engine holds one integer per signal, re-evaluates continuous assigns
//! and triggered always blocks each step, and records a boolean waveform.
//! Expressions are evaluated by [`evaluate`], which never fails.
//!
//! # Usage
//!
//! ```
//! let src = "module t(input clk, output reg q); always @(posedge clk) q = 1; endmodule";
//! let wave = rivet_sim::simulate(src, 5).unwrap();
//! assert_eq!(wave.time.len(), 6);
//! ```
//!
//! # Modules
//!
//! - `error`: simulation error types
//! - `evaluator`: the three-shape expression evaluator
//! - `kernel`: the stepping engine, event log, and statistics
//! - `waveform`: sampled traces and VCD export

#![warn(missing_docs)]

pub mod error;
pub mod evaluator;
pub mod kernel;
pub mod waveform;

use rivet_parser::parse_module;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use error::SimError;
pub use evaluator::{evaluate, SignalEnv};
pub use kernel::{Event, EventKind, SimKernel, SimulationStats, TriggerMode};
pub use waveform::{SignalTrace, WaveformData};

/// Step count used when the caller does not give one.
pub const DEFAULT_MAX_STEPS: u64 = 100;

/// A clock toggled by the kernel every `half_period` steps, starting at step 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockStimulus {
    /// The signal to toggle.
    pub signal: String,
    /// Steps between toggles.
    pub half_period: u64,
}

/// A value forced onto a signal at one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drive {
    /// The step at which the value is staged.
    pub time: u64,
    /// The driven signal.
    pub signal: String,
    /// The value, masked to the signal width on commit.
    pub value: i64,
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of steps to run.
    pub max_steps: u64,
    /// Signals to keep in the returned waveform; empty keeps all.
    pub signals: Vec<String>,
    /// How always blocks are triggered.
    pub trigger: TriggerMode,
    /// Clock stimulus.
    pub clocks: Vec<ClockStimulus>,
    /// Scheduled drives.
    pub drives: Vec<Drive>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            signals: Vec::new(),
            trigger: TriggerMode::default(),
            clocks: Vec::new(),
            drives: Vec::new(),
        }
    }
}

/// Everything a configured run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Name of the simulated module.
    pub module_name: String,
    /// The sampled waveform, filtered to the requested signals.
    pub waveform: WaveformData,
    /// Counters for the run.
    pub stats: SimulationStats,
    /// The full event log.
    pub events: Vec<Event>,
}

/// Parses `source` and runs it for exactly `max_steps` steps with no stimulus.
///
/// The returned waveform has `max_steps + 1` samples per signal.
pub fn simulate(source: &str, max_steps: u64) -> Result<WaveformData, SimError> {
    let config = SimConfig {
        max_steps,
        ..SimConfig::default()
    };
    run(source, &config).map(|result| result.waveform)
}

/// Parses `source` and runs it under `config`.
pub fn run(source: &str, config: &SimConfig) -> Result<SimulationResult, SimError> {
    let module = parse_module(source).ok_or(SimError::ParseFailed)?;
    let mut kernel = SimKernel::new(&module, config)?;
    kernel.run(config.max_steps);

    let stats = kernel.stats();
    info!(
        module = %module.name,
        steps = stats.total_steps,
        events = stats.event_count,
        "simulation finished"
    );

    let (mut waveform, events) = kernel.into_parts();
    if !config.signals.is_empty() {
        waveform.retain_signals(&config.signals)?;
    }
    Ok(SimulationResult {
        module_name: module.name,
        waveform,
        stats,
        events,
    })
}

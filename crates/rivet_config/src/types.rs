//! Strongly-typed representation of `rivet.toml`.

use rivet_sim::{ClockStimulus, Drive, SimConfig, TriggerMode, DEFAULT_MAX_STEPS};
use serde::Deserialize;

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RivetConfig {
    /// The `[simulation]` table.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// The `[regression]` table.
    #[serde(default)]
    pub regression: RegressionConfig,
}

/// Defaults for `rivet sim`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Steps to run.
    pub max_steps: u64,
    /// Signals kept in the output; empty keeps all.
    pub signals: Vec<String>,
    /// `"level"` or `"edge"`.
    pub trigger: TriggerMode,
    /// `[[simulation.clocks]]` entries.
    pub clocks: Vec<ClockStimulus>,
    /// `[[simulation.drives]]` entries.
    pub drives: Vec<Drive>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            signals: Vec::new(),
            trigger: TriggerMode::Level,
            clocks: Vec::new(),
            drives: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Converts into the simulator's run configuration.
    pub fn to_sim_config(&self) -> SimConfig {
        SimConfig {
            max_steps: self.max_steps,
            signals: self.signals.clone(),
            trigger: self.trigger,
            clocks: self.clocks.clone(),
            drives: self.drives.clone(),
        }
    }
}

/// Defaults for `rivet regress`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegressionConfig {
    /// Suites to run when none is named on the command line; empty runs all.
    pub suites: Vec<String>,
    /// Stop at the first failing case.
    pub fail_fast: bool,
}

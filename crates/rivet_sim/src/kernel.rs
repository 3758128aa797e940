//! The time-stepped simulation kernel.
//!
//! Each [`SimKernel::step`] runs four phases against a snapshot of committed
//! state:
//!
//! 0. apply configured stimulus (clock toggles and scheduled drives),
//! 1. re-evaluate every continuous assign,
//! 2. execute every always block whose trigger fires,
//! 3. commit staged values, advance time by one, and sample the waveform.
//!
//! Nothing is shared between kernels; each simulation request builds its own.

use std::collections::{BTreeMap, HashMap};

use rivet_ir::{AlwaysBlock, Edge, Module, Statement, StmtId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::SimError;
use crate::evaluator::{evaluate, SignalEnv};
use crate::waveform::WaveformData;
use crate::{ClockStimulus, Drive, SimConfig};

/// How always blocks decide whether to run in a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// A block runs when any name in its sensitivity list has an event logged
    /// in the current step. Edge keywords are ignored.
    #[default]
    Level,
    /// `posedge`/`negedge` names require a 0->1 or 1->0 transition of bit 0
    /// between committed and staged values; bare names require any change.
    Edge,
}

/// Why an event was logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A value produced by an assign, an always block, or a drive.
    Change,
    /// A clock toggle.
    Edge,
}

/// One staged value change. The log is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The step in which the change was staged.
    pub time: u64,
    /// The signal that changed.
    pub signal: String,
    /// The staged value, already masked to the signal width.
    pub value: i64,
    /// What produced the change.
    pub kind: EventKind,
}

/// Summary counters for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Steps executed.
    pub total_steps: u64,
    /// Signals tracked by the kernel.
    pub signal_count: usize,
    /// Events logged.
    pub event_count: usize,
    /// `min(100, events / max(1, steps) * 100)`. An activity ratio, not toggle coverage.
    pub coverage: f64,
}

/// The simulation state for one module.
#[derive(Debug, Clone)]
pub struct SimKernel {
    module: Module,
    trigger: TriggerMode,
    clocks: Vec<ClockStimulus>,
    drives: Vec<Drive>,
    /// Declared widths; names missing here are unmasked.
    widths: HashMap<String, u32>,
    values: BTreeMap<String, i64>,
    previous: BTreeMap<String, i64>,
    parameters: HashMap<String, i64>,
    staged: BTreeMap<String, i64>,
    events: Vec<Event>,
    /// Index of the first event logged in the current step.
    step_start: usize,
    waveform: WaveformData,
    time: u64,
}

/// Committed values overlaid with parameters and, inside an always block,
/// the block's own blocking writes.
struct Scope<'a> {
    locals: Option<&'a HashMap<String, i64>>,
    values: &'a BTreeMap<String, i64>,
    parameters: &'a HashMap<String, i64>,
}

impl SignalEnv for Scope<'_> {
    fn value(&self, name: &str) -> Option<i64> {
        self.locals
            .and_then(|locals| locals.get(name))
            .or_else(|| self.values.get(name))
            .or_else(|| self.parameters.get(name))
            .copied()
    }
}

impl SimKernel {
    /// Initialises every port, signal, and assigned name to its declared
    /// initial value or 0, and seeds the waveform with a `t = 0` sample.
    pub fn new(module: &Module, config: &SimConfig) -> Result<Self, SimError> {
        let mut values = BTreeMap::new();
        let mut widths = HashMap::new();

        let declared = module
            .ports
            .iter()
            .map(|p| p.name.clone())
            .chain(module.signals.iter().map(|s| s.name.clone()));
        let assigned = module
            .assigns
            .iter()
            .map(|a| a.target.clone())
            .chain(
                module
                    .always_blocks
                    .iter()
                    .flat_map(|b| module.assigned_targets(&b.body)),
            );
        for name in declared.chain(assigned) {
            if name.is_empty() || values.contains_key(&name) {
                continue;
            }
            let initial = module
                .signal(&name)
                .and_then(|s| s.initial_value)
                .unwrap_or(0);
            if let Some(width) = module.width_of(&name) {
                widths.insert(name.clone(), width);
            }
            values.insert(name, initial);
        }

        for clock in &config.clocks {
            if !values.contains_key(&clock.signal) {
                return Err(SimError::UnknownSignal {
                    name: clock.signal.clone(),
                });
            }
            if clock.half_period == 0 {
                return Err(SimError::ZeroHalfPeriod {
                    signal: clock.signal.clone(),
                });
            }
        }
        if let Some(drive) = config.drives.iter().find(|d| !values.contains_key(&d.signal)) {
            return Err(SimError::UnknownSignal {
                name: drive.signal.clone(),
            });
        }

        let parameters = module
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.value))
            .collect();

        let mut kernel = Self {
            module: module.clone(),
            trigger: config.trigger,
            clocks: config.clocks.clone(),
            drives: config.drives.clone(),
            widths,
            previous: BTreeMap::new(),
            parameters,
            staged: BTreeMap::new(),
            events: Vec::new(),
            step_start: 0,
            waveform: WaveformData::default(),
            time: 0,
            values,
        };
        // Declared initial values are masked like any other commit.
        let names: Vec<String> = kernel.values.keys().cloned().collect();
        for name in names {
            let masked = kernel.mask(&name, kernel.values[&name]);
            kernel.values.insert(name, masked);
        }
        kernel.previous = kernel.values.clone();
        kernel.waveform =
            WaveformData::seeded(kernel.values.iter().map(|(k, v)| (k.as_str(), *v)));

        debug!(
            module = %module.name,
            signals = kernel.values.len(),
            always_blocks = module.always_blocks.len(),
            assigns = module.assigns.len(),
            trigger = ?kernel.trigger,
            "initialised simulation"
        );
        Ok(kernel)
    }

    /// Runs one full step.
    pub fn step(&mut self) {
        self.staged.clear();
        self.step_start = self.events.len();
        self.apply_stimulus();
        self.apply_assigns();
        self.run_always_blocks();
        self.commit();
        trace!(
            time = self.time,
            events = self.events.len() - self.step_start,
            "step complete"
        );
    }

    /// Runs `steps` full steps.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// The current time; equals the number of steps executed.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// The committed value of `name`.
    pub fn value(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }

    /// The value of `name` before the most recent commit.
    pub fn previous_value(&self, name: &str) -> Option<i64> {
        self.previous.get(name).copied()
    }

    /// All committed values keyed by name.
    pub fn values(&self) -> &BTreeMap<String, i64> {
        &self.values
    }

    /// Number of tracked signals.
    pub fn signal_count(&self) -> usize {
        self.values.len()
    }

    /// The event log in order of staging.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The waveform recorded so far.
    pub fn waveform(&self) -> &WaveformData {
        &self.waveform
    }

    /// The module being simulated.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Consumes the kernel, returning its waveform and event log.
    pub fn into_parts(self) -> (WaveformData, Vec<Event>) {
        (self.waveform, self.events)
    }

    /// Counters for the run so far.
    pub fn stats(&self) -> SimulationStats {
        let event_count = self.events.len();
        let coverage = (event_count as f64 * 100.0 / self.time.max(1) as f64).min(100.0);
        SimulationStats {
            total_steps: self.time,
            signal_count: self.values.len(),
            event_count,
            coverage,
        }
    }

    fn mask(&self, name: &str, value: i64) -> i64 {
        match self.widths.get(name) {
            Some(&width) if width < 64 => value & (u64::MAX >> (64 - width)) as i64,
            _ => value,
        }
    }

    /// Staged value if any, else committed.
    fn pending_value(&self, name: &str) -> i64 {
        self.staged
            .get(name)
            .or_else(|| self.values.get(name))
            .copied()
            .unwrap_or(0)
    }

    fn stage(&mut self, name: &str, value: i64, kind: EventKind) {
        let value = self.mask(name, value);
        if value == self.pending_value(name) {
            return;
        }
        self.staged.insert(name.to_string(), value);
        self.events.push(Event {
            time: self.time,
            signal: name.to_string(),
            value,
            kind,
        });
    }

    fn apply_stimulus(&mut self) {
        let time = self.time;
        let toggles: Vec<(String, i64)> = self
            .clocks
            .iter()
            .filter(|c| time % c.half_period == 0)
            .map(|c| (c.signal.clone(), i64::from(self.pending_value(&c.signal) == 0)))
            .collect();
        for (signal, value) in toggles {
            self.stage(&signal, value, EventKind::Edge);
        }

        let drives: Vec<(String, i64)> = self
            .drives
            .iter()
            .filter(|d| d.time == time)
            .map(|d| (d.signal.clone(), d.value))
            .collect();
        for (signal, value) in drives {
            self.stage(&signal, value, EventKind::Change);
        }
    }

    fn apply_assigns(&mut self) {
        let scope = Scope {
            locals: None,
            values: &self.values,
            parameters: &self.parameters,
        };
        let results: Vec<(String, i64)> = self
            .module
            .assigns
            .iter()
            .filter(|a| !a.target.is_empty())
            .map(|a| (a.target.clone(), evaluate(&a.expression_text, &scope)))
            .collect();
        for (target, value) in results {
            self.stage(&target, value, EventKind::Change);
        }
    }

    fn run_always_blocks(&mut self) {
        for index in 0..self.module.always_blocks.len() {
            let block = &self.module.always_blocks[index];
            if !self.is_triggered(block) {
                continue;
            }
            let mut locals = HashMap::new();
            let mut writes = Vec::new();
            self.execute(&block.body, &mut locals, &mut writes);
            for (target, value) in writes {
                self.stage(&target, value, EventKind::Change);
            }
        }
    }

    fn is_triggered(&self, block: &AlwaysBlock) -> bool {
        match self.trigger {
            TriggerMode::Level => {
                let current = &self.events[self.step_start..];
                block
                    .sensitivity_list
                    .iter()
                    .filter(|name| *name != "posedge" && *name != "negedge")
                    .any(|name| {
                        if name == "*" {
                            !current.is_empty()
                        } else {
                            current.iter().any(|e| &e.signal == name)
                        }
                    })
            }
            TriggerMode::Edge => block.sensitivity().iter().any(|item| {
                if item.signal == "*" {
                    return !self.staged.is_empty();
                }
                let old = self.values.get(&item.signal).copied().unwrap_or(0);
                let new = self.pending_value(&item.signal);
                match item.edge {
                    Some(Edge::Posedge) => old & 1 == 0 && new & 1 == 1,
                    Some(Edge::Negedge) => old & 1 == 1 && new & 1 == 0,
                    None => old != new,
                }
            }),
        }
    }

    /// Walks a statement list. Blocking writes land in `locals` so later
    /// statements see them; every write is also queued in `writes`.
    fn execute(
        &self,
        body: &[StmtId],
        locals: &mut HashMap<String, i64>,
        writes: &mut Vec<(String, i64)>,
    ) {
        for &id in body {
            let Some(stmt) = self.module.statements.try_get(id) else {
                continue;
            };
            match stmt {
                Statement::Assign {
                    target,
                    expr,
                    blocking,
                    ..
                } => {
                    let value = self.mask(target, evaluate(expr, &self.scope(locals)));
                    if *blocking {
                        locals.insert(target.clone(), value);
                    }
                    writes.push((target.clone(), value));
                }
                Statement::If {
                    condition,
                    then_body,
                    else_body,
                } => {
                    let taken = evaluate(condition, &self.scope(locals)) != 0;
                    let branch = if taken { then_body } else { else_body };
                    self.execute(branch, locals, writes);
                }
                Statement::Case {
                    subject,
                    arms,
                    default,
                } => {
                    let scope = self.scope(locals);
                    let value = evaluate(subject, &scope);
                    let arm = arms
                        .iter()
                        .find(|arm| arm.labels.iter().any(|l| evaluate(l, &scope) == value));
                    let branch = arm.map_or(default, |arm| &arm.body);
                    self.execute(branch, locals, writes);
                }
            }
        }
    }

    fn scope<'a>(&'a self, locals: &'a HashMap<String, i64>) -> Scope<'a> {
        Scope {
            locals: Some(locals),
            values: &self.values,
            parameters: &self.parameters,
        }
    }

    fn commit(&mut self) {
        self.previous = self.values.clone();
        for (name, value) in std::mem::take(&mut self.staged) {
            self.values.insert(name, value);
        }
        self.time += 1;
        let values = &self.values;
        self.waveform
            .sample(self.time, |name| values.get(name).copied());
    }
}

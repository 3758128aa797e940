//! The module: everything recovered from one `module ... endmodule` region.

use crate::always::AlwaysBlock;
use crate::arena::Arena;
use crate::ids::StmtId;
use crate::port::Port;
use crate::signal::{Signal, SignalKind};
use crate::stmt::Statement;
use serde::{Deserialize, Serialize};

/// A `parameter` or `localparam` with a literal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name.
    pub name: String,
    /// The literal value.
    pub value: i64,
    /// `true` for `localparam`.
    #[serde(default)]
    pub local: bool,
    /// 1-based line of the declaration.
    pub line: u32,
}

/// A continuous assignment, `assign target = expression;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assign {
    /// The driven signal name.
    pub target: String,
    /// Space-joined right-hand side tokens.
    pub expression_text: String,
    /// 1-based line of the `assign` keyword.
    pub source_line: u32,
}

/// A submodule instantiation. Recorded only; never elaborated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// The instantiated module's name.
    pub module_name: String,
    /// The instance name.
    pub instance_name: String,
    /// `(port, net)` pairs; positional connections use an empty port name.
    pub connections: Vec<(String, String)>,
    /// 1-based source line.
    pub line: u32,
}

/// A parsed module.
///
/// A module returned by the parser always has a non-empty `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// The module name.
    pub name: String,
    /// Ports in declaration order.
    pub ports: Vec<Port>,
    /// Internal `wire`/`reg` declarations, plus `reg` backing for `output reg` ports.
    pub signals: Vec<Signal>,
    /// Parameters and localparams.
    pub parameters: Vec<Parameter>,
    /// Always blocks in source order.
    pub always_blocks: Vec<AlwaysBlock>,
    /// Continuous assignments in source order.
    pub assigns: Vec<Assign>,
    /// Submodule instances.
    pub instances: Vec<Instance>,
    /// Storage for every statement referenced by an always block.
    pub statements: Arena<StmtId, Statement>,
}

impl Module {
    /// Creates an empty module with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Looks up a port by name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Looks up an internal signal by name.
    pub fn signal(&self, name: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.name == name)
    }

    /// Looks up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Returns the declared width of a port or signal.
    pub fn width_of(&self, name: &str) -> Option<u32> {
        self.signal(name)
            .map(|s| s.width)
            .or_else(|| self.port(name).map(|p| p.width))
    }

    /// Returns `true` if `name` is a declared `reg`.
    pub fn is_reg(&self, name: &str) -> bool {
        self.signal(name).is_some_and(|s| s.kind == SignalKind::Reg)
    }

    /// Every signal name assigned anywhere inside `body`, in first-seen order.
    pub fn assigned_targets(&self, body: &[StmtId]) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_targets(body, &mut out);
        out
    }

    fn collect_targets(&self, body: &[StmtId], out: &mut Vec<String>) {
        for &id in body {
            let Some(stmt) = self.statements.try_get(id) else {
                continue;
            };
            match stmt {
                Statement::Assign { target, .. } => {
                    if !out.contains(target) {
                        out.push(target.clone());
                    }
                }
                Statement::If {
                    then_body,
                    else_body,
                    ..
                } => {
                    self.collect_targets(then_body, out);
                    self.collect_targets(else_body, out);
                }
                Statement::Case { arms, default, .. } => {
                    for arm in arms {
                        self.collect_targets(&arm.body, out);
                    }
                    self.collect_targets(default, out);
                }
            }
        }
    }
}

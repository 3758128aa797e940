//! Internal net and variable declarations.

use serde::{Deserialize, Serialize};

/// Whether a signal was declared as a net or a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// `wire`
    Wire,
    /// `reg`
    Reg,
}

/// A `wire` or `reg` declared inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// The signal name.
    pub name: String,
    /// Net or variable.
    pub kind: SignalKind,
    /// Bit width, always at least 1.
    pub width: u32,
    /// Whether the signal was declared `signed`.
    #[serde(default)]
    pub signed: bool,
    /// Value from a `= literal` initialiser.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub initial_value: Option<i64>,
    /// 1-based line of the declaration.
    pub line: u32,
}

impl Signal {
    /// Creates an unsigned signal with no initial value.
    pub fn new(name: impl Into<String>, kind: SignalKind, width: u32, line: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            width: width.max(1),
            signed: false,
            initial_value: None,
            line,
        }
    }
}

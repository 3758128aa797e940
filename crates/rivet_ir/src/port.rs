//! Port declarations from a module header or body.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The direction of a port on a module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
}

impl PortDirection {
    /// Maps a direction keyword to its variant.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "input" => Some(PortDirection::Input),
            "output" => Some(PortDirection::Output),
            "inout" => Some(PortDirection::Inout),
            _ => None,
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => write!(f, "input"),
            PortDirection::Output => write!(f, "output"),
            PortDirection::Inout => write!(f, "inout"),
        }
    }
}

/// A port in a module's external interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// The port name.
    pub name: String,
    /// The direction of data flow.
    pub direction: PortDirection,
    /// Bit width, always at least 1.
    pub width: u32,
    /// Whether the port was declared `signed`.
    #[serde(default)]
    pub signed: bool,
    /// 1-based line of the declaration.
    pub line: u32,
}

impl Port {
    /// Creates an unsigned port.
    pub fn new(name: impl Into<String>, direction: PortDirection, width: u32, line: u32) -> Self {
        Self {
            name: name.into(),
            direction,
            width: width.max(1),
            signed: false,
            line,
        }
    }

    /// Returns `true` for `input` ports.
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }
}

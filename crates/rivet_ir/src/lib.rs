//! The structural model recovered from a single Verilog module.
//!
//! [`Module`] is the hand-off point between the parser and everything downstream:
//! the simulator reads its ports, signals, parameters, continuous assigns, and
//! always blocks, and the testbench generator reads its port list. Always-block
//! bodies are stored as arena-indexed [`Statement`] trees.

#![warn(missing_docs)]

pub mod always;
pub mod arena;
pub mod ids;
pub mod module;
pub mod port;
pub mod signal;
pub mod stmt;

pub use always::{AlwaysBlock, Edge, SensitivityItem};
pub use arena::{Arena, ArenaId};
pub use ids::StmtId;
pub use module::{Assign, Instance, Module, Parameter};
pub use port::{Port, PortDirection};
pub use signal::{Signal, SignalKind};
pub use stmt::{CaseArm, Statement};

//! Diagnostic records, severity levels, and rendering for Verilog validation.
//!
//! The validator never aborts on malformed input. Every problem it finds becomes a
//! [`Diagnostic`] carrying a closed [`DiagnosticCode`], a 1-based source line, and an
//! optional column. The thread-safe [`DiagnosticSink`] accumulates them, and
//! [`DiagnosticRenderer`] implementations format them for terminals or JSON consumers.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, SourceFile, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;

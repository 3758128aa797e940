//! Structured diagnostic messages with severity, code, and line position.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A single validation finding.
///
/// Diagnostics are collected and returned, never raised. Lines are 1-based;
/// `column` is 1-based when the validator can pin the problem to a character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of problem.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The 1-based source line.
    pub line: u32,
    /// The 1-based source column, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Explanatory footnotes.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
    /// Actionable suggestions.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic at the given line.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, line: u32) -> Self {
        Self::new(Severity::Error, code, message, line)
    }

    /// Creates a new warning diagnostic at the given line.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, line: u32) -> Self {
        Self::new(Severity::Warning, code, message, line)
    }

    fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>, line: u32) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            line,
            column: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Pins this diagnostic to a 1-based column.
    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Returns `true` if this is an error-severity diagnostic.
    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

//! Diagnostic rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// A named source text that diagnostics point into.
#[derive(Clone, Copy, Debug)]
pub struct SourceFile<'a> {
    /// Display name, usually the path given on the command line.
    pub name: &'a str,
    /// The full source text.
    pub content: &'a str,
}

impl<'a> SourceFile<'a> {
    /// Creates a new source file view.
    pub fn new(name: &'a str, content: &'a str) -> Self {
        Self { name, content }
    }

    /// Returns the text of a 1-based line, if it exists.
    pub fn line(&self, line: u32) -> Option<&'a str> {
        let index = (line as usize).checked_sub(1)?;
        self.content.lines().nth(index)
    }
}

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic, source: &SourceFile<'_>) -> String;

    /// Renders every diagnostic in order, concatenated.
    fn render_all(&self, diags: &[Diagnostic], source: &SourceFile<'_>) -> String {
        diags.iter().map(|d| self.render(d, source)).collect()
    }
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// ```text
/// error[MISSING_SEMICOLON]: assign statement is missing ';'
///   --> counter.v:4
///    |
///  4 | assign y = a & b
///    |
///    = help: terminate the statement with ';'
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, severity: Severity, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let ansi = match severity {
            Severity::Error => "\x1b[1;31m",
            Severity::Warning => "\x1b[1;33m",
        };
        format!("{ansi}{text}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source: &SourceFile<'_>) -> String {
        let mut out = String::new();

        let header = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!(
            "{}: {}\n",
            self.paint(diag.severity, &header),
            diag.message
        ));

        match diag.column {
            Some(col) => out.push_str(&format!("  --> {}:{}:{}\n", source.name, diag.line, col)),
            None => out.push_str(&format!("  --> {}:{}\n", source.name, diag.line)),
        }

        if let Some(text) = source.line(diag.line) {
            let line_num = diag.line.to_string();
            let padding = " ".repeat(line_num.len());
            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {text}\n"));
            if let Some(col) = diag.column {
                let col_padding = " ".repeat((col as usize).saturating_sub(1));
                out.push_str(&format!("{padding} | {col_padding}^\n"));
            } else {
                out.push_str(&format!("{padding} |\n"));
            }
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

/// Renders each diagnostic as one line of JSON.
///
/// The object is the serialized [`Diagnostic`] plus a `file` field.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic, source: &SourceFile<'_>) -> String {
        let mut value = match serde_json::to_value(diag) {
            Ok(value) => value,
            Err(_) => return String::new(),
        };
        if let Some(obj) = value.as_object_mut() {
            obj.insert("file".to_string(), source.name.into());
        }
        format!("{value}\n")
    }
}

//! Shared collector that passes emit diagnostics into and renderers drain.

use std::sync::{Mutex, MutexGuard};

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

#[derive(Default)]
struct Collected {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
    warnings: usize,
}

/// Collects diagnostics from one or more passes.
///
/// Counts survive [`take_all`](Self::take_all), so a command can drain the
/// diagnostics for rendering and still decide its exit code afterwards.
#[derive(Default)]
pub struct DiagnosticSink {
    inner: Mutex<Collected>,
}

impl DiagnosticSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        let mut inner = self.lock();
        match diag.severity {
            Severity::Error => inner.errors += 1,
            Severity::Warning => inner.warnings += 1,
        }
        inner.diagnostics.push(diag);
    }

    /// Records every diagnostic from `diags`, in order.
    pub fn extend(&self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.emit(diag);
        }
    }

    /// `true` once any error has been recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Errors recorded so far.
    pub fn error_count(&self) -> usize {
        self.lock().errors
    }

    /// Warnings recorded so far.
    pub fn warning_count(&self) -> usize {
        self.lock().warnings
    }

    /// Drains the recorded diagnostics ordered by line, errors first within a
    /// line. The counts are kept.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        let mut diags = std::mem::take(&mut self.lock().diagnostics);
        diags.sort_by(|a, b| a.line.cmp(&b.line).then(b.severity.cmp(&a.severity)));
        diags
    }

    /// A copy of the recorded diagnostics in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().diagnostics.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Collected> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;

    fn missing_semicolon(line: u32) -> Diagnostic {
        Diagnostic::error(DiagnosticCode::MissingSemicolon, "missing ';'", line)
    }

    fn implicit(line: u32) -> Diagnostic {
        Diagnostic::warning(DiagnosticCode::ImplicitSensitivity, "implicit list", line)
    }

    #[test]
    fn counts_by_severity() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        sink.extend([missing_semicolon(2), implicit(3), missing_semicolon(5)]);
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 2);
        assert_eq!(sink.warning_count(), 1);
        assert_eq!(sink.diagnostics().len(), 3);
    }

    #[test]
    fn warnings_alone_are_not_errors() {
        let sink = DiagnosticSink::new();
        sink.emit(implicit(1));
        assert!(!sink.has_errors());
    }

    #[test]
    fn take_all_sorts_and_keeps_counts() {
        let sink = DiagnosticSink::new();
        sink.extend([implicit(4), missing_semicolon(9), missing_semicolon(4)]);
        let lines: Vec<(u32, Severity)> = sink
            .take_all()
            .iter()
            .map(|d| (d.line, d.severity))
            .collect();
        assert_eq!(
            lines,
            vec![(4, Severity::Error), (4, Severity::Warning), (9, Severity::Error)]
        );
        assert!(sink.take_all().is_empty());
        assert_eq!(sink.error_count(), 2);
    }

    #[test]
    fn shared_across_threads() {
        let sink = DiagnosticSink::new();
        std::thread::scope(|s| {
            for line in 1..=4 {
                let sink = &sink;
                s.spawn(move || sink.emit(missing_semicolon(line)));
            }
        });
        assert_eq!(sink.error_count(), 4);
    }
}

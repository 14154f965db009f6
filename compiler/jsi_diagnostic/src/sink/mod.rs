//! Per-unit diagnostic sink.
//!
//! Reporting is append-only and order-preserving: diagnostics come out in
//! the order the traversal reported them, with no sorting or deduplication.
//! Errors mark the unit failed but never stop the traversal.

use jsi_ir::Span;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Collects the diagnostics of one compilation unit.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an error at `span`.
    pub fn error(&mut self, span: Span, code: ErrorCode, message: impl Into<String>) -> ErrorGuaranteed {
        let message = message.into();
        self.emit_error(Diagnostic::error(code).with_label(span, message.clone()).with_message(message))
    }

    /// Report a warning at `span`.
    pub fn warning(&mut self, span: Span, code: ErrorCode, message: impl Into<String>) {
        let message = message.into();
        self.push(Diagnostic::warning(code).with_label(span, message.clone()).with_message(message));
    }

    /// Report a fully built error diagnostic.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error());
        self.push(diag);
        ErrorGuaranteed::new()
    }

    /// Report a fully built diagnostic of any severity.
    pub fn push(&mut self, diag: Diagnostic) {
        if diag.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Proof of failure, if any error was reported.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

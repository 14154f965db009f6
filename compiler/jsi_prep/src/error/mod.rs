//! Internal defects of the pass.
//!
//! Problems in user code are diagnostics. A [`PrepError`] means the pass
//! itself (or the tree it was handed) is broken: it aborts the unit and is
//! surfaced as an internal compiler error.

use jsi_diagnostic::{Diagnostic, ErrorCode};
use jsi_ir::Span;
use thiserror::Error;

use crate::typer::TypeError;

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum PrepError {
    /// A tree built by a rewrite did not type-check.
    #[error("rewritten {rule} did not type-check: {source}")]
    Retype {
        rule: &'static str,
        span: Span,
        source: TypeError,
    },

    /// A rule met a node shape its guard should have excluded.
    #[error("{rule} expected {expected}, found {found}")]
    UnexpectedShape {
        rule: &'static str,
        expected: &'static str,
        found: &'static str,
        span: Span,
    },
}

impl PrepError {
    pub fn span(&self) -> Span {
        match self {
            PrepError::Retype { span, .. } | PrepError::UnexpectedShape { span, .. } => *span,
        }
    }

    /// Report this defect as an internal compiler error.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(ErrorCode::E9001)
            .with_message(format!("internal compiler error: {self}"))
            .with_label(self.span(), "while preparing this for the foreign runtime")
            .with_note("this is a bug in the interop preparation pass, not in your code")
    }
}

//! Interop preparation for the foreign runtime.
//!
//! One traversal over a type-checked compilation unit, run before code
//! generation:
//!
//! - **Validation**: classes, traits and objects extending `js.Any` are
//!   checked for structural restrictions and tagged with `RawJSType`.
//! - **Rewrites**: `js.Dynamic` shorthands, statically nameable
//!   `Enumeration` values and unresolved `classOf` tokens are replaced.
//! - **Exports**: forwarders for `@JSExport` methods are synthesized and
//!   spliced into the body of the class that owns the method.
//!
//! # Architecture
//!
//! The driver tries an ordered rule table at every node (first match wins)
//! and falls back to rebuilding the node from its transformed children. The
//! current [`Scope`] is threaded through the recursion by value.
//!
//! Type information for rebuilt trees comes from a [`Typer`]; export
//! intents and forwarders come from an [`ExportResolver`]. Both are passed
//! in through [`PrepEnv`].

mod class_of;
mod config;
mod driver;
mod dynamic;
mod enumeration;
mod error;
mod exports;
mod scope;
mod stack;
mod typer;
mod validate;
mod validate_js;

#[cfg(test)]
mod test_helpers;

use jsi_diagnostic::{Diagnostic, ErrorGuaranteed};
use jsi_ir::Tree;

pub use config::{OptionError, PrepConfig};
pub use driver::PrepEnv;
pub use error::PrepError;
pub use exports::{AnnotationExports, ExportResolver, ExportSpec};
pub use scope::{Scope, ScopeFlags};
pub use typer::{conforms, SymbolTyper, TypeError, Typer};
pub use validate_js::distinguishing_suffix;

use driver::PrepInterop;

/// A prepared compilation unit.
#[derive(Debug)]
pub struct PrepOutput {
    pub tree: Tree,
    /// Errors and warnings in the order they were reported.
    pub diagnostics: Vec<Diagnostic>,
}

impl PrepOutput {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Proof that the unit failed, if it did.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count())
    }
}

/// Prepare one compilation unit.
///
/// Problems in user code are reported in [`PrepOutput::diagnostics`]. An
/// `Err` means a rewrite produced an ill-typed tree or met a shape the type
/// checker never produces; the unit must not reach code generation.
#[tracing::instrument(level = "debug", skip_all)]
pub fn prepare_unit(tree: Tree, env: PrepEnv<'_>, config: PrepConfig) -> Result<PrepOutput, PrepError> {
    let mut prep = PrepInterop::new(env, config);
    let tree = prep.transform(tree, Scope::ROOT)?;
    let diagnostics = prep.finish();
    tracing::debug!(diagnostics = diagnostics.len(), "unit prepared");

    #[cfg(debug_assertions)]
    validate::validate(&tree, env.symbols, env.defs);

    Ok(PrepOutput { tree, diagnostics })
}

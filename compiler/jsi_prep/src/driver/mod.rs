//! The traversal.
//!
//! At every node the driver evaluates the guards of [`rules::RULES`] in
//! order and applies the first rule that matches. Without a match it
//! descends into the children with the current scope. Either way the node
//! then goes through [`PrepInterop::post_transform`], which splices buffered
//! export forwarders into finalized templates and rejects exported locals.

mod rules;

use jsi_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode};
use jsi_ir::{Definitions, SymbolFlags, SymbolId, SymbolTable, Tree, TreeKind, Ty};
use rustc_hash::FxHashMap;

use crate::exports::ExportResolver;
use crate::scope::Scope;
use crate::stack::ensure_sufficient_stack;
use crate::typer::Typer;
use crate::{PrepConfig, PrepError};

/// Everything a unit's traversal reads but does not own.
#[derive(Clone, Copy)]
pub struct PrepEnv<'a> {
    pub symbols: &'a SymbolTable,
    pub defs: &'a Definitions,
    pub typer: &'a (dyn Typer + Sync),
    pub exports: &'a (dyn ExportResolver + Sync),
}

impl<'a> PrepEnv<'a> {
    pub fn new(
        symbols: &'a SymbolTable,
        defs: &'a Definitions,
        typer: &'a (dyn Typer + Sync),
        exports: &'a (dyn ExportResolver + Sync),
    ) -> Self {
        PrepEnv {
            symbols,
            defs,
            typer,
            exports,
        }
    }
}

/// State of one unit's traversal.
pub(crate) struct PrepInterop<'a> {
    pub(crate) env: PrepEnv<'a>,
    pub(crate) config: PrepConfig,
    pub(crate) sink: DiagnosticSink,
    /// Forwarders waiting for their owner's template, keyed by owner class.
    exporters: FxHashMap<SymbolId, Vec<Tree>>,
}

impl<'a> PrepInterop<'a> {
    pub(crate) fn new(env: PrepEnv<'a>, config: PrepConfig) -> Self {
        PrepInterop {
            env,
            config,
            sink: DiagnosticSink::new(),
            exporters: FxHashMap::default(),
        }
    }

    pub(crate) fn symbols(&self) -> &'a SymbolTable {
        self.env.symbols
    }

    pub(crate) fn defs(&self) -> &'a Definitions {
        self.env.defs
    }

    /// Rewrite `tree` in `scope`.
    pub(crate) fn transform(&mut self, tree: Tree, scope: Scope) -> Result<Tree, PrepError> {
        ensure_sufficient_stack(|| {
            let tree = match rules::find(self, &tree, scope) {
                Some(rule) => {
                    tracing::trace!(rule = rule.name, span = ?tree.span, "rule matched");
                    (rule.apply)(self, tree, scope)?
                }
                None => self.descend(tree, scope)?,
            };
            Ok(self.post_transform(tree))
        })
    }

    /// Rewrite the children of `tree` in `scope`, keeping the node itself.
    pub(crate) fn descend(&mut self, tree: Tree, scope: Scope) -> Result<Tree, PrepError> {
        tree.try_map_children(|child| self.transform(child, scope))
    }

    /// Type a tree built by `rule` against the type of the node it replaces.
    pub(crate) fn retype(&self, rule: &'static str, tree: Tree, expected: &Ty) -> Result<Tree, PrepError> {
        let span = tree.span;
        self.env
            .typer
            .retype(tree, expected)
            .map_err(|source| PrepError::Retype { rule, span, source })
    }

    /// Whether the class or object `decl` defines extends js.Any.
    pub(crate) fn is_js_any(&self, decl: &Tree) -> bool {
        let symbols = self.symbols();
        symbols.is_subclass(symbols.type_symbol_of(decl.symbol), self.defs().js_any_class)
    }

    /// Queue the export forwarders of `method` for its owner's template.
    pub(crate) fn collect_exports(&mut self, method: SymbolId) {
        let forwarders = self.env.exports.gen_export_members(method, &mut self.sink);
        if forwarders.is_empty() {
            return;
        }
        let owner = self.symbols().owner(method);
        tracing::debug!(
            method = %self.symbols().full_name(method),
            count = forwarders.len(),
            "buffering export forwarders"
        );
        self.exporters.entry(owner).or_default().extend(forwarders);
    }

    fn post_transform(&mut self, mut tree: Tree) -> Tree {
        if let TreeKind::Template { body, .. } = &mut tree.kind {
            if let Some(forwarders) = self.exporters.remove(&tree.symbol) {
                tracing::debug!(
                    owner = %self.symbols().full_name(tree.symbol),
                    count = forwarders.len(),
                    "splicing export forwarders"
                );
                body.extend(forwarders);
            }
        } else if tree.is_member_def() {
            self.check_local_exports(&tree);
        }
        tree
    }

    /// Locals cannot be reached from the foreign runtime.
    fn check_local_exports(&mut self, def: &Tree) {
        let symbols = self.symbols();
        let Some(symbol) = symbols.get(def.symbol) else {
            return;
        };
        // Synthesized case-class `apply`/`unapply` copy the annotations of
        // the class's parameters.
        let owner_flags = symbols.get(symbol.owner).map(|owner| owner.flags).unwrap_or_default();
        if !symbol.is_local() || owner_flags.contains(SymbolFlags::CASE_APPLY) {
            return;
        }
        let message = if owner_flags.contains(SymbolFlags::PRIMARY_CONSTRUCTOR) {
            "You may not export a local definition. To export a (case) class field, \
             use the field meta-annotation like this: @(JSExport @field)."
        } else {
            "You may not export a local definition"
        };
        for export in self.env.exports.exports_of(def.symbol) {
            self.sink.error(export.span, ErrorCode::E7020, message);
        }
    }

    /// Close the traversal and hand back the unit's diagnostics.
    pub(crate) fn finish(self) -> Vec<Diagnostic> {
        for (owner, forwarders) in &self.exporters {
            tracing::warn!(
                owner = %self.symbols().full_name(*owner),
                count = forwarders.len(),
                "export forwarders without an enclosing template were dropped"
            );
        }
        self.sink.into_diagnostics()
    }
}

//! Export intents and forwarder synthesis.
//!
//! The pass never decides on its own what a method is exported as: it asks
//! an [`ExportResolver`] and buffers whatever forwarders come back until the
//! owning declaration's body is finalized. [`AnnotationExports`] is the
//! resolver driven by `@JSExport` annotations.

use jsi_diagnostic::{DiagnosticSink, ErrorCode};
use jsi_ir::name::{getter_name, setter_base_name};
use jsi_ir::{
    decode_name, Constant, Definitions, ExportKind, Name, Span, SymbolFlags, SymbolId, SymbolKind, SymbolTable,
    Tree,
};

/// One export intent attached to a declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExportSpec {
    /// Name the foreign runtime sees.
    pub js_name: Name,
    /// Where the intent was written; export diagnostics point here.
    pub span: Span,
}

/// The export-resolution collaborator.
pub trait ExportResolver {
    /// Export intents attached to `sym`, in declaration order.
    fn exports_of(&self, sym: SymbolId) -> Vec<ExportSpec>;

    /// Forwarders exposing `method`, in the order they should be spliced.
    /// Invalid exports are reported to `sink` and produce no forwarder.
    fn gen_export_members(&self, method: SymbolId, sink: &mut DiagnosticSink) -> Vec<Tree>;
}

/// Resolves exports from `@JSExport` / `@JSExport("name")` annotations.
pub struct AnnotationExports<'a> {
    symbols: &'a SymbolTable,
    defs: &'a Definitions,
}

impl<'a> AnnotationExports<'a> {
    pub fn new(symbols: &'a SymbolTable, defs: &'a Definitions) -> Self {
        AnnotationExports { symbols, defs }
    }

    /// Name used when the annotation does not give one: the source name,
    /// without the local-field or setter suffix. Constructors export under
    /// their class's name.
    fn default_js_name(&self, sym: SymbolId) -> String {
        let named = if self.symbols[sym].is_constructor() {
            self.symbols.owner(sym)
        } else {
            sym
        };
        let encoded = getter_name(self.symbols.name(named));
        let encoded = setter_base_name(encoded).unwrap_or(encoded);
        decode_name(encoded).into_owned()
    }

    fn export_kind(&self, method: SymbolId) -> ExportKind {
        let symbol = &self.symbols[method];
        if !symbol.flags.contains(SymbolFlags::ACCESSOR) {
            ExportKind::Method
        } else if setter_base_name(self.symbols.name(method)).is_some() {
            ExportKind::Setter
        } else {
            ExportKind::Getter
        }
    }

    /// Exporting a constructor exports its class; only the class is checked.
    fn check_class_export(&self, class: SymbolId, exports: &[ExportSpec], sink: &mut DiagnosticSink) {
        let symbol = &self.symbols[class];
        let (code, message) = if !symbol.has_export_visibility() {
            (ErrorCode::E7021, "You may only export public and protected classes")
        } else if symbol.is_local() {
            (ErrorCode::E7022, "You may not export a local class")
        } else if self.symbols.kind(symbol.owner) != Some(SymbolKind::Package) {
            (ErrorCode::E7023, "You may not export a nested class")
        } else if symbol.flags.contains(SymbolFlags::ABSTRACT) || symbol.kind == SymbolKind::Trait {
            (ErrorCode::E7026, "You may not export an abstract class")
        } else {
            return;
        };
        for export in exports {
            sink.error(export.span, code, message);
        }
    }
}

impl ExportResolver for AnnotationExports<'_> {
    fn exports_of(&self, sym: SymbolId) -> Vec<ExportSpec> {
        self.symbols
            .annotations(sym)
            .into_iter()
            .filter(|annotation| annotation.class == self.defs.js_export_annotation)
            .map(|annotation| {
                let js_name = match annotation.args.first() {
                    Some(Constant::Str(name)) => *name,
                    _ => self.symbols.interner().intern(&self.default_js_name(sym)),
                };
                ExportSpec {
                    js_name,
                    span: annotation.span,
                }
            })
            .collect()
    }

    fn gen_export_members(&self, method: SymbolId, sink: &mut DiagnosticSink) -> Vec<Tree> {
        let exports = self.exports_of(method);
        let Some(first) = exports.first() else {
            return Vec::new();
        };
        let symbol = &self.symbols[method];
        // Exported locals are reported when their declaration is finalized.
        if symbol.is_local() {
            return Vec::new();
        }

        let member = if symbol.is_constructor() { "constructor" } else { "method" };
        let owner_type = self.symbols.type_symbol_of(symbol.owner);
        let problem = if self.symbols.is_subclass(owner_type, self.defs.js_any_class) {
            Some((ErrorCode::E7027, format!("You may not export a {member} of a subclass of js.Any")))
        } else if !symbol.has_export_visibility() {
            Some((ErrorCode::E7021, format!("You may only export public and protected {member}s")))
        } else if symbol.flags.contains(SymbolFlags::MACRO) {
            Some((ErrorCode::E7025, "You may not export a macro".to_string()))
        } else {
            None
        };
        if let Some((code, message)) = problem {
            sink.error(first.span, code, message);
            return Vec::new();
        }

        let interner = self.symbols.interner();
        let mut forwarders = Vec::new();
        for export in &exports {
            if interner.lookup(export.js_name).contains("__") {
                sink.error(
                    export.span,
                    ErrorCode::E7024,
                    "An exported name may not contain a double underscore (`__`)",
                );
            } else if symbol.is_constructor() {
                self.check_class_export(symbol.owner, std::slice::from_ref(export), sink);
            } else {
                forwarders.push(Tree::export_forwarder(
                    method,
                    export.js_name,
                    self.export_kind(method),
                    symbol.info.clone(),
                    export.span,
                ));
            }
        }
        forwarders
    }
}

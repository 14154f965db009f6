//! Test helpers for the interop preparation pass.
//!
//! Provides [`Fixture`], a symbol table with the library definitions
//! installed and an `app` package for user declarations, plus builders for
//! the tree shapes the rules match on.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use jsi_diagnostic::{Diagnostic, ErrorCode};
use jsi_ir::{
    Annotation, Constant, Definitions, Name, SharedInterner, Span, SymbolFlags, SymbolId, SymbolKind, SymbolTable,
    Tree, TreeKind, Ty,
};

use crate::{prepare_unit, AnnotationExports, PrepConfig, PrepEnv, PrepError, PrepOutput, SymbolTyper};

/// One-byte span starting at `start`; distinct spans keep labels apart.
pub(crate) fn sp(start: u32) -> Span {
    Span::new(start, start + 1)
}

pub(crate) struct Fixture {
    pub symbols: SymbolTable,
    pub defs: Definitions,
    /// User package `app`.
    pub app: SymbolId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut symbols = SymbolTable::new(SharedInterner::new());
        let defs = Definitions::install(&mut symbols);
        let app = symbols.enter_package(SymbolId::ROOT, "app");
        Fixture { symbols, defs, app }
    }

    pub fn name(&self, s: &str) -> Name {
        self.symbols.interner().intern(s)
    }

    // Symbols

    pub fn class(&mut self, owner: SymbolId, name: &str, flags: SymbolFlags, parents: &[SymbolId]) -> SymbolId {
        let parents = parents.iter().map(|&p| Ty::Class(p)).collect();
        self.symbols.enter_class(owner, name, SymbolKind::Class, flags, parents)
    }

    pub fn trait_(&mut self, owner: SymbolId, name: &str, parents: &[SymbolId]) -> SymbolId {
        let parents = parents.iter().map(|&p| Ty::Class(p)).collect();
        self.symbols
            .enter_class(owner, name, SymbolKind::Trait, SymbolFlags::empty(), parents)
    }

    /// Returns the module symbol.
    pub fn module(&mut self, owner: SymbolId, name: &str, flags: SymbolFlags, parents: &[SymbolId]) -> SymbolId {
        let parents = parents.iter().map(|&p| Ty::Class(p)).collect();
        self.symbols.enter_module(owner, name, flags, parents)
    }

    pub fn method(&mut self, owner: SymbolId, name: &str, flags: SymbolFlags) -> SymbolId {
        self.symbols.enter_method(owner, name, flags, Vec::new(), Ty::Unit)
    }

    pub fn value(&mut self, owner: SymbolId, name: &str, ty: Ty) -> SymbolId {
        self.symbols.enter_value(owner, name, SymbolFlags::empty(), ty)
    }

    /// Attach `@JSExport` (or `@JSExport("name")`) to `sym`.
    pub fn export(&self, sym: SymbolId, js_name: Option<&str>, span: Span) {
        let mut annotation = Annotation::new(self.defs.js_export_annotation, span);
        if let Some(js_name) = js_name {
            annotation = annotation.with_arg(Constant::Str(self.name(js_name)));
        }
        self.symbols.add_annotation(sym, annotation);
    }

    pub fn marker_count(&self, sym: SymbolId) -> usize {
        self.symbols
            .annotations(self.symbols.type_symbol_of(sym))
            .iter()
            .filter(|a| a.class == self.defs.raw_js_type_annotation)
            .count()
    }

    // Definitions

    pub fn package(&self, stats: Vec<Tree>) -> Tree {
        Tree::package_def(self.app, stats, Span::DUMMY)
    }

    pub fn class_def(&self, class: SymbolId, body: Vec<Tree>, span: Span) -> Tree {
        Tree::class_def(class, Tree::template(class, Vec::new(), body, span), span)
    }

    pub fn module_def(&self, module: SymbolId, body: Vec<Tree>, span: Span) -> Tree {
        let module_class = self.symbols.module_class(module);
        Tree::module_def(module, Tree::template(module_class, Vec::new(), body, span), span)
    }

    pub fn def_def(&self, method: SymbolId, rhs: Tree, span: Span) -> Tree {
        Tree::def_def(method, Vec::new(), rhs, span)
    }

    pub fn val_def(&self, value: SymbolId, rhs: Tree, span: Span) -> Tree {
        Tree::val_def(value, rhs, span)
    }

    // Expressions

    pub fn unit(&self) -> Tree {
        Tree::new(TreeKind::Literal(Constant::Unit), Span::DUMMY, Ty::Unit, SymbolId::NONE)
    }

    pub fn int(&self, value: i64, span: Span) -> Tree {
        Tree::new(TreeKind::Literal(Constant::Int(value)), span, Ty::Int, SymbolId::NONE)
    }

    pub fn str_lit(&self, value: &str, span: Span) -> Tree {
        Tree::new(TreeKind::Literal(Constant::Str(self.name(value))), span, Ty::Str, SymbolId::NONE)
    }

    pub fn null(&self, span: Span) -> Tree {
        Tree::new(TreeKind::Literal(Constant::Null), span, Ty::Null, SymbolId::NONE)
    }

    pub fn this(&self, class: SymbolId) -> Tree {
        Tree::this(self.name(self.symbols.name(class)), class, Ty::Class(class), Span::DUMMY)
    }

    pub fn ident(&self, sym: SymbolId, span: Span) -> Tree {
        let ty = self.symbols[sym].info.clone();
        Tree::ident(self.name(self.symbols.name(sym)), sym, ty, span)
    }

    /// `recv.x`; `recv` is expected to be typed `js.Dynamic`.
    pub fn dyn_select(&self, recv: Tree, span: Span) -> Tree {
        Tree::select(recv, self.name("x"), SymbolId::NONE, self.dynamic_ty(), span)
    }

    /// `recv.x(args)`.
    pub fn dyn_apply(&self, recv: Tree, args: Vec<Tree>, span: Span) -> Tree {
        let any_star = Ty::Repeated(Box::new(Ty::Class(self.defs.any_class)));
        let fun = Tree::select(
            recv,
            self.name("x"),
            SymbolId::NONE,
            Ty::method(vec![any_star], self.dynamic_ty()),
            span,
        );
        Tree::apply(fun, args, self.dynamic_ty(), span)
    }

    pub fn dynamic_ty(&self) -> Ty {
        Ty::Class(self.defs.js_dynamic_class)
    }

    /// `Value(args)` called on `this` of the enumeration `enum_class`.
    pub fn enum_value(&self, enum_class: SymbolId, factory: SymbolId, args: Vec<Tree>, span: Span) -> Tree {
        let fun = Tree::select(
            self.this(enum_class),
            self.name("Value"),
            factory,
            self.symbols[factory].info.clone(),
            span,
        );
        Tree::apply(fun, args, Ty::Class(self.defs.enumeration_value_class), span)
    }

    /// `host.Predef.classOf[ty]`, with the type argument at `arg_span`.
    pub fn class_of(&self, ty: Ty, span: Span, arg_span: Span) -> Tree {
        let host = Tree::this(self.name("host"), self.defs.host_package, Ty::NoType, Span::DUMMY);
        let predef = Tree::select(
            host,
            self.name("Predef"),
            self.defs.predef_module,
            Ty::Module(self.defs.predef_module),
            Span::DUMMY,
        );
        let fun = Tree::select(
            predef,
            self.name("classOf"),
            self.defs.class_of_method,
            self.symbols[self.defs.class_of_method].info.clone(),
            span,
        );
        Tree::type_apply(
            fun,
            vec![Tree::type_tree(ty, arg_span)],
            Ty::Class(self.defs.class_class),
            span,
        )
    }

    // Running the pass

    pub fn try_run(&self, tree: Tree, config: PrepConfig) -> Result<PrepOutput, PrepError> {
        let typer = SymbolTyper::new(&self.symbols, &self.defs);
        let exports = AnnotationExports::new(&self.symbols, &self.defs);
        let env = PrepEnv::new(&self.symbols, &self.defs, &typer, &exports);
        prepare_unit(tree, env, config)
    }

    pub fn run_with(&self, tree: Tree, config: PrepConfig) -> PrepOutput {
        self.try_run(tree, config).expect("interop preparation failed")
    }

    pub fn run(&self, tree: Tree) -> PrepOutput {
        self.run_with(tree, PrepConfig::default())
    }
}

pub(crate) fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message.as_str()).collect()
}

pub(crate) fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
    diagnostics.iter().map(|d| d.code).collect()
}

/// First node of `tree` (pre-order) matching `pred`.
pub(crate) fn find<'t>(tree: &'t Tree, pred: impl Fn(&Tree) -> bool) -> Option<&'t Tree> {
    let mut found = None;
    tree.walk(&mut |node| {
        if found.is_none() && pred(node) {
            found = Some(node);
        }
    });
    found
}

/// Body of the first template in `tree`.
pub(crate) fn first_body(tree: &Tree) -> &[Tree] {
    match find(tree, |t| matches!(t.kind, TreeKind::Template { .. })).map(|t| &t.kind) {
        Some(TreeKind::Template { body, .. }) => body,
        _ => &[],
    }
}

//! Resolved symbols and the symbol table.
//!
//! Symbols are entered once (by the type checker, or by test fixtures) and
//! are immutable afterwards with one exception: each symbol's annotation list
//! sits behind its own lock so the interop pass can attach its marker
//! annotation while other units are being prepared on other threads.

use std::borrow::Cow;
use std::fmt;
use std::ops::Index;

use bitflags::bitflags;
use parking_lot::RwLock;
use rustc_hash::FxHashSet;

use crate::name::decode_name;
use crate::{Constant, Name, SharedInterner, Span, Ty};

/// Index of a symbol in a [`SymbolTable`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    /// The absent symbol.
    pub const NONE: SymbolId = SymbolId(u32::MAX);

    /// The root package, always the first symbol entered.
    pub const ROOT: SymbolId = SymbolId(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        SymbolId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for SymbolId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "SymbolId({})", self.0)
        } else {
            write!(f, "SymbolId(NONE)")
        }
    }
}

/// What kind of declaration a symbol stands for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    Package,
    Class,
    Trait,
    /// The term symbol of an `object`.
    Module,
    /// The class backing an `object`.
    ModuleClass,
    Method,
    Value,
    TypeAlias,
    TypeParam,
}

impl SymbolKind {
    /// Term symbols live in the value namespace.
    pub fn is_term(self) -> bool {
        matches!(self, SymbolKind::Module | SymbolKind::Method | SymbolKind::Value)
    }

    /// Symbols that own a template.
    pub fn is_class(self) -> bool {
        matches!(
            self,
            SymbolKind::Class | SymbolKind::Trait | SymbolKind::ModuleClass
        )
    }
}

bitflags! {
    /// Declaration modifiers and compiler-assigned properties.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SymbolFlags: u32 {
        const CASE = 1 << 0;
        const ANONYMOUS = 1 << 1;
        /// Declared inside a block (method body), not a template.
        const LOCAL = 1 << 2;
        const SYNTHETIC = 1 << 3;
        const PRIVATE = 1 << 4;
        const PROTECTED = 1 << 5;
        const ABSTRACT = 1 << 6;
        const CONSTRUCTOR = 1 << 7;
        const PRIMARY_CONSTRUCTOR = 1 << 8;
        const ACCESSOR = 1 << 9;
        /// Synthesized `apply`/`unapply` of a case class companion.
        const CASE_APPLY = 1 << 10;
        const MACRO = 1 << 11;
    }
}

/// An annotation attached to a symbol.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Annotation {
    /// The annotation class.
    pub class: SymbolId,
    pub args: Vec<Constant>,
    pub span: Span,
}

impl Annotation {
    pub fn new(class: SymbolId, span: Span) -> Self {
        Annotation {
            class,
            args: Vec::new(),
            span,
        }
    }

    #[must_use]
    pub fn with_arg(mut self, arg: Constant) -> Self {
        self.args.push(arg);
        self
    }
}

/// A resolved declaration.
pub struct Symbol {
    pub name: Name,
    pub kind: SymbolKind,
    pub owner: SymbolId,
    pub flags: SymbolFlags,
    /// Declared supertypes, in declaration order.
    pub parents: Vec<Ty>,
    /// Declared type: method type for methods, instance type for classes.
    pub info: Ty,
    /// For `Module` symbols, the backing module class.
    pub module_class: SymbolId,
    annotations: RwLock<Vec<Annotation>>,
}

impl Symbol {
    pub fn is_local(&self) -> bool {
        self.flags.contains(SymbolFlags::LOCAL)
    }

    pub fn is_anonymous(&self) -> bool {
        self.flags.contains(SymbolFlags::ANONYMOUS)
    }

    pub fn is_case(&self) -> bool {
        self.flags.contains(SymbolFlags::CASE)
    }

    pub fn is_constructor(&self) -> bool {
        self.flags.contains(SymbolFlags::CONSTRUCTOR)
    }

    /// Public or protected.
    pub fn has_export_visibility(&self) -> bool {
        !self.flags.contains(SymbolFlags::PRIVATE)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("owner", &self.owner)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// All symbols of a compilation run.
pub struct SymbolTable {
    interner: SharedInterner,
    symbols: Vec<Symbol>,
    /// Declared members per owner, parallel to `symbols`.
    decls: Vec<Vec<SymbolId>>,
}

impl SymbolTable {
    /// Create a table containing only the root package.
    pub fn new(interner: SharedInterner) -> Self {
        let mut table = SymbolTable {
            interner,
            symbols: Vec::new(),
            decls: Vec::new(),
        };
        let root = table.interner.intern("<root>");
        table.push(Symbol {
            name: root,
            kind: SymbolKind::Package,
            owner: SymbolId::NONE,
            flags: SymbolFlags::empty(),
            parents: Vec::new(),
            info: Ty::NoType,
            module_class: SymbolId::NONE,
            annotations: RwLock::new(Vec::new()),
        });
        table
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    fn push(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::new(u32::try_from(self.symbols.len()).unwrap_or(u32::MAX - 1));
        let owner = symbol.owner;
        self.symbols.push(symbol);
        self.decls.push(Vec::new());
        if let Some(members) = self.decls.get_mut(owner.index()) {
            members.push(id);
        }
        id
    }

    fn enter(
        &mut self,
        owner: SymbolId,
        name: &str,
        kind: SymbolKind,
        flags: SymbolFlags,
        parents: Vec<Ty>,
        info: impl FnOnce(SymbolId) -> Ty,
    ) -> SymbolId {
        let id = SymbolId::new(u32::try_from(self.symbols.len()).unwrap_or(u32::MAX - 1));
        let name = self.interner.intern(name);
        self.push(Symbol {
            name,
            kind,
            owner,
            flags,
            parents,
            info: info(id),
            module_class: SymbolId::NONE,
            annotations: RwLock::new(Vec::new()),
        })
    }

    // Entering symbols

    pub fn enter_package(&mut self, owner: SymbolId, name: &str) -> SymbolId {
        self.enter(
            owner,
            name,
            SymbolKind::Package,
            SymbolFlags::empty(),
            Vec::new(),
            |_| Ty::NoType,
        )
    }

    /// Enter a class (`kind = Class`) or trait (`kind = Trait`).
    pub fn enter_class(
        &mut self,
        owner: SymbolId,
        name: &str,
        kind: SymbolKind,
        flags: SymbolFlags,
        parents: Vec<Ty>,
    ) -> SymbolId {
        debug_assert!(matches!(kind, SymbolKind::Class | SymbolKind::Trait));
        self.enter(owner, name, kind, flags, parents, Ty::Class)
    }

    /// Enter an object; returns the module symbol. Its module class shares
    /// the name, flags and parents.
    pub fn enter_module(
        &mut self,
        owner: SymbolId,
        name: &str,
        flags: SymbolFlags,
        parents: Vec<Ty>,
    ) -> SymbolId {
        let module = self.enter(owner, name, SymbolKind::Module, flags, Vec::new(), Ty::Module);
        let module_class = self.enter(
            owner,
            name,
            SymbolKind::ModuleClass,
            flags,
            parents,
            Ty::Class,
        );
        if let Some(symbol) = self.symbols.get_mut(module.index()) {
            symbol.module_class = module_class;
        }
        module
    }

    pub fn enter_method(
        &mut self,
        owner: SymbolId,
        name: &str,
        flags: SymbolFlags,
        params: Vec<Ty>,
        result: Ty,
    ) -> SymbolId {
        self.enter(owner, name, SymbolKind::Method, flags, Vec::new(), |_| {
            Ty::method(params, result)
        })
    }

    pub fn enter_value(&mut self, owner: SymbolId, name: &str, flags: SymbolFlags, ty: Ty) -> SymbolId {
        self.enter(owner, name, SymbolKind::Value, flags, Vec::new(), |_| ty)
    }

    pub fn enter_alias(&mut self, owner: SymbolId, name: &str, target: Ty) -> SymbolId {
        self.enter(
            owner,
            name,
            SymbolKind::TypeAlias,
            SymbolFlags::empty(),
            Vec::new(),
            |_| target,
        )
    }

    pub fn enter_type_param(&mut self, owner: SymbolId, name: &str) -> SymbolId {
        self.enter(
            owner,
            name,
            SymbolKind::TypeParam,
            SymbolFlags::empty(),
            Vec::new(),
            Ty::Param,
        )
    }

    // Names

    /// Encoded name of a symbol.
    pub fn name(&self, id: SymbolId) -> &'static str {
        self.get(id).map_or("<none>", |s| self.interner.lookup(s.name))
    }

    /// Source spelling of a symbol's name.
    pub fn decoded_name(&self, id: SymbolId) -> Cow<'static, str> {
        decode_name(self.name(id))
    }

    /// Dotted full name, root package excluded.
    pub fn full_name(&self, id: SymbolId) -> String {
        let mut parts = Vec::new();
        let mut current = id;
        while current.is_valid() && current != SymbolId::ROOT {
            let Some(symbol) = self.get(current) else {
                break;
            };
            parts.push(self.interner.lookup(symbol.name));
            current = symbol.owner;
        }
        parts.reverse();
        parts.join(".")
    }

    // Structure

    pub fn owner(&self, id: SymbolId) -> SymbolId {
        self.get(id).map_or(SymbolId::NONE, |s| s.owner)
    }

    pub fn kind(&self, id: SymbolId) -> Option<SymbolKind> {
        self.get(id).map(|s| s.kind)
    }

    /// Declared members of `owner`, in entry order.
    pub fn decls(&self, owner: SymbolId) -> &[SymbolId] {
        self.decls.get(owner.index()).map_or(&[], Vec::as_slice)
    }

    /// Innermost package containing `id` (itself, if it is a package).
    pub fn enclosing_package(&self, id: SymbolId) -> SymbolId {
        let mut current = id;
        while let Some(symbol) = self.get(current) {
            if symbol.kind == SymbolKind::Package {
                return current;
            }
            current = symbol.owner;
        }
        SymbolId::NONE
    }

    /// Whether `id` is reachable through a path of packages and objects.
    pub fn is_static(&self, id: SymbolId) -> bool {
        let owner = self.owner(id);
        match self.kind(owner) {
            Some(SymbolKind::Package) => true,
            Some(SymbolKind::ModuleClass) => self.is_static(owner),
            _ => false,
        }
    }

    /// The class symbol a declaration's instances have: the module class for
    /// objects, the symbol itself otherwise.
    pub fn type_symbol_of(&self, id: SymbolId) -> SymbolId {
        match self.get(id) {
            Some(symbol) if symbol.kind == SymbolKind::Module => symbol.module_class,
            Some(_) => id,
            None => SymbolId::NONE,
        }
    }

    pub fn module_class(&self, module: SymbolId) -> SymbolId {
        self.get(module).map_or(SymbolId::NONE, |s| s.module_class)
    }

    // Types

    /// Expand type aliases.
    pub fn dealias(&self, ty: &Ty) -> Ty {
        let mut current = ty.clone();
        // Alias chains are short; the bound only guards against cycles.
        for _ in 0..64 {
            match current {
                Ty::Alias(alias) => {
                    current = self.get(alias).map_or(Ty::Error, |s| s.info.clone());
                }
                other => return other,
            }
        }
        Ty::Error
    }

    /// Widen singleton types to their underlying class type.
    pub fn widen(&self, ty: &Ty) -> Ty {
        match ty {
            Ty::Module(module) => Ty::Class(self.module_class(*module)),
            other => other.clone(),
        }
    }

    /// The class symbol of a (dealiased, widened) type, or `NONE`.
    pub fn type_symbol(&self, ty: &Ty) -> SymbolId {
        match self.widen(&self.dealias(ty)) {
            Ty::Class(class) => class,
            _ => SymbolId::NONE,
        }
    }

    /// Reflexive, transitive subclass test over declared parents.
    pub fn is_subclass(&self, sym: SymbolId, base: SymbolId) -> bool {
        if !sym.is_valid() || !base.is_valid() {
            return false;
        }
        let mut seen = FxHashSet::default();
        let mut stack = vec![sym];
        while let Some(current) = stack.pop() {
            if current == base {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(symbol) = self.get(current) {
                stack.extend(
                    symbol
                        .parents
                        .iter()
                        .map(|parent| self.type_symbol(parent))
                        .filter(|parent| parent.is_valid()),
                );
            }
        }
        false
    }

    /// Whether values of `ty` are instances of the class `base`.
    pub fn derives_from(&self, ty: &Ty, base: SymbolId) -> bool {
        self.is_subclass(self.type_symbol(ty), base)
    }

    /// Term members named `name` declared in `owner` or inherited from its
    /// parents; own declarations come first.
    pub fn members_named(&self, owner: SymbolId, name: Name) -> Vec<SymbolId> {
        let mut found = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue = vec![owner];
        while let Some(current) = queue.pop() {
            if !seen.insert(current) {
                continue;
            }
            for &member in self.decls(current) {
                if let Some(symbol) = self.get(member) {
                    if symbol.name == name && symbol.kind.is_term() && !found.contains(&member) {
                        found.push(member);
                    }
                }
            }
            if let Some(symbol) = self.get(current) {
                queue.extend(
                    symbol
                        .parents
                        .iter()
                        .rev()
                        .map(|parent| self.type_symbol(parent))
                        .filter(|parent| parent.is_valid()),
                );
            }
        }
        found
    }

    /// Render a type for diagnostics.
    pub fn display_ty(&self, ty: &Ty) -> String {
        match ty {
            Ty::NoType => "<notype>".to_string(),
            Ty::Error => "<error>".to_string(),
            Ty::Nothing => "Nothing".to_string(),
            Ty::Null => "Null".to_string(),
            Ty::Unit => "Unit".to_string(),
            Ty::Bool => "Boolean".to_string(),
            Ty::Int => "Int".to_string(),
            Ty::Str => "String".to_string(),
            Ty::Class(sym) | Ty::Alias(sym) | Ty::Param(sym) => self.decoded_name(*sym).into_owned(),
            Ty::Module(sym) => format!("{}.type", self.decoded_name(*sym)),
            Ty::Repeated(elem) => format!("{}*", self.display_ty(elem)),
            Ty::Method { params, result } => {
                let params: Vec<String> = params.iter().map(|p| self.display_ty(p)).collect();
                format!("({}){}", params.join(", "), self.display_ty(result))
            }
        }
    }

    // Annotations

    /// Snapshot of a symbol's annotations.
    pub fn annotations(&self, id: SymbolId) -> Vec<Annotation> {
        self.get(id)
            .map(|s| s.annotations.read().clone())
            .unwrap_or_default()
    }

    pub fn has_annotation(&self, id: SymbolId, class: SymbolId) -> bool {
        self.get(id)
            .is_some_and(|s| s.annotations.read().iter().any(|a| a.class == class))
    }

    /// Append an annotation (used while entering symbols).
    pub fn add_annotation(&self, id: SymbolId, annotation: Annotation) {
        if let Some(symbol) = self.get(id) {
            symbol.annotations.write().push(annotation);
        }
    }

    /// Replace a symbol's annotation list.
    pub fn set_annotations(&self, id: SymbolId, annotations: Vec<Annotation>) {
        if let Some(symbol) = self.get(id) {
            *symbol.annotations.write() = annotations;
        }
    }

    /// Put `annotation` first unless an annotation of the same class is
    /// already attached. Check and insert happen under one write lock.
    /// Returns whether the annotation was added.
    pub fn prepend_annotation_once(&self, id: SymbolId, annotation: Annotation) -> bool {
        let Some(symbol) = self.get(id) else {
            return false;
        };
        let mut annotations = symbol.annotations.write();
        if annotations.iter().any(|a| a.class == annotation.class) {
            return false;
        }
        annotations.insert(0, annotation);
        true
    }
}

impl Index<SymbolId> for SymbolTable {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("symbols", &self.symbols.len())
            .finish_non_exhaustive()
    }
}

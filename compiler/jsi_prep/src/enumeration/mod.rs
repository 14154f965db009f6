//! Naming of `Enumeration` values.
//!
//! `Enumeration.Value()` recovers the value's name by reflection at run
//! time, which the foreign runtime does not support. Where the name is
//! statically known (`val v = Value()` directly in an enumeration body) the
//! call is switched to the overload taking the name as a string; anywhere
//! else the call is left alone with a warning.

use jsi_ir::name::getter_name;
use jsi_ir::{decode_name, Constant, Definitions, SymbolId, Tree, TreeKind, Ty};

use crate::driver::PrepInterop;
use crate::scope::Scope;
use crate::PrepError;

const RULE: &str = "enumeration value";

fn is_unnamed_factory(defs: &Definitions, sym: SymbolId) -> bool {
    sym == defs.enum_value_no_arg || sym == defs.enum_value_int
}

fn is_named_factory(defs: &Definitions, sym: SymbolId) -> bool {
    sym == defs.enum_value_name || sym == defs.enum_value_int_name
}

/// The named overload matching an unnamed one.
fn named_overload(defs: &Definitions, unnamed: SymbolId) -> SymbolId {
    if unnamed == defs.enum_value_int {
        defs.enum_value_int_name
    } else {
        defs.enum_value_name
    }
}

/// `Value()` or `Value(i)`, anywhere.
pub(crate) fn is_unnamed_factory_call(defs: &Definitions, tree: &Tree) -> bool {
    matches!(tree.kind, TreeKind::Apply { .. }) && is_unnamed_factory(defs, tree.fun_symbol())
}

/// `Value(null)` or `Value(i, null)`.
pub(crate) fn is_null_named_factory_call(defs: &Definitions, tree: &Tree) -> bool {
    let TreeKind::Apply { args, .. } = &tree.kind else {
        return false;
    };
    is_named_factory(defs, tree.fun_symbol())
        && matches!(args.last(), Some(Tree { kind: TreeKind::Literal(constant), .. }) if constant.is_null())
}

/// `val v = Value()` or `val v = Value(i)`, the factory called directly.
pub(crate) fn is_unnamed_value_def(defs: &Definitions, tree: &Tree) -> bool {
    let TreeKind::ValDef { rhs } = &tree.kind else {
        return false;
    };
    let TreeKind::Apply { fun, .. } = &rhs.kind else {
        return false;
    };
    matches!(fun.kind, TreeKind::Select { .. } | TreeKind::Ident(_)) && is_unnamed_factory(defs, fun.symbol)
}

/// Rewrite `val v = Value(..)` to pass `"v"` as the name, then traverse
/// the rewritten definition.
pub(crate) fn name_value_def(cx: &mut PrepInterop<'_>, tree: Tree, scope: Scope) -> Result<Tree, PrepError> {
    let Tree {
        kind,
        span,
        ty,
        symbol,
    } = tree;
    let rhs = match kind {
        TreeKind::ValDef { rhs } => *rhs,
        other => return Err(unexpected("value definition", &other, span)),
    };
    let (fun, mut args) = match rhs.kind {
        TreeKind::Apply { fun, args } => (*fun, args),
        other => return Err(unexpected("application", &other, rhs.span)),
    };

    let symbols = cx.symbols();
    let factory = named_overload(cx.defs(), fun.symbol);
    let fun = match fun.kind {
        TreeKind::Select { qualifier, name } => Tree::select(*qualifier, name, factory, Ty::NoType, fun.span),
        TreeKind::Ident(name) => Tree::ident(name, factory, Ty::NoType, fun.span),
        other => return Err(unexpected("factory reference", &other, fun.span)),
    };
    let value_name = decode_name(getter_name(symbols.name(symbol))).into_owned();
    tracing::trace!(value = %value_name, "naming enumeration value");
    args.push(Tree::literal(
        Constant::Str(symbols.interner().intern(&value_name)),
        rhs.span,
    ));

    let named = Tree::apply(fun, args, Ty::NoType, rhs.span);
    let named = cx.retype(RULE, named, &rhs.ty)?;
    let def = Tree::new(TreeKind::ValDef { rhs: Box::new(named) }, span, ty, symbol);
    cx.descend(def, scope)
}

fn unexpected(expected: &'static str, found: &TreeKind, span: jsi_ir::Span) -> PrepError {
    PrepError::UnexpectedShape {
        rule: RULE,
        expected,
        found: found.describe(),
        span,
    }
}

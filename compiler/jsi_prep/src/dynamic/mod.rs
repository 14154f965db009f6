//! Dynamic-access shorthands on `js.Dynamic`.
//!
//! `recv.x(args)` becomes `recv.applyDynamic("x")(args)` and `recv.x`
//! becomes `recv.selectDynamic("x")`. Only the member name `x` (after
//! decoding) on a receiver statically typed `js.Dynamic` is rewritten.
//! Receivers and arguments are traversed first, so chains like
//! `a.x.x(b.x)` are rewritten inside out.

use jsi_ir::{decode_name, Constant, Span, SymbolId, Tree, TreeKind, Ty};

use crate::driver::PrepInterop;
use crate::scope::Scope;
use crate::PrepError;

/// The member name the shorthand is written with.
const SHORTHAND: &str = "x";

fn is_shorthand_member(cx: &PrepInterop<'_>, tree: &Tree) -> bool {
    let TreeKind::Select { qualifier, name } = &tree.kind else {
        return false;
    };
    let symbols = cx.symbols();
    decode_name(symbols.interner().lookup(*name)) == SHORTHAND
        && symbols.type_symbol(&qualifier.ty) == cx.defs().js_dynamic_class
}

/// `recv.x` on a `js.Dynamic` receiver.
pub(crate) fn is_shorthand_select(cx: &PrepInterop<'_>, tree: &Tree) -> bool {
    is_shorthand_member(cx, tree)
}

/// `recv.x(args)` on a `js.Dynamic` receiver.
pub(crate) fn is_shorthand_apply(cx: &PrepInterop<'_>, tree: &Tree) -> bool {
    match &tree.kind {
        TreeKind::Apply { fun, .. } => is_shorthand_member(cx, fun),
        _ => false,
    }
}

pub(crate) fn rewrite_apply(cx: &mut PrepInterop<'_>, tree: Tree, scope: Scope) -> Result<Tree, PrepError> {
    const RULE: &str = "dynamic application";
    let (fun, args) = match tree.kind {
        TreeKind::Apply { fun, args } => (*fun, args),
        other => return Err(unexpected(RULE, &other, tree.span)),
    };
    let receiver = match fun.kind {
        TreeKind::Select { qualifier, .. } => cx.transform(*qualifier, scope)?,
        other => return Err(unexpected(RULE, &other, fun.span)),
    };
    let args = args
        .into_iter()
        .map(|arg| cx.transform(arg, scope))
        .collect::<Result<Vec<_>, _>>()?;

    let apply_dynamic = dynamic_call(cx, receiver, "applyDynamic", cx.defs().js_apply_dynamic, fun.span);
    let rewritten = Tree::apply(apply_dynamic, args, Ty::NoType, tree.span);
    cx.retype(RULE, rewritten, &tree.ty)
}

pub(crate) fn rewrite_select(cx: &mut PrepInterop<'_>, tree: Tree, scope: Scope) -> Result<Tree, PrepError> {
    const RULE: &str = "dynamic selection";
    let receiver = match tree.kind {
        TreeKind::Select { qualifier, .. } => cx.transform(*qualifier, scope)?,
        other => return Err(unexpected(RULE, &other, tree.span)),
    };
    let rewritten = dynamic_call(cx, receiver, "selectDynamic", cx.defs().js_select_dynamic, tree.span);
    cx.retype(RULE, rewritten, &tree.ty)
}

/// `receiver.method("x")`, untyped.
fn dynamic_call(cx: &PrepInterop<'_>, receiver: Tree, method: &str, symbol: SymbolId, span: Span) -> Tree {
    let interner = cx.symbols().interner();
    let select = Tree::select(receiver, interner.intern(method), symbol, Ty::NoType, span);
    let member = Tree::literal(Constant::Str(interner.intern(SHORTHAND)), span);
    Tree::apply(select, vec![member], Ty::NoType, span)
}

fn unexpected(rule: &'static str, found: &TreeKind, span: Span) -> PrepError {
    PrepError::UnexpectedShape {
        rule,
        expected: "selection of `x`",
        found: found.describe(),
        span,
    }
}

use super::*;
use crate::{SharedInterner, StringInterner};

fn interner() -> SharedInterner {
    SharedInterner::new()
}

fn int_lit(value: i64, at: u32) -> Tree {
    let mut lit = Tree::literal(Constant::Int(value), Span::new(at, at + 1));
    lit.ty = Ty::Int;
    lit
}

fn call(interner: &StringInterner) -> Tree {
    let recv = Tree::ident(interner.intern("recv"), SymbolId::NONE, Ty::Int, Span::new(0, 4));
    let fun = Tree::select(recv, interner.intern("plus"), SymbolId::NONE, Ty::NoType, Span::new(0, 9));
    Tree::apply(fun, vec![int_lit(1, 10), int_lit(2, 13)], Ty::Int, Span::new(0, 15))
}

#[test]
fn children_are_in_source_order() {
    let interner = interner();
    let tree = call(&interner);
    let spans: Vec<Span> = tree.children().iter().map(|c| c.span).collect();
    assert_eq!(spans, vec![Span::new(0, 9), Span::new(10, 11), Span::new(13, 14)]);
}

#[test]
fn try_map_children_rebuilds_node() {
    let interner = interner();
    let tree = call(&interner);
    let mapped: Result<Tree, ()> = tree.clone().try_map_children(|child| {
        Ok(match child.kind {
            TreeKind::Literal(Constant::Int(v)) => int_lit(v * 10, child.span.start),
            _ => child,
        })
    });
    let Ok(mapped) = mapped else {
        panic!("mapping failed");
    };
    assert_eq!(mapped.span, tree.span);
    assert_eq!(mapped.ty, tree.ty);
    match &mapped.kind {
        TreeKind::Apply { args, .. } => {
            assert_eq!(args[0].kind, TreeKind::Literal(Constant::Int(10)));
            assert_eq!(args[1].kind, TreeKind::Literal(Constant::Int(20)));
        }
        other => panic!("expected Apply, got {other:?}"),
    }
}

#[test]
fn try_map_children_stops_at_first_error() {
    let interner = interner();
    let mut visited = 0;
    let result: Result<Tree, &str> = call(&interner).try_map_children(|child| {
        visited += 1;
        if matches!(child.kind, TreeKind::Literal(_)) {
            Err("literal")
        } else {
            Ok(child)
        }
    });
    assert_eq!(result, Err("literal"));
    assert_eq!(visited, 2);
}

#[test]
fn walk_visits_every_node() {
    let interner = interner();
    let mut count = 0;
    call(&interner).walk(&mut |_| count += 1);
    // apply, select, ident, two literals
    assert_eq!(count, 5);
}

#[test]
fn fun_symbol_looks_through_applications() {
    let interner = interner();
    let method = SymbolId::new(7);
    let recv = Tree::this(interner.intern("Days"), SymbolId::NONE, Ty::NoType, Span::DUMMY);
    let fun = Tree::select(recv, interner.intern("Value"), method, Ty::NoType, Span::DUMMY);
    let inner = Tree::apply(fun, Vec::new(), Ty::NoType, Span::DUMMY);
    let outer = Tree::apply(inner, Vec::new(), Ty::NoType, Span::DUMMY);
    assert_eq!(outer.fun_symbol(), method);
}

//! Debug-only checks on the prepared tree.
//!
//! After a successful traversal no interop shorthand may survive: the code
//! generator has no lowering for `x` on `js.Dynamic` or for a raw
//! `classOf`. A violation here is a bug in the rule table.

use jsi_ir::{decode_name, Definitions, SymbolTable, Tree, TreeKind};

use crate::class_of::is_raw_class_of;

/// Shorthands left in `tree`, one message per occurrence.
#[cfg_attr(not(debug_assertions), allow(dead_code))]
pub(crate) fn violations(tree: &Tree, symbols: &SymbolTable, defs: &Definitions) -> Vec<String> {
    let mut found = Vec::new();
    tree.walk(&mut |node| match &node.kind {
        TreeKind::Select { qualifier, name }
            if decode_name(symbols.interner().lookup(*name)) == "x"
                && symbols.type_symbol(&qualifier.ty) == defs.js_dynamic_class =>
        {
            found.push(format!("dynamic shorthand `x` left at {:?}", node.span));
        }
        TreeKind::TypeApply { .. } if is_raw_class_of(defs, node) => {
            found.push(format!("raw classOf left at {:?}", node.span));
        }
        _ => {}
    });
    found
}

/// Assert that `tree` is free of interop shorthands (debug builds only).
#[cfg(debug_assertions)]
pub(crate) fn validate(tree: &Tree, symbols: &SymbolTable, defs: &Definitions) {
    let found = violations(tree, symbols, defs);
    debug_assert!(
        found.is_empty(),
        "interop preparation left {} shorthand(s):\n{}",
        found.len(),
        found.join("\n")
    );
}

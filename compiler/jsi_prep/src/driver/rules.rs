//! The rule table.
//!
//! Rules are tried in table order and the first matching guard wins; ties
//! between overlapping guards are resolved by position alone.

use jsi_diagnostic::ErrorCode;
use jsi_ir::{SymbolKind, Tree, TreeKind};

use super::PrepInterop;
use crate::scope::{Scope, ScopeFlags};
use crate::{class_of, dynamic, enumeration, validate_js, PrepError};

type Guard = fn(&PrepInterop<'_>, &Tree, Scope) -> bool;
type Apply = fn(&mut PrepInterop<'_>, Tree, Scope) -> Result<Tree, PrepError>;

pub(crate) struct Rule {
    pub(crate) name: &'static str,
    pub(crate) guard: Guard,
    pub(crate) apply: Apply,
}

pub(crate) static RULES: &[Rule] = &[
    Rule {
        name: "js_class_in_module",
        guard: |cx, tree, scope| is_class_def(tree) && scope.js_any_class_only() && cx.is_js_any(tree),
        apply: validate_js::transform_js_any,
    },
    Rule {
        name: "inner_impl_def",
        guard: |_, tree, scope| tree.is_impl_def() && !scope.allow_impl_def(),
        apply: inner_impl_def,
    },
    Rule {
        name: "js_any_impl_def",
        guard: |cx, tree, _| tree.is_impl_def() && cx.is_js_any(tree),
        apply: validate_js::transform_js_any,
    },
    Rule {
        name: "enumeration_impl",
        guard: |cx, tree, _| is_class_def(tree) && tree.symbol == cx.defs().enumeration_class,
        apply: |cx, tree, scope| cx.descend(tree, scope.enter(ScopeFlags::ENUM_IMPL)),
    },
    Rule {
        name: "enumeration_class",
        guard: |cx, tree, _| is_class_def(tree) && extends_enumeration(cx, tree),
        apply: |cx, tree, scope| cx.descend(tree, scope.enter(ScopeFlags::HOST_CLASS | ScopeFlags::ENUM_SUBCLASS)),
    },
    Rule {
        name: "enumeration_module",
        guard: |cx, tree, _| is_module_def(tree) && extends_enumeration(cx, tree),
        apply: |cx, tree, scope| cx.descend(tree, scope.enter(ScopeFlags::ENUM_SUBCLASS)),
    },
    Rule {
        name: "host_class",
        guard: |_, tree, _| is_class_def(tree),
        apply: |cx, tree, scope| cx.descend(tree, scope.enter(ScopeFlags::HOST_CLASS)),
    },
    Rule {
        name: "enum_value_def",
        guard: |cx, tree, scope| scope.in_enum_subclass() && enumeration::is_unnamed_value_def(cx.defs(), tree),
        apply: enumeration::name_value_def,
    },
    Rule {
        name: "enum_value_unnamed",
        guard: |cx, tree, scope| !scope.in_enum_impl() && enumeration::is_unnamed_factory_call(cx.defs(), tree),
        apply: |cx, tree, scope| {
            cx.sink.warning(
                tree.span,
                ErrorCode::W7001,
                "Couldn't transform call to Enumeration.Value. The resulting program is unlikely \
                 to function properly as this operation requires reflection.",
            );
            cx.descend(tree, scope)
        },
    },
    Rule {
        name: "enum_value_null_name",
        guard: |cx, tree, scope| !scope.in_enum_impl() && enumeration::is_null_named_factory_call(cx.defs(), tree),
        apply: |cx, tree, scope| {
            cx.sink.warning(
                tree.span,
                ErrorCode::W7002,
                "Passing null as name to Enumeration.Value requires reflection at runtime. \
                 The resulting program is unlikely to function properly.",
            );
            cx.descend(tree, scope)
        },
    },
    Rule {
        name: "class_of",
        guard: |cx, tree, _| class_of::is_raw_class_of(cx.defs(), tree),
        apply: |cx, tree, _| class_of::fix_class_of(cx, tree),
    },
    Rule {
        name: "method_exports",
        guard: |_, tree, _| matches!(tree.kind, TreeKind::DefDef { .. }),
        apply: |cx, tree, scope| {
            cx.collect_exports(tree.symbol);
            cx.descend(tree, scope)
        },
    },
    Rule {
        name: "module_exports",
        guard: |_, tree, _| is_module_def(tree),
        apply: |cx, tree, scope| {
            check_module_exports(cx, &tree);
            cx.descend(tree, scope)
        },
    },
    Rule {
        name: "dynamic_apply",
        guard: |cx, tree, _| dynamic::is_shorthand_apply(cx, tree),
        apply: dynamic::rewrite_apply,
    },
    Rule {
        name: "dynamic_select",
        guard: |cx, tree, _| dynamic::is_shorthand_select(cx, tree),
        apply: dynamic::rewrite_select,
    },
];

/// First rule whose guard accepts `tree` in `scope`.
pub(crate) fn find(cx: &PrepInterop<'_>, tree: &Tree, scope: Scope) -> Option<&'static Rule> {
    RULES.iter().find(|rule| (rule.guard)(cx, tree, scope))
}

fn is_class_def(tree: &Tree) -> bool {
    matches!(tree.kind, TreeKind::ClassDef { .. })
}

fn is_module_def(tree: &Tree) -> bool {
    matches!(tree.kind, TreeKind::ModuleDef { .. })
}

fn extends_enumeration(cx: &PrepInterop<'_>, tree: &Tree) -> bool {
    let symbols = cx.symbols();
    symbols.is_subclass(symbols.type_symbol_of(tree.symbol), cx.defs().enumeration_class)
}

fn inner_impl_def(cx: &mut PrepInterop<'_>, tree: Tree, scope: Scope) -> Result<Tree, PrepError> {
    cx.sink.error(
        tree.span,
        ErrorCode::E7007,
        "Traits, classes and objects extending js.Any may not have inner traits, classes or objects",
    );
    cx.descend(tree, scope)
}

/// Objects are exported by the code generator; only their placement is
/// checked here.
fn check_module_exports(cx: &mut PrepInterop<'_>, tree: &Tree) {
    let symbols = cx.symbols();
    let Some(module) = symbols.get(tree.symbol) else {
        return;
    };
    // Local objects are reported with the other exported locals.
    if module.is_local() {
        return;
    }
    let (code, message) = if !module.has_export_visibility() {
        (ErrorCode::E7021, "You may only export public and protected objects")
    } else if symbols.kind(module.owner) != Some(SymbolKind::Package) {
        (ErrorCode::E7023, "You may not export a nested object")
    } else {
        return;
    };
    for export in cx.env.exports.exports_of(tree.symbol) {
        cx.sink.error(export.span, code, message);
    }
}

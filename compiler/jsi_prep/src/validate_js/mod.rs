//! Structural validation of declarations extending js.Any.
//!
//! Every check is independent: a declaration may collect several errors,
//! and traversal of its body continues either way. Only a declaration with
//! no problems is tagged with the `RawJSType` marker the code generator
//! keys on.

use jsi_diagnostic::ErrorCode;
use jsi_ir::{Annotation, Definitions, SymbolId, SymbolTable, Tree, TreeKind};

use crate::driver::PrepInterop;
use crate::scope::{Scope, ScopeFlags};
use crate::PrepError;

/// Strip the longest common dotted prefix of two full names.
///
/// At least the last segment of each name is kept, so two equal names
/// reduce to their simple names rather than to nothing.
pub fn distinguishing_suffix(own: &str, other: &str) -> (String, String) {
    let own_parts: Vec<&str> = own.split('.').collect();
    let other_parts: Vec<&str> = other.split('.').collect();
    let max_common = own_parts.len().min(other_parts.len()).saturating_sub(1);
    let common = own_parts
        .iter()
        .zip(&other_parts)
        .take(max_common)
        .take_while(|(a, b)| a == b)
        .count();
    (own_parts[common..].join("."), other_parts[common..].join("."))
}

/// Compiler-synthesized anonymous class implementing a js function type.
pub(crate) fn is_lambda_adapter(symbols: &SymbolTable, defs: &Definitions, class: SymbolId) -> bool {
    symbols.get(class).is_some_and(|symbol| symbol.is_anonymous())
        && symbols.is_subclass(class, defs.js_function_class)
}

/// Problems with the declaration `decl` (a class, trait or object
/// extending js.Any) in `scope`, in reporting order.
pub(crate) fn structural_problems(
    symbols: &SymbolTable,
    defs: &Definitions,
    decl: &Tree,
    scope: Scope,
) -> Vec<(ErrorCode, String)> {
    let type_sym = symbols.type_symbol_of(decl.symbol);
    let Some(symbol) = symbols.get(type_sym) else {
        return Vec::new();
    };
    let is_module = matches!(decl.kind, TreeKind::ModuleDef { .. });
    let lambda_adapter = is_lambda_adapter(symbols, defs, type_sym);
    let mut problems = Vec::new();

    let exempt_parents = lambda_adapter || defs.is_interop_library_package(symbols.enclosing_package(type_sym));
    if !exempt_parents {
        let bad_parent = symbol
            .parents
            .iter()
            .map(|parent| symbols.type_symbol(parent))
            .find(|&parent| !symbols.is_subclass(parent, defs.js_any_class));
        if let Some(parent) = bad_parent {
            let (own, other) = distinguishing_suffix(&symbols.full_name(type_sym), &symbols.full_name(parent));
            problems.push((
                ErrorCode::E7001,
                format!("{own} extends {other} which does not extend js.Any."),
            ));
        }
    }

    if symbol.is_anonymous() && !lambda_adapter {
        problems.push((ErrorCode::E7002, "Anonymous classes may not extend js.Any".to_string()));
    }

    if symbol.is_case() {
        problems.push((
            ErrorCode::E7003,
            "Classes and objects extending js.Any may not have a case modifier".to_string(),
        ));
    }

    let misplaced = if is_module {
        !scope.allow_js_any()
    } else {
        !scope.allow_js_any() && !scope.js_any_class_only() && !lambda_adapter
    };
    if misplaced {
        problems.push((
            ErrorCode::E7004,
            "Classes and objects extending js.Any may not be defined inside a class or trait".to_string(),
        ));
    }

    if symbols.is_subclass(type_sym, defs.js_global_scope_class)
        && type_sym != defs.js_global_scope_class
        && type_sym != symbols.module_class(defs.js_global_module)
    {
        problems.push((
            ErrorCode::E7006,
            "Only the global scope object may extend js.GlobalScope".to_string(),
        ));
    }

    problems
}

/// Validate a js.Any declaration, tag it when it passes, and traverse its
/// body in the matching js scope.
pub(crate) fn transform_js_any(cx: &mut PrepInterop<'_>, tree: Tree, scope: Scope) -> Result<Tree, PrepError> {
    let symbols = cx.symbols();
    let problems = structural_problems(symbols, cx.defs(), &tree, scope);
    if problems.is_empty() {
        let type_sym = symbols.type_symbol_of(tree.symbol);
        let marker = Annotation::new(cx.defs().raw_js_type_annotation, tree.span);
        if symbols.prepend_annotation_once(type_sym, marker) {
            tracing::debug!(decl = %symbols.full_name(type_sym), "attached RawJSType marker");
        }
    } else {
        for (code, message) in problems {
            cx.sink.error(tree.span, code, message);
        }
    }

    let flags = if matches!(tree.kind, TreeKind::ModuleDef { .. }) {
        ScopeFlags::JS_ANY_MODULE
    } else {
        ScopeFlags::JS_ANY_CLASS
    };
    cx.descend(tree, scope.enter(flags))
}

#[cfg(test)]
mod tests;

//! Unresolved reflective type tokens.
//!
//! The type checker normally folds `classOf[T]` into a class literal. When
//! it does not, the call survives as `host.Predef.classOf[T]`, which has no
//! runtime implementation. With `fixClassOf` the pass performs the folding
//! itself; otherwise the token is reported.

use jsi_diagnostic::ErrorCode;
use jsi_ir::{Constant, Definitions, Tree, TreeKind};

use crate::driver::PrepInterop;
use crate::PrepError;

const RULE: &str = "classOf";

/// `host.Predef.classOf[T]` selected through `this` of the `host` package.
pub(crate) fn is_raw_class_of(defs: &Definitions, tree: &Tree) -> bool {
    let TreeKind::TypeApply { fun, args } = &tree.kind else {
        return false;
    };
    let TreeKind::Select { qualifier: predef, .. } = &fun.kind else {
        return false;
    };
    let TreeKind::Select { qualifier: host, .. } = &predef.kind else {
        return false;
    };
    args.len() == 1
        && fun.symbol == defs.class_of_method
        && predef.symbol == defs.predef_module
        && matches!(host.kind, TreeKind::This(_))
        && host.symbol == defs.host_package
}

/// Replace a raw token with a class literal, or report it. Reported tokens
/// leave an empty tree behind.
pub(crate) fn fix_class_of(cx: &mut PrepInterop<'_>, tree: Tree) -> Result<Tree, PrepError> {
    let (fun_span, arg) = match &tree.kind {
        TreeKind::TypeApply { fun, args } => match args.as_slice() {
            [arg] => (fun.span, arg),
            _ => return Err(unexpected("one type argument", &tree)),
        },
        _ => return Err(unexpected("type application", &tree)),
    };

    if !cx.config.fix_class_of {
        cx.sink.error(
            fun_span,
            ErrorCode::E7011,
            "This classOf resulted in an unresolved classOf in the interop preparation phase. \
             This is most likely a bug in the compiler. It can be worked around by enabling \
             the `fixClassOf` option.",
        );
        return Ok(Tree::empty(tree.span));
    }

    let symbols = cx.symbols();
    // Singleton types widen to a class; test the argument before widening.
    let dealiased = symbols.dealias(&arg.ty);
    if !cx.env.typer.is_class_type(&dealiased) {
        let message = format!("Type {} is not a class type", symbols.display_ty(&arg.ty));
        cx.sink.error(arg.span, ErrorCode::E7010, message);
        return Ok(Tree::empty(tree.span));
    }
    let class_ty = symbols.widen(&dealiased);

    tracing::trace!(ty = %symbols.display_ty(&class_ty), "folding classOf");
    let literal = Tree::literal(Constant::Type(class_ty), tree.span);
    cx.retype(RULE, literal, &tree.ty)
}

fn unexpected(expected: &'static str, tree: &Tree) -> PrepError {
    PrepError::UnexpectedShape {
        rule: RULE,
        expected,
        found: tree.kind.describe(),
        span: tree.span,
    }
}

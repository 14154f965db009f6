//! Re-typing of trees built by rewrites.
//!
//! Rewrites replace a typed subtree with freshly constructed nodes whose
//! type is [`Ty::NoType`]. Before substitution the new subtree goes through
//! a [`Typer`], which assigns the missing types and checks the result
//! against the type of the node being replaced.

use jsi_ir::{Constant, Definitions, Name, SymbolId, SymbolTable, Tree, TreeKind, Ty};
use thiserror::Error;

/// Why a rebuilt tree failed to type-check.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum TypeError {
    #[error("found `{found}`, expected `{expected}`")]
    Mismatch { expected: String, found: String },

    #[error("`{callee}` takes {expected} argument(s), got {found}")]
    Arity {
        callee: String,
        expected: usize,
        found: usize,
    },

    #[error("`{0}` cannot be applied to arguments")]
    NotAMethod(String),

    #[error("cannot resolve member `{0}`")]
    Unresolved(String),

    #[error("ambiguous reference to overloaded member `{0}`")]
    Ambiguous(String),

    #[error("cannot type a {0}")]
    Unsupported(&'static str),
}

/// The re-typing collaborator.
pub trait Typer {
    /// Assign types to the untyped nodes of `tree` and check that the result
    /// conforms to `expected` ([`Ty::NoType`] accepts anything).
    fn retype(&self, tree: Tree, expected: &Ty) -> Result<Tree, TypeError>;

    /// Whether `ty` may be the argument of a reflective type token.
    fn is_class_type(&self, ty: &Ty) -> bool;
}

/// Types trees from the information already in the symbol table.
///
/// Only the shapes rewrites build are supported: literals, selections,
/// identifiers, applications and blocks. Subtrees that already carry a
/// type are reused as they are.
pub struct SymbolTyper<'a> {
    symbols: &'a SymbolTable,
    defs: &'a Definitions,
}

impl<'a> SymbolTyper<'a> {
    pub fn new(symbols: &'a SymbolTable, defs: &'a Definitions) -> Self {
        SymbolTyper { symbols, defs }
    }

    fn type_tree(&self, tree: Tree) -> Result<Tree, TypeError> {
        if tree.ty.is_typed() {
            return Ok(tree);
        }
        let mut tree = tree.try_map_children(|child| self.type_tree(child))?;
        let ty = match &tree.kind {
            TreeKind::Literal(constant) => self.literal_ty(constant),
            TreeKind::Select { qualifier, name } => {
                if !tree.symbol.is_valid() {
                    let owner = self.symbols.type_symbol(&qualifier.ty);
                    tree.symbol = self.resolve_member(owner, *name)?;
                }
                self.symbols[tree.symbol].info.clone()
            }
            TreeKind::Ident(name) => {
                if !tree.symbol.is_valid() {
                    return Err(TypeError::Unresolved(self.symbols.interner().lookup(*name).to_string()));
                }
                self.symbols[tree.symbol].info.clone()
            }
            TreeKind::Apply { fun, args } => self.apply_ty(fun, args)?,
            TreeKind::Block { expr, .. } => expr.ty.clone(),
            other => return Err(TypeError::Unsupported(other.describe())),
        };
        tree.ty = ty;
        Ok(tree)
    }

    fn literal_ty(&self, constant: &Constant) -> Ty {
        match constant {
            Constant::Unit => Ty::Unit,
            Constant::Null => Ty::Null,
            Constant::Bool(_) => Ty::Bool,
            Constant::Int(_) => Ty::Int,
            Constant::Str(_) => Ty::Str,
            Constant::Type(_) => Ty::Class(self.defs.class_class),
        }
    }

    fn resolve_member(&self, owner: SymbolId, name: Name) -> Result<SymbolId, TypeError> {
        let found = self.symbols.members_named(owner, name);
        match found.as_slice() {
            [single] => Ok(*single),
            [] => Err(TypeError::Unresolved(self.symbols.interner().lookup(name).to_string())),
            _ => Err(TypeError::Ambiguous(self.symbols.interner().lookup(name).to_string())),
        }
    }

    fn apply_ty(&self, fun: &Tree, args: &[Tree]) -> Result<Ty, TypeError> {
        let Ty::Method { params, result } = &fun.ty else {
            return Err(TypeError::NotAMethod(self.callee_name(fun)));
        };
        let arity_error = || TypeError::Arity {
            callee: self.callee_name(fun),
            expected: params.len(),
            found: args.len(),
        };
        match params.split_last() {
            Some((Ty::Repeated(elem), fixed)) => {
                if args.len() < fixed.len() {
                    return Err(arity_error());
                }
                let expected = fixed.iter().chain(std::iter::repeat(&**elem));
                for (arg, param) in args.iter().zip(expected) {
                    self.check_conforms(&arg.ty, param)?;
                }
            }
            _ => {
                if args.len() != params.len() {
                    return Err(arity_error());
                }
                for (arg, param) in args.iter().zip(params) {
                    self.check_conforms(&arg.ty, param)?;
                }
            }
        }
        Ok((**result).clone())
    }

    fn callee_name(&self, fun: &Tree) -> String {
        let symbol = fun.fun_symbol();
        if symbol.is_valid() {
            self.symbols.decoded_name(symbol).into_owned()
        } else {
            fun.kind.describe().to_string()
        }
    }

    fn check_conforms(&self, found: &Ty, expected: &Ty) -> Result<(), TypeError> {
        if conforms(self.symbols, self.defs, found, expected) {
            Ok(())
        } else {
            Err(TypeError::Mismatch {
                expected: self.symbols.display_ty(expected),
                found: self.symbols.display_ty(found),
            })
        }
    }
}

impl Typer for SymbolTyper<'_> {
    fn retype(&self, tree: Tree, expected: &Ty) -> Result<Tree, TypeError> {
        let tree = self.type_tree(tree)?;
        self.check_conforms(&tree.ty, expected)?;
        Ok(tree)
    }

    fn is_class_type(&self, ty: &Ty) -> bool {
        match self.symbols.dealias(ty) {
            Ty::Unit | Ty::Bool | Ty::Int | Ty::Str | Ty::Nothing | Ty::Null | Ty::Class(_) => true,
            Ty::NoType
            | Ty::Error
            | Ty::Module(_)
            | Ty::Alias(_)
            | Ty::Param(_)
            | Ty::Repeated(_)
            | Ty::Method { .. } => false,
        }
    }
}

/// Whether a value of type `found` may be used where `expected` is required.
///
/// `NoType` as the expected type accepts anything; `Error` on either side is
/// accepted so one failure is not reported twice.
pub fn conforms(symbols: &SymbolTable, defs: &Definitions, found: &Ty, expected: &Ty) -> bool {
    let found = symbols.widen(&symbols.dealias(found));
    let expected = symbols.widen(&symbols.dealias(expected));
    match (&found, &expected) {
        (_, Ty::NoType) | (Ty::Error, _) | (_, Ty::Error) | (Ty::Nothing, _) => true,
        _ if found == expected => true,
        (_, Ty::Class(base)) if *base == defs.any_class => true,
        (Ty::Null, Ty::Class(_) | Ty::Str) => true,
        (Ty::Class(sub), Ty::Class(base)) => symbols.is_subclass(*sub, *base),
        (Ty::Str, Ty::Class(base)) => *base == defs.object_class,
        _ => false,
    }
}

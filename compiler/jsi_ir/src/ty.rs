//! Resolved types and literal constants.

use crate::{Name, SymbolId};

/// A resolved type as assigned by the type checker.
///
/// `NoType` marks freshly built trees that still need re-typing; every node
/// of an input tree carries a real type.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Ty {
    #[default]
    NoType,
    Error,
    Nothing,
    Null,
    Unit,
    Bool,
    Int,
    Str,
    /// Instance type of a class or trait.
    Class(SymbolId),
    /// Singleton type of an object; widens to its module class.
    Module(SymbolId),
    /// Type alias; the alias symbol's info is the aliased type.
    Alias(SymbolId),
    /// Reference to a type parameter.
    Param(SymbolId),
    /// Vararg parameter element type (`T*`).
    Repeated(Box<Ty>),
    Method {
        params: Vec<Ty>,
        result: Box<Ty>,
    },
}

impl Ty {
    pub fn method(params: Vec<Ty>, result: Ty) -> Ty {
        Ty::Method {
            params,
            result: Box::new(result),
        }
    }

    /// Whether a type has been assigned.
    pub fn is_typed(&self) -> bool {
        !matches!(self, Ty::NoType)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Ty::Unit | Ty::Bool | Ty::Int | Ty::Str)
    }
}

/// Literal constant value.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Constant {
    Unit,
    Null,
    Bool(bool),
    Int(i64),
    Str(Name),
    /// Reflective class literal (result of a fixed type token).
    Type(Ty),
}

impl Constant {
    /// Whether this is the `null` literal.
    pub fn is_null(&self) -> bool {
        matches!(self, Constant::Null)
    }
}

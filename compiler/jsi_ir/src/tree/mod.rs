//! Typed trees.
//!
//! Unlike the parser's arena-allocated expressions, the typed tree owns its
//! children: rewrites consume a subtree and hand back a freshly built one, so
//! no node is ever shared between the old and the new tree.
//!
//! Every node carries its source span, its resolved type and (for
//! definitions and references) its resolved symbol. Nodes built by a rewrite
//! start out with [`Ty::NoType`] until they are re-typed.

use crate::{Constant, Name, Span, SymbolId, Ty};

/// A typed tree node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Tree {
    pub kind: TreeKind,
    pub span: Span,
    pub ty: Ty,
    pub symbol: SymbolId,
}

/// How an export forwarder exposes its method.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExportKind {
    Method,
    Getter,
    Setter,
}

/// Node shapes.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TreeKind {
    PackageDef {
        stats: Vec<Tree>,
    },
    /// Class or trait declaration; the symbol tells which.
    ClassDef {
        template: Box<Tree>,
    },
    ModuleDef {
        template: Box<Tree>,
    },
    /// Declaration body. Its symbol is the class (or module class) it belongs to.
    Template {
        parents: Vec<Tree>,
        body: Vec<Tree>,
    },
    DefDef {
        params: Vec<Tree>,
        rhs: Box<Tree>,
    },
    ValDef {
        rhs: Box<Tree>,
    },
    Block {
        stats: Vec<Tree>,
        expr: Box<Tree>,
    },
    If {
        cond: Box<Tree>,
        then_branch: Box<Tree>,
        else_branch: Box<Tree>,
    },
    Select {
        qualifier: Box<Tree>,
        name: Name,
    },
    Apply {
        fun: Box<Tree>,
        args: Vec<Tree>,
    },
    TypeApply {
        fun: Box<Tree>,
        args: Vec<Tree>,
    },
    Ident(Name),
    /// `this` of the enclosing class or package named by the qualifier.
    This(Name),
    Literal(Constant),
    /// A type written in source; the node's `ty` is the type.
    TypeTree,
    /// Synthesized member exposing the method `symbol` to the foreign runtime.
    ExportForwarder {
        js_name: Name,
        kind: ExportKind,
    },
    Empty,
}

impl TreeKind {
    /// Short name of the shape, for internal error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TreeKind::PackageDef { .. } => "package definition",
            TreeKind::ClassDef { .. } => "class definition",
            TreeKind::ModuleDef { .. } => "object definition",
            TreeKind::Template { .. } => "template",
            TreeKind::DefDef { .. } => "method definition",
            TreeKind::ValDef { .. } => "value definition",
            TreeKind::Block { .. } => "block",
            TreeKind::If { .. } => "if expression",
            TreeKind::Select { .. } => "selection",
            TreeKind::Apply { .. } => "application",
            TreeKind::TypeApply { .. } => "type application",
            TreeKind::Ident(_) => "identifier",
            TreeKind::This(_) => "this reference",
            TreeKind::Literal(_) => "literal",
            TreeKind::TypeTree => "type tree",
            TreeKind::ExportForwarder { .. } => "export forwarder",
            TreeKind::Empty => "empty tree",
        }
    }
}

impl Tree {
    pub fn new(kind: TreeKind, span: Span, ty: Ty, symbol: SymbolId) -> Self {
        Tree {
            kind,
            span,
            ty,
            symbol,
        }
    }

    /// The empty placeholder tree.
    pub fn empty(span: Span) -> Self {
        Tree::new(TreeKind::Empty, span, Ty::NoType, SymbolId::NONE)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, TreeKind::Empty)
    }

    /// Class, trait or object definition.
    pub fn is_impl_def(&self) -> bool {
        matches!(self.kind, TreeKind::ClassDef { .. } | TreeKind::ModuleDef { .. })
    }

    /// Definition that introduces a named member.
    pub fn is_member_def(&self) -> bool {
        matches!(
            self.kind,
            TreeKind::ClassDef { .. }
                | TreeKind::ModuleDef { .. }
                | TreeKind::DefDef { .. }
                | TreeKind::ValDef { .. }
        )
    }

    // Constructors

    pub fn package_def(symbol: SymbolId, stats: Vec<Tree>, span: Span) -> Self {
        Tree::new(TreeKind::PackageDef { stats }, span, Ty::NoType, symbol)
    }

    pub fn class_def(symbol: SymbolId, template: Tree, span: Span) -> Self {
        Tree::new(
            TreeKind::ClassDef {
                template: Box::new(template),
            },
            span,
            Ty::NoType,
            symbol,
        )
    }

    pub fn module_def(symbol: SymbolId, template: Tree, span: Span) -> Self {
        Tree::new(
            TreeKind::ModuleDef {
                template: Box::new(template),
            },
            span,
            Ty::NoType,
            symbol,
        )
    }

    pub fn template(owner: SymbolId, parents: Vec<Tree>, body: Vec<Tree>, span: Span) -> Self {
        Tree::new(TreeKind::Template { parents, body }, span, Ty::NoType, owner)
    }

    pub fn def_def(symbol: SymbolId, params: Vec<Tree>, rhs: Tree, span: Span) -> Self {
        Tree::new(
            TreeKind::DefDef {
                params,
                rhs: Box::new(rhs),
            },
            span,
            Ty::NoType,
            symbol,
        )
    }

    pub fn val_def(symbol: SymbolId, rhs: Tree, span: Span) -> Self {
        Tree::new(
            TreeKind::ValDef { rhs: Box::new(rhs) },
            span,
            Ty::NoType,
            symbol,
        )
    }

    pub fn block(stats: Vec<Tree>, expr: Tree, span: Span) -> Self {
        let ty = expr.ty.clone();
        Tree::new(
            TreeKind::Block {
                stats,
                expr: Box::new(expr),
            },
            span,
            ty,
            SymbolId::NONE,
        )
    }

    pub fn if_else(cond: Tree, then_branch: Tree, else_branch: Tree, ty: Ty, span: Span) -> Self {
        Tree::new(
            TreeKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
            ty,
            SymbolId::NONE,
        )
    }

    pub fn select(qualifier: Tree, name: Name, symbol: SymbolId, ty: Ty, span: Span) -> Self {
        Tree::new(
            TreeKind::Select {
                qualifier: Box::new(qualifier),
                name,
            },
            span,
            ty,
            symbol,
        )
    }

    pub fn apply(fun: Tree, args: Vec<Tree>, ty: Ty, span: Span) -> Self {
        Tree::new(
            TreeKind::Apply {
                fun: Box::new(fun),
                args,
            },
            span,
            ty,
            SymbolId::NONE,
        )
    }

    pub fn type_apply(fun: Tree, args: Vec<Tree>, ty: Ty, span: Span) -> Self {
        Tree::new(
            TreeKind::TypeApply {
                fun: Box::new(fun),
                args,
            },
            span,
            ty,
            SymbolId::NONE,
        )
    }

    pub fn ident(name: Name, symbol: SymbolId, ty: Ty, span: Span) -> Self {
        Tree::new(TreeKind::Ident(name), span, ty, symbol)
    }

    pub fn this(qualifier: Name, class: SymbolId, ty: Ty, span: Span) -> Self {
        Tree::new(TreeKind::This(qualifier), span, ty, class)
    }

    /// A literal still to be typed.
    pub fn literal(constant: Constant, span: Span) -> Self {
        Tree::new(TreeKind::Literal(constant), span, Ty::NoType, SymbolId::NONE)
    }

    pub fn type_tree(ty: Ty, span: Span) -> Self {
        Tree::new(TreeKind::TypeTree, span, ty, SymbolId::NONE)
    }

    pub fn export_forwarder(method: SymbolId, js_name: Name, kind: ExportKind, ty: Ty, span: Span) -> Self {
        Tree::new(TreeKind::ExportForwarder { js_name, kind }, span, ty, method)
    }

    // Traversal

    /// Symbol of the method an `Apply`/`TypeApply` calls, looking through
    /// nested applications.
    pub fn fun_symbol(&self) -> SymbolId {
        match &self.kind {
            TreeKind::Apply { fun, .. } | TreeKind::TypeApply { fun, .. } => fun.fun_symbol(),
            _ => self.symbol,
        }
    }

    /// Immediate children, in source order.
    pub fn children(&self) -> Vec<&Tree> {
        match &self.kind {
            TreeKind::PackageDef { stats } => stats.iter().collect(),
            TreeKind::ClassDef { template } | TreeKind::ModuleDef { template } => vec![&**template],
            TreeKind::Template { parents, body } => parents.iter().chain(body).collect(),
            TreeKind::DefDef { params, rhs } => params.iter().chain(std::iter::once(&**rhs)).collect(),
            TreeKind::ValDef { rhs } => vec![&**rhs],
            TreeKind::Block { stats, expr } => stats.iter().chain(std::iter::once(&**expr)).collect(),
            TreeKind::If {
                cond,
                then_branch,
                else_branch,
            } => vec![&**cond, &**then_branch, &**else_branch],
            TreeKind::Select { qualifier, .. } => vec![&**qualifier],
            TreeKind::Apply { fun, args } | TreeKind::TypeApply { fun, args } => {
                std::iter::once(&**fun).chain(args).collect()
            }
            TreeKind::Ident(_)
            | TreeKind::This(_)
            | TreeKind::Literal(_)
            | TreeKind::TypeTree
            | TreeKind::ExportForwarder { .. }
            | TreeKind::Empty => Vec::new(),
        }
    }

    /// Rebuild this node from transformed children, keeping span, type and
    /// symbol. Children are visited in source order; the first error aborts.
    pub fn try_map_children<E>(
        self,
        mut f: impl FnMut(Tree) -> Result<Tree, E>,
    ) -> Result<Tree, E> {
        let Tree {
            kind,
            span,
            ty,
            symbol,
        } = self;
        let kind = match kind {
            TreeKind::PackageDef { stats } => TreeKind::PackageDef {
                stats: map_vec(stats, &mut f)?,
            },
            TreeKind::ClassDef { template } => TreeKind::ClassDef {
                template: map_boxed(template, &mut f)?,
            },
            TreeKind::ModuleDef { template } => TreeKind::ModuleDef {
                template: map_boxed(template, &mut f)?,
            },
            TreeKind::Template { parents, body } => TreeKind::Template {
                parents: map_vec(parents, &mut f)?,
                body: map_vec(body, &mut f)?,
            },
            TreeKind::DefDef { params, rhs } => TreeKind::DefDef {
                params: map_vec(params, &mut f)?,
                rhs: map_boxed(rhs, &mut f)?,
            },
            TreeKind::ValDef { rhs } => TreeKind::ValDef { rhs: map_boxed(rhs, &mut f)? },
            TreeKind::Block { stats, expr } => TreeKind::Block {
                stats: map_vec(stats, &mut f)?,
                expr: map_boxed(expr, &mut f)?,
            },
            TreeKind::If {
                cond,
                then_branch,
                else_branch,
            } => TreeKind::If {
                cond: map_boxed(cond, &mut f)?,
                then_branch: map_boxed(then_branch, &mut f)?,
                else_branch: map_boxed(else_branch, &mut f)?,
            },
            TreeKind::Select { qualifier, name } => TreeKind::Select {
                qualifier: map_boxed(qualifier, &mut f)?,
                name,
            },
            TreeKind::Apply { fun, args } => TreeKind::Apply {
                fun: map_boxed(fun, &mut f)?,
                args: map_vec(args, &mut f)?,
            },
            TreeKind::TypeApply { fun, args } => TreeKind::TypeApply {
                fun: map_boxed(fun, &mut f)?,
                args: map_vec(args, &mut f)?,
            },
            leaf @ (TreeKind::Ident(_)
            | TreeKind::This(_)
            | TreeKind::Literal(_)
            | TreeKind::TypeTree
            | TreeKind::ExportForwarder { .. }
            | TreeKind::Empty) => leaf,
        };
        Ok(Tree {
            kind,
            span,
            ty,
            symbol,
        })
    }

    /// Pre-order walk over this tree and all descendants.
    pub fn walk<'t>(&'t self, f: &mut impl FnMut(&'t Tree)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }
}

fn map_boxed<E>(
    tree: Box<Tree>,
    f: &mut impl FnMut(Tree) -> Result<Tree, E>,
) -> Result<Box<Tree>, E> {
    f(*tree).map(Box::new)
}

fn map_vec<E>(
    trees: Vec<Tree>,
    f: &mut impl FnMut(Tree) -> Result<Tree, E>,
) -> Result<Vec<Tree>, E> {
    trees.into_iter().map(f).collect()
}

#[cfg(test)]
mod tests;

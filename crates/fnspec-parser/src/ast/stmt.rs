//! Statement AST nodes.

use crate::ast::{Expr, Ident, TypeExpr};
use fnspec_core::Span;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `expr;`
    Expr(ExprStmt<'ast>),
    /// `Type a = 1, b;`
    VarDecl(VarDeclStmt<'ast>),
    Return(ReturnStmt<'ast>),
    Break(Span),
    Continue(Span),
    Block(Block<'ast>),
    If(&'ast IfStmt<'ast>),
    While(&'ast WhileStmt<'ast>),
    For(&'ast ForStmt<'ast>),
    /// A lone `;`.
    Empty(Span),
}

impl<'ast> Stmt<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Expr(s) => s.span,
            Self::VarDecl(s) => s.span,
            Self::Return(s) => s.span,
            Self::Break(span) | Self::Continue(span) | Self::Empty(span) => *span,
            Self::Block(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::For(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}

/// A local declaration with one or more declarators sharing a type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDeclStmt<'ast> {
    pub ty: TypeExpr<'ast>,
    pub vars: &'ast [VarDeclarator<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDeclarator<'ast> {
    pub name: Ident<'ast>,
    pub init: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    pub value: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

/// `{ stmts }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    pub stmts: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_stmt: &'ast Stmt<'ast>,
    pub else_stmt: Option<&'ast Stmt<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub body: &'ast Stmt<'ast>,
    pub span: Span,
}

/// `for (init; condition; update) body`
///
/// Every clause may be empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForStmt<'ast> {
    pub init: Option<ForInit<'ast>>,
    pub condition: Option<&'ast Expr<'ast>>,
    pub update: &'ast [&'ast Expr<'ast>],
    pub body: &'ast Stmt<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForInit<'ast> {
    VarDecl(VarDeclStmt<'ast>),
    Exprs(&'ast [&'ast Expr<'ast>]),
}

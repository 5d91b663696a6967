//! Expression AST nodes.
//!
//! # Expression Precedence
//!
//! The Pratt parser uses these levels, loosest first:
//! 1. Assignment (`=`, `+=`, ...), right associative
//! 2. Ternary (`?:`), right associative
//! 3. Logical OR, then logical AND
//! 4. Bitwise OR, XOR, AND
//! 5. Equality, then relational
//! 6. Shifts (`<<`, `>>`, `>>>`)
//! 7. Additive, then multiplicative
//! 8. Prefix unary and casts
//! 9. Postfix (call, index, member, `++`, `--`)

use crate::ast::{AssignOp, BinaryOp, Ident, PostfixOp, TypeExpr, UnaryOp};
use fnspec_core::Span;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    Literal(LiteralExpr<'ast>),
    Ident(IdentExpr<'ast>),
    Binary(&'ast BinaryExpr<'ast>),
    Unary(&'ast UnaryExpr<'ast>),
    Assign(&'ast AssignExpr<'ast>),
    Ternary(&'ast TernaryExpr<'ast>),
    /// Unqualified call, `f(x)`.
    Call(&'ast CallExpr<'ast>),
    Index(&'ast IndexExpr<'ast>),
    /// Field access or method call on a receiver.
    Member(&'ast MemberExpr<'ast>),
    Postfix(&'ast PostfixExpr<'ast>),
    Cast(&'ast CastExpr<'ast>),
    New(&'ast NewExpr<'ast>),
    Paren(&'ast ParenExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Assign(e) => e.span,
            Self::Ternary(e) => e.span,
            Self::Call(e) => e.span,
            Self::Index(e) => e.span,
            Self::Member(e) => e.span,
            Self::Postfix(e) => e.span,
            Self::Cast(e) => e.span,
            Self::New(e) => e.span,
            Self::Paren(e) => e.span,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expr<'ast> {
        let mut expr = self;
        while let Expr::Paren(paren) = expr {
            expr = paren.expr;
        }
        expr
    }

    /// Whether this expression may appear on the left of an assignment or
    /// under `++`/`--`.
    pub fn is_assignable(&self) -> bool {
        match self.unparenthesized() {
            Expr::Ident(_) | Expr::Index(_) => true,
            Expr::Member(member) => matches!(member.access, MemberAccess::Field(_)),
            _ => false,
        }
    }

    /// Flatten `a.b.c` into its dotted path, if the expression is nothing
    /// but identifiers joined by field accesses.
    pub fn dotted_path(&self) -> Option<String> {
        match self {
            Expr::Ident(ident) => Some(ident.ident.name.to_string()),
            Expr::Member(member) => match member.access {
                MemberAccess::Field(field) => {
                    let mut path = member.object.dotted_path()?;
                    path.push('.');
                    path.push_str(field.name);
                    Some(path)
                }
                MemberAccess::Method { .. } => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub kind: LiteralKind<'ast>,
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    /// Decoded string contents.
    String(&'ast str),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentExpr<'ast> {
    pub ident: Ident<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: &'ast Expr<'ast>,
    pub op: BinaryOp,
    pub right: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub op: UnaryOp,
    pub operand: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignExpr<'ast> {
    pub target: &'ast Expr<'ast>,
    pub op: AssignOp,
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

/// `condition ? then_expr : else_expr`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TernaryExpr<'ast> {
    pub condition: &'ast Expr<'ast>,
    pub then_expr: &'ast Expr<'ast>,
    pub else_expr: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub callee: Ident<'ast>,
    pub args: &'ast [&'ast Expr<'ast>],
    pub span: Span,
}

/// `target[index]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexExpr<'ast> {
    pub target: &'ast Expr<'ast>,
    pub index: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberExpr<'ast> {
    pub object: &'ast Expr<'ast>,
    pub access: MemberAccess<'ast>,
    pub span: Span,
}

/// What follows the dot of a member expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemberAccess<'ast> {
    /// `obj.field`
    Field(Ident<'ast>),
    /// `obj.method(args)`
    Method {
        name: Ident<'ast>,
        args: &'ast [&'ast Expr<'ast>],
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostfixExpr<'ast> {
    pub operand: &'ast Expr<'ast>,
    pub op: PostfixOp,
    pub span: Span,
}

/// `(Type) expr`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastExpr<'ast> {
    pub target_type: TypeExpr<'ast>,
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}

/// `new Type(args)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewExpr<'ast> {
    pub ty: TypeExpr<'ast>,
    pub args: &'ast [&'ast Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}

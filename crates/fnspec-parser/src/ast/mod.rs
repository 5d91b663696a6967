//! Abstract syntax tree for function bodies.
//!
//! All nodes are allocated in a `bumpalo` arena and borrow from it, so a
//! [`Body`] stays valid for the lifetime of that arena.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use fnspec_parser::Parser;
//!
//! let arena = Bump::new();
//! let body = Parser::parse_body("double tot = 0; tot += 2; return tot;", &arena).unwrap();
//! assert_eq!(body.stmts().len(), 3);
//! ```

pub mod error;
pub mod ops;

mod parser;

pub mod expr;
mod expr_parser;

pub mod stmt;
mod stmt_parser;

pub use error::ParseErrors;
pub use expr::*;
pub use ops::*;
pub use parser::Parser;
pub use stmt::*;

use fnspec_core::{PrimitiveKind, Span};

/// A parsed statement block.
#[derive(Debug, Clone, Copy)]
pub struct Body<'ast> {
    stmts: &'ast [Stmt<'ast>],
    span: Span,
}

impl<'ast> Body<'ast> {
    pub(crate) fn new(stmts: &'ast [Stmt<'ast>], span: Span) -> Self {
        Self { stmts, span }
    }

    pub fn stmts(&self) -> &'ast [Stmt<'ast>] {
        self.stmts
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// An identifier with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// A type as written in a declaration, cast or `new`.
///
/// Reference types keep their dotted spelling (`java.util.List`); the
/// runtime decides what the name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeExpr<'ast> {
    pub name: &'ast str,
    /// Set when the type is one of the six primitive keywords.
    pub primitive: Option<PrimitiveKind>,
    pub span: Span,
}

impl<'ast> TypeExpr<'ast> {
    pub fn is_primitive(&self) -> bool {
        self.primitive.is_some()
    }
}

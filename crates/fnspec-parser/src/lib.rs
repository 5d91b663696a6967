//! Parser for the body language of fnspec functions.
//!
//! Bodies arrive as finalized statement blocks: parameter names have already
//! been rewritten into casts over the argument array, and bare expressions
//! have been wrapped in a `return`. This crate turns such text into an
//! arena-allocated AST:
//! - Lexical analysis ([`Lexer`], [`Token`])
//! - AST definitions ([`ast`])
//! - The [`Parser`], a Pratt parser for expressions plus a recursive-descent
//!   statement parser
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use fnspec_parser::{Parser, ast::Stmt};
//!
//! let arena = Bump::new();
//! let body = Parser::parse_body("return ((double)((((Double) args[0]).doubleValue()) + 2));", &arena)
//!     .expect("body parses");
//! assert!(matches!(body.stmts(), [Stmt::Return(_)]));
//! ```

pub mod ast;
pub mod lexer;

pub use ast::{Body, ParseErrors, Parser};
pub use lexer::{Lexer, Token, TokenKind};

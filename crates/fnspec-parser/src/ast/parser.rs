//! Parser infrastructure: token navigation, error recovery and the
//! declaration lookahead shared by the statement and expression parsers.

use bumpalo::Bump;
use fnspec_core::{ParseError, ParseErrorKind, PrimitiveKind, Span};

use crate::ast::{Body, Expr, ParseErrors, TypeExpr};
use crate::lexer::{Lexer, Token, TokenKind};

/// Parser for function bodies.
///
/// The whole body is tokenized up front into a buffer, so lookahead is
/// arbitrary and cheap. Lexemes and nodes live in the arena, which means the
/// source only needs to outlive [`Parser::new`].
pub struct Parser<'ast> {
    /// Buffered tokens; always ends with `Eof`.
    pub(super) buffer: Vec<Token<'ast>>,
    pub(super) position: usize,
    pub(super) errors: ParseErrors,
    pub(super) arena: &'ast Bump,
}

impl<'ast> Parser<'ast> {
    /// Tokenize `source` into a new parser.
    ///
    /// Lexer errors are recorded immediately and their error tokens dropped,
    /// so the grammar never sees them.
    pub fn new(source: &str, arena: &'ast Bump) -> Self {
        let mut lexer = Lexer::new(source, arena);
        let mut buffer = Vec::with_capacity(source.len() / 3 + 1);
        let mut errors = ParseErrors::new();

        loop {
            let token = lexer.next_token();
            match token.kind {
                TokenKind::Error => {
                    for error in lexer.take_errors() {
                        errors.push(error);
                    }
                }
                TokenKind::Eof => {
                    buffer.push(token);
                    break;
                }
                _ => buffer.push(token),
            }
        }

        Self {
            buffer,
            position: 0,
            errors,
            arena,
        }
    }

    /// Parse a whole statement block.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_body(source: &str, arena: &'ast Bump) -> Result<Body<'ast>, ParseErrors> {
        let mut parser = Parser::new(source, arena);
        let mut stmts = bumpalo::collections::Vec::new_in(arena);

        while !parser.is_eof() {
            match parser.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(error) => {
                    parser.errors.push(error);
                    parser.synchronize();
                }
            }
        }

        let span = Span::new(0, 1, 1, source.len() as u32);
        if parser.errors.is_empty() {
            Ok(Body::new(stmts.into_bump_slice(), span))
        } else {
            Err(parser.errors)
        }
    }

    /// Parse a single expression that must span the whole input.
    pub fn parse_expression(source: &str, arena: &'ast Bump) -> Result<&'ast Expr<'ast>, ParseErrors> {
        let mut parser = Parser::new(source, arena);
        let result = parser.parse_expr(0).and_then(|expr| {
            parser.expect(TokenKind::Eof)?;
            Ok(expr)
        });

        match result {
            Ok(expr) if parser.errors.is_empty() => Ok(expr),
            Ok(_) => Err(parser.errors),
            Err(error) => {
                parser.errors.push(error);
                Err(parser.errors)
            }
        }
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    pub fn peek(&self) -> Token<'ast> {
        self.peek_nth(0)
    }

    /// Peek `n` tokens ahead; anything past the end reads as `Eof`.
    pub fn peek_nth(&self, n: usize) -> Token<'ast> {
        let last = self.buffer.len() - 1;
        self.buffer[(self.position + n).min(last)]
    }

    /// Consume the current token. Never moves past `Eof`.
    pub fn advance(&mut self) -> Token<'ast> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    /// The most recently consumed token.
    pub fn previous(&self) -> Token<'ast> {
        self.buffer[self.position.saturating_sub(1)]
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let token = self.peek();
        let kind_of_error = if token.kind == TokenKind::Eof {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::ExpectedToken
        };
        Err(ParseError::new(
            kind_of_error,
            token.span,
            format!("expected '{}', found {}", kind, describe(token)),
        ))
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Skip ahead to a statement boundary after an error.
    ///
    /// Always consumes at least one token, so a caller retrying at the same
    /// spot cannot loop forever.
    pub fn synchronize(&mut self) {
        let start = self.position;

        while !self.is_eof() {
            if self.position > start && self.previous().kind == TokenKind::Semicolon {
                return;
            }
            match self.peek().kind {
                TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Continue
                    if self.position > start =>
                {
                    return;
                }
                TokenKind::RightBrace => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ========================================================================
    // Types and declaration lookahead
    // ========================================================================

    /// Number of tokens a type occupies starting `offset` tokens ahead, or
    /// `None` if no type starts there.
    ///
    /// A type is a primitive keyword or a dotted identifier path.
    pub(super) fn type_len_at(&self, offset: usize) -> Option<usize> {
        let first = self.peek_nth(offset);
        if first.kind.is_primitive_type() {
            return Some(1);
        }
        if first.kind != TokenKind::Identifier {
            return None;
        }
        let mut len = 1;
        while self.peek_nth(offset + len).kind == TokenKind::Dot
            && self.peek_nth(offset + len + 1).kind == TokenKind::Identifier
        {
            len += 2;
        }
        Some(len)
    }

    /// Whether the upcoming tokens read `Type name`.
    pub fn is_var_decl(&self) -> bool {
        self.type_len_at(0)
            .is_some_and(|len| self.peek_nth(len).kind == TokenKind::Identifier)
    }

    /// Parse a primitive keyword or a dotted reference type name.
    pub fn parse_type(&mut self) -> Result<TypeExpr<'ast>, ParseError> {
        let first = self.peek();

        if first.kind.is_primitive_type() {
            self.advance();
            return Ok(TypeExpr {
                name: first.lexeme,
                primitive: PrimitiveKind::from_name(first.lexeme),
                span: first.span,
            });
        }

        if first.kind != TokenKind::Identifier {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedType,
                first.span,
                format!("expected type, found {}", describe(first)),
            ));
        }

        let len = self.type_len_at(0).unwrap_or(1);
        let mut span = first.span;
        let name = if len == 1 {
            self.advance();
            first.lexeme
        } else {
            let mut path = String::new();
            for _ in 0..len {
                let token = self.advance();
                path.push_str(token.lexeme);
                span = span.merge(token.span);
            }
            self.arena.alloc_str(&path)
        };

        Ok(TypeExpr {
            name,
            primitive: None,
            span,
        })
    }
}

/// How a token reads in a diagnostic.
pub(super) fn describe(token: Token<'_>) -> String {
    match token.kind {
        TokenKind::Eof => "end of body".to_string(),
        TokenKind::Identifier => format!("identifier '{}'", token.lexeme),
        _ => format!("'{}'", token.lexeme),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_stops_at_eof() {
        let arena = Bump::new();
        let mut parser = Parser::new("a", &arena);
        assert_eq!(parser.advance().kind, TokenKind::Identifier);
        assert_eq!(parser.advance().kind, TokenKind::Eof);
        assert_eq!(parser.advance().kind, TokenKind::Eof);
        assert_eq!(parser.peek_nth(10).kind, TokenKind::Eof);
    }

    #[test]
    fn expect_reports_found_token() {
        let arena = Bump::new();
        let mut parser = Parser::new("x", &arena);
        let err = parser.expect(TokenKind::Semicolon).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedToken);
        assert_eq!(err.message, "expected ';', found identifier 'x'");
        parser.advance();
        let err = parser.expect(TokenKind::Semicolon).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn var_decl_lookahead() {
        let arena = Bump::new();
        assert!(Parser::new("double tot = 1;", &arena).is_var_decl());
        assert!(Parser::new("Object o;", &arena).is_var_decl());
        assert!(Parser::new("java.util.Iterator it = x;", &arena).is_var_decl());
        assert!(!Parser::new("tot *= 2;", &arena).is_var_decl());
        assert!(!Parser::new("a.b.c();", &arena).is_var_decl());
        assert!(!Parser::new("x;", &arena).is_var_decl());
    }

    #[test]
    fn dotted_type_is_joined() {
        let arena = Bump::new();
        let mut parser = Parser::new("java.awt.Point p", &arena);
        let ty = parser.parse_type().unwrap();
        assert_eq!(ty.name, "java.awt.Point");
        assert!(!ty.is_primitive());
        assert_eq!(ty.span.len, "java.awt.Point".len() as u32);
        assert_eq!(parser.peek().lexeme, "p");
    }

    #[test]
    fn primitive_type() {
        let arena = Bump::new();
        let mut parser = Parser::new("short", &arena);
        let ty = parser.parse_type().unwrap();
        assert_eq!(ty.primitive, Some(PrimitiveKind::Short));
    }

    #[test]
    fn lexer_errors_are_collected() {
        let arena = Bump::new();
        let parser = Parser::new("a # b", &arena);
        assert_eq!(parser.errors.len(), 1);
        assert_eq!(parser.buffer.len(), 3);
    }

    #[test]
    fn synchronize_skips_to_statement_boundary() {
        let arena = Bump::new();
        let mut parser = Parser::new("a b c; return x;", &arena);
        parser.synchronize();
        assert_eq!(parser.peek().kind, TokenKind::Return);
    }
}

//! Main lexer implementation for body source.
//!
//! The [`Lexer`] converts body text into a stream of [`Token`]s, dispatching
//! on the first character of each token.
//!
//! Lexemes are copied into the arena so the source string can be freed once
//! lexing completes.

use std::collections::VecDeque;

use bumpalo::Bump;
use fnspec_core::{ParseError, ParseErrorKind, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};

/// Lexer for body source.
///
/// The `'src` lifetime is the body being lexed (temporary); `'ast` is the
/// arena holding the lexemes (persists).
pub struct Lexer<'src, 'ast> {
    cursor: Cursor<'src>,
    arena: &'ast Bump,
    /// Lookahead buffer for peeking.
    lookahead: VecDeque<Token<'ast>>,
    errors: Vec<ParseError>,
}

/// Where a token started.
#[derive(Clone, Copy)]
struct Start {
    offset: u32,
    line: u32,
    col: u32,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            lookahead: VecDeque::with_capacity(4),
            errors: Vec::new(),
        }
    }

    /// Take accumulated errors, leaving an empty vec.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Token<'ast> {
        if let Some(token) = self.lookahead.pop_front() {
            return token;
        }
        self.scan_token()
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&mut self) -> Token<'ast> {
        self.peek_nth(0)
    }

    /// Peek `n` tokens ahead (0 = next token).
    pub fn peek_nth(&mut self, n: usize) -> Token<'ast> {
        while self.lookahead.len() <= n {
            let token = self.scan_token();
            self.lookahead.push_back(token);
        }
        self.lookahead[n]
    }

    // =========================================
    // Internal: Token scanning
    // =========================================

    fn scan_token(&mut self) -> Token<'ast> {
        self.skip_whitespace();

        let start = Start {
            offset: self.cursor.offset(),
            line: self.cursor.line(),
            col: self.cursor.column(),
        };

        let Some(c) = self.cursor.peek() else {
            return self.make_eof();
        };

        match c {
            '/' => self.scan_slash(start),
            '"' => self.scan_string(start),
            c if c.is_ascii_digit() => self.scan_number(start),
            '.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number(start)
            }
            c if is_ident_start(c) => self.scan_identifier(start),
            _ => self.scan_operator(start),
        }
    }

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(char::is_whitespace);
    }

    fn make_eof(&self) -> Token<'ast> {
        let span = Span::point(self.cursor.offset(), self.cursor.line(), self.cursor.column());
        Token::new(TokenKind::Eof, "", span)
    }

    fn span_from(&self, start: Start) -> Span {
        Span::new(
            start.offset,
            start.line,
            start.col,
            self.cursor.offset() - start.offset,
        )
    }

    /// Create a token from `start` to the current position.
    fn make_token(&self, kind: TokenKind, start: Start) -> Token<'ast> {
        let lexeme = self.arena.alloc_str(self.cursor.slice_from(start.offset));
        Token::new(kind, lexeme, self.span_from(start))
    }

    /// Record an error and produce an error token in its place.
    fn make_error(&mut self, kind: ParseErrorKind, start: Start, message: String) -> Token<'ast> {
        let span = self.span_from(start);
        self.errors.push(ParseError::new(kind, span, message));
        Token::new(TokenKind::Error, "", span)
    }

    // =========================================
    // Scanning: Comments and slash
    // =========================================

    /// Scan `/`, `/=`, or skip a `//` / `/* */` comment.
    fn scan_slash(&mut self, start: Start) -> Token<'ast> {
        self.cursor.advance();

        match self.cursor.peek() {
            Some('/') => {
                self.cursor.eat_while(|c| c != '\n');
                self.scan_token()
            }
            Some('*') => {
                self.cursor.advance();
                loop {
                    match self.cursor.advance() {
                        None => {
                            return self.make_error(
                                ParseErrorKind::UnterminatedComment,
                                start,
                                "block comment is never closed".to_string(),
                            );
                        }
                        Some('*') if self.cursor.eat('/') => return self.scan_token(),
                        Some(_) => {}
                    }
                }
            }
            Some('=') => {
                self.cursor.advance();
                self.make_token(TokenKind::SlashEqual, start)
            }
            _ => self.make_token(TokenKind::Slash, start),
        }
    }

    // =========================================
    // Scanning: Strings
    // =========================================

    /// Scan a double-quoted string literal. Escapes are kept in the lexeme
    /// and decoded by the parser.
    fn scan_string(&mut self, start: Start) -> Token<'ast> {
        self.cursor.advance();

        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return self.make_error(
                        ParseErrorKind::UnterminatedString,
                        start,
                        "string literal is never closed".to_string(),
                    );
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('"') => {
                    self.cursor.advance();
                    return self.make_token(TokenKind::StringLiteral, start);
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // =========================================
    // Scanning: Numbers
    // =========================================

    fn scan_number(&mut self, start: Start) -> Token<'ast> {
        if self.cursor.peek() == Some('0') && matches!(self.cursor.peek_nth(1), Some('x' | 'X')) {
            return self.scan_hex_number(start);
        }

        self.consume_decimal_digits();
        let mut is_floating = false;

        if self.cursor.peek() == Some('.') && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.advance();
            self.consume_decimal_digits();
            is_floating = true;
        }

        if let Some('e' | 'E') = self.cursor.peek() {
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some('+' | '-')) {
                self.cursor.advance();
            }
            if !self.cursor.check(|c| c.is_ascii_digit()) {
                return self.make_error(
                    ParseErrorKind::InvalidNumber,
                    start,
                    "exponent has no digits".to_string(),
                );
            }
            self.consume_decimal_digits();
            is_floating = true;
        }

        let kind = match self.cursor.peek() {
            Some('f' | 'F') => TokenKind::FloatLiteral,
            Some('d' | 'D') => TokenKind::DoubleLiteral,
            Some('l' | 'L') if !is_floating => TokenKind::LongLiteral,
            _ if is_floating => {
                return self.finish_number(TokenKind::DoubleLiteral, start);
            }
            _ => return self.finish_number(TokenKind::IntLiteral, start),
        };
        self.cursor.advance();
        self.finish_number(kind, start)
    }

    fn scan_hex_number(&mut self, start: Start) -> Token<'ast> {
        self.cursor.advance();
        self.cursor.advance();
        let digits = self.cursor.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
        if digits.is_empty() {
            return self.make_error(
                ParseErrorKind::InvalidNumber,
                start,
                "expected digits after '0x'".to_string(),
            );
        }
        let kind = if self.cursor.eat('l') || self.cursor.eat('L') {
            TokenKind::LongLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.finish_number(kind, start)
    }

    /// Reject literals glued to identifier characters, like `12abc`.
    fn finish_number(&mut self, kind: TokenKind, start: Start) -> Token<'ast> {
        if self.cursor.check(is_ident_continue) {
            self.cursor.eat_while(is_ident_continue);
            let text = self.cursor.slice_from(start.offset).to_string();
            return self.make_error(
                ParseErrorKind::InvalidNumber,
                start,
                format!("malformed number '{text}'"),
            );
        }
        self.make_token(kind, start)
    }

    fn consume_decimal_digits(&mut self) {
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
    }

    // =========================================
    // Scanning: Identifiers and keywords
    // =========================================

    fn scan_identifier(&mut self, start: Start) -> Token<'ast> {
        let lexeme = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start)
    }

    // =========================================
    // Scanning: Operators
    // =========================================

    /// Scan an operator or punctuation token, matching on the first
    /// character and the one after it.
    fn scan_operator(&mut self, start: Start) -> Token<'ast> {
        let Some(c) = self.cursor.advance() else {
            return self.make_eof();
        };
        let next = self.cursor.peek();

        let kind = match (c, next) {
            ('(', _) => TokenKind::LeftParen,
            (')', _) => TokenKind::RightParen,
            ('[', _) => TokenKind::LeftBracket,
            (']', _) => TokenKind::RightBracket,
            ('{', _) => TokenKind::LeftBrace,
            ('}', _) => TokenKind::RightBrace,
            (';', _) => TokenKind::Semicolon,
            (',', _) => TokenKind::Comma,
            ('~', _) => TokenKind::Tilde,
            ('?', _) => TokenKind::Question,
            (':', _) => TokenKind::Colon,
            ('.', _) => TokenKind::Dot,

            ('+', Some('+')) => { self.cursor.advance(); TokenKind::PlusPlus }
            ('+', Some('=')) => { self.cursor.advance(); TokenKind::PlusEqual }
            ('+', _) => TokenKind::Plus,

            ('-', Some('-')) => { self.cursor.advance(); TokenKind::MinusMinus }
            ('-', Some('=')) => { self.cursor.advance(); TokenKind::MinusEqual }
            ('-', _) => TokenKind::Minus,

            ('*', Some('=')) => { self.cursor.advance(); TokenKind::StarEqual }
            ('*', _) => TokenKind::Star,

            ('%', Some('=')) => { self.cursor.advance(); TokenKind::PercentEqual }
            ('%', _) => TokenKind::Percent,

            ('=', Some('=')) => { self.cursor.advance(); TokenKind::EqualEqual }
            ('=', _) => TokenKind::Equal,

            ('!', Some('=')) => { self.cursor.advance(); TokenKind::BangEqual }
            ('!', _) => TokenKind::Bang,

            ('<', Some('=')) => { self.cursor.advance(); TokenKind::LessEqual }
            ('<', Some('<')) => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    TokenKind::LessLessEqual
                } else {
                    TokenKind::LessLess
                }
            }
            ('<', _) => TokenKind::Less,

            ('>', Some('=')) => { self.cursor.advance(); TokenKind::GreaterEqual }
            ('>', Some('>')) => {
                self.cursor.advance();
                match self.cursor.peek() {
                    Some('>') => {
                        self.cursor.advance();
                        if self.cursor.eat('=') {
                            TokenKind::GreaterGreaterGreaterEqual
                        } else {
                            TokenKind::GreaterGreaterGreater
                        }
                    }
                    Some('=') => { self.cursor.advance(); TokenKind::GreaterGreaterEqual }
                    _ => TokenKind::GreaterGreater,
                }
            }
            ('>', _) => TokenKind::Greater,

            ('&', Some('=')) => { self.cursor.advance(); TokenKind::AmpEqual }
            ('&', Some('&')) => { self.cursor.advance(); TokenKind::AmpAmp }
            ('&', _) => TokenKind::Amp,

            ('|', Some('=')) => { self.cursor.advance(); TokenKind::PipeEqual }
            ('|', Some('|')) => { self.cursor.advance(); TokenKind::PipePipe }
            ('|', _) => TokenKind::Pipe,

            ('^', Some('=')) => { self.cursor.advance(); TokenKind::CaretEqual }
            ('^', _) => TokenKind::Caret,

            _ => {
                return self.make_error(
                    ParseErrorKind::UnexpectedChar,
                    start,
                    format!("unexpected character '{c}'"),
                );
            }
        };

        self.make_token(kind, start)
    }
}

impl<'src, 'ast> Iterator for Lexer<'src, 'ast> {
    type Item = Token<'ast>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

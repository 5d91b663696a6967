//! Token definitions for body source.

use fnspec_core::Span;
use std::fmt;

/// A token from body source.
///
/// The lexeme lives in the parser's arena, so the source string may be
/// dropped once tokenization finishes.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    pub kind: TokenKind,
    pub lexeme: &'ast str,
    pub span: Span,
}

impl<'ast> Token<'ast> {
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All token kinds of the body language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// `42`
    IntLiteral,
    /// `42L`
    LongLiteral,
    /// `1.5f`
    FloatLiteral,
    /// `1.5`, `1e3`, `2d`
    DoubleLiteral,
    /// `"text"`
    StringLiteral,

    Identifier,

    // =========================================
    // Keywords - primitive types
    // =========================================
    Double,
    Float,
    Int,
    Long,
    Boolean,
    Short,

    // =========================================
    // Keywords - values and statements
    // =========================================
    True,
    False,
    Null,
    If,
    Else,
    For,
    While,
    Break,
    Continue,
    Return,
    New,

    // =========================================
    // Operators
    // =========================================
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    AmpEqual,
    PipeEqual,
    CaretEqual,
    LessLessEqual,
    GreaterGreaterEqual,
    GreaterGreaterGreaterEqual,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LessLess,
    GreaterGreater,
    GreaterGreaterGreater,
    Amp,
    Pipe,
    Caret,
    AmpAmp,
    PipePipe,
    Bang,
    Tilde,

    // =========================================
    // Punctuation
    // =========================================
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Semicolon,
    Comma,
    Dot,
    Question,
    Colon,

    Eof,
    /// Produced for input the lexer could not scan; the error is recorded
    /// separately.
    Error,
}

impl TokenKind {
    /// Whether this token names one of the six primitive types.
    pub fn is_primitive_type(self) -> bool {
        matches!(
            self,
            TokenKind::Double
                | TokenKind::Float
                | TokenKind::Int
                | TokenKind::Long
                | TokenKind::Boolean
                | TokenKind::Short
        )
    }

    pub fn as_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            IntLiteral => "integer literal",
            LongLiteral => "long literal",
            FloatLiteral => "float literal",
            DoubleLiteral => "double literal",
            StringLiteral => "string literal",
            Identifier => "identifier",
            Double => "double",
            Float => "float",
            Int => "int",
            Long => "long",
            Boolean => "boolean",
            Short => "short",
            True => "true",
            False => "false",
            Null => "null",
            If => "if",
            Else => "else",
            For => "for",
            While => "while",
            Break => "break",
            Continue => "continue",
            Return => "return",
            New => "new",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            PlusPlus => "++",
            MinusMinus => "--",
            Equal => "=",
            PlusEqual => "+=",
            MinusEqual => "-=",
            StarEqual => "*=",
            SlashEqual => "/=",
            PercentEqual => "%=",
            AmpEqual => "&=",
            PipeEqual => "|=",
            CaretEqual => "^=",
            LessLessEqual => "<<=",
            GreaterGreaterEqual => ">>=",
            GreaterGreaterGreaterEqual => ">>>=",
            EqualEqual => "==",
            BangEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            LessLess => "<<",
            GreaterGreater => ">>",
            GreaterGreaterGreater => ">>>",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            AmpAmp => "&&",
            PipePipe => "||",
            Bang => "!",
            Tilde => "~",
            LeftParen => "(",
            RightParen => ")",
            LeftBracket => "[",
            RightBracket => "]",
            LeftBrace => "{",
            RightBrace => "}",
            Semicolon => ";",
            Comma => ",",
            Dot => ".",
            Question => "?",
            Colon => ":",
            Eof => "end of body",
            Error => "invalid token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an identifier-shaped lexeme to its keyword kind.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    Some(match ident {
        "double" => TokenKind::Double,
        "float" => TokenKind::Float,
        "int" => TokenKind::Int,
        "long" => TokenKind::Long,
        "boolean" => TokenKind::Boolean,
        "short" => TokenKind::Short,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "return" => TokenKind::Return,
        "new" => TokenKind::New,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup() {
        assert_eq!(lookup_keyword("return"), Some(TokenKind::Return));
        assert_eq!(lookup_keyword("boolean"), Some(TokenKind::Boolean));
        assert_eq!(lookup_keyword("Double"), None);
        assert_eq!(lookup_keyword("returns"), None);
    }

    #[test]
    fn primitive_type_tokens() {
        assert!(TokenKind::Short.is_primitive_type());
        assert!(!TokenKind::Identifier.is_primitive_type());
        assert!(!TokenKind::Null.is_primitive_type());
    }

    #[test]
    fn display() {
        assert_eq!(TokenKind::GreaterGreaterGreaterEqual.to_string(), ">>>=");
        assert_eq!(TokenKind::Eof.to_string(), "end of body");
    }
}

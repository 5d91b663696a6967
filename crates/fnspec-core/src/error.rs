//! Error types shared across the workspace.
//!
//! ```text
//! ParseError    - body source could not be tokenized or parsed
//! BackendError  - an evaluation backend refused to build a unit
//! RuntimeError  - a built unit failed while evaluating a call
//! ```
//!
//! Signature-level errors and the top-level `FunctionError` live in the
//! `fnspec` crate, which is the only place that sees the spec string.

use std::error::Error as StdError;

use thiserror::Error;

use crate::Span;

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of body parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A character that starts no token.
    UnexpectedChar,
    /// A string literal ran to the end of the body.
    UnterminatedString,
    /// A block comment ran to the end of the body.
    UnterminatedComment,
    /// A numeric literal could not be parsed.
    InvalidNumber,
    /// A specific token was expected but not found.
    ExpectedToken,
    /// An expression was expected.
    ExpectedExpression,
    /// A type name was expected.
    ExpectedType,
    /// An identifier was expected.
    ExpectedIdentifier,
    /// Input ended in the middle of a construct.
    UnexpectedEof,
    /// The left side of an assignment cannot be assigned to.
    InvalidAssignmentTarget,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::UnexpectedChar => "unexpected character",
            ParseErrorKind::UnterminatedString => "unterminated string",
            ParseErrorKind::UnterminatedComment => "unterminated comment",
            ParseErrorKind::InvalidNumber => "invalid number",
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::ExpectedType => "expected type",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::UnexpectedEof => "unexpected end of body",
            ParseErrorKind::InvalidAssignmentTarget => "invalid assignment target",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parse error with location.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    /// Create an "expected expression" error.
    pub fn expected_expression(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedExpression,
            span,
            format!("expected expression, found {found}"),
        )
    }

    /// Render the error with the offending line and a caret underneath.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = format!("error at {}: {}\n", self.span, self.kind);
        if !self.message.is_empty() {
            output.push_str(&format!("  {}\n", self.message));
        }
        if let Some(line_text) = source.lines().nth(self.span.line.saturating_sub(1) as usize) {
            output.push_str(&format!("{:>3} | {}\n", self.span.line, line_text));
            let indent = " ".repeat(self.span.col.saturating_sub(1) as usize);
            let marker = "^".repeat(self.span.len.max(1) as usize);
            output.push_str(&format!("    | {indent}{marker}\n"));
        }
        output
    }
}

// ============================================================================
// Backend Errors
// ============================================================================

/// A backend failed to turn finalized body source into an invocable unit.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct BackendError {
    /// Human-readable diagnostic.
    pub message: String,
    /// Location inside the body source, when known.
    pub span: Option<Span>,
    /// Underlying cause, when the backend wraps another error.
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
            source: None,
        }
    }

    pub fn at(span: Span, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl From<ParseError> for BackendError {
    fn from(error: ParseError) -> Self {
        BackendError {
            message: error.to_string(),
            span: Some(error.span),
            source: Some(Box::new(error)),
        }
    }
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Errors raised while a built unit evaluates a call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// A cast or narrowing found a value of the wrong type.
    #[error("cannot cast {found} to {expected}")]
    ClassCast { expected: String, found: String },

    /// A member was accessed on `null`.
    #[error("null dereference: {context}")]
    NullPointer { context: String },

    #[error("{type_name} has no field '{field}'")]
    UnknownField { type_name: String, field: String },

    #[error("{type_name} has no method '{method}'")]
    UnknownMethod { type_name: String, method: String },

    #[error("{callee} expects {expected} argument(s), got {found}")]
    ArgumentCount {
        callee: String,
        expected: usize,
        found: usize,
    },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("integer division by zero")]
    DivisionByZero,

    #[error("bad operand types for '{op}': {left}, {right}")]
    InvalidOperands {
        op: String,
        left: String,
        right: String,
    },

    /// The body finished without executing a `return`.
    #[error("body completed without returning a value")]
    MissingReturn,

    /// A host function or method reported a failure.
    #[error("{0}")]
    Native(String),
}

impl RuntimeError {
    /// Convenience for host code reporting its own failures.
    pub fn native(message: impl Into<String>) -> Self {
        RuntimeError::Native(message.into())
    }
}

//! Errors raised while building or invoking a [`ParsedFunction`].
//!
//! [`ParsedFunction`]: crate::ParsedFunction

use fnspec_core::{BackendError, PrimitiveKind, RuntimeError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FunctionError>;

/// Problems with the signature part of a spec string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("malformed signature '{spec}': {reason}")]
    MalformedSignature { spec: String, reason: String },

    #[error("no argument type found in '{token}'")]
    MissingType { token: String },

    #[error("too many tokens in parameter '{token}'")]
    TooManyTokens { token: String },
}

impl SignatureError {
    pub(crate) fn malformed(spec: &str, reason: impl Into<String>) -> Self {
        SignatureError::MalformedSignature {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level error for parsing and evaluating functions.
#[derive(Debug, Error)]
pub enum FunctionError {
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The backend rejected the generated body.
    #[error("failed to compile '{spec}': {message}")]
    FunctionCompilation {
        spec: String,
        message: String,
        #[source]
        source: BackendError,
    },

    /// An entry point other than the declared one was invoked.
    #[error("{requested} is not supported by a function returning {declared}")]
    UnsupportedOperation {
        requested: &'static str,
        declared: String,
    },

    #[error("evaluation failed: {0}")]
    Evaluation(#[from] RuntimeError),
}

impl FunctionError {
    pub(crate) fn compilation(spec: &str, source: BackendError) -> Self {
        let message = match source.span {
            Some(span) => format!("{} at body {}:{}", source.message, span.line, span.col),
            None => source.message.clone(),
        };
        FunctionError::FunctionCompilation {
            spec: spec.to_string(),
            message,
            source,
        }
    }

    pub(crate) fn unsupported(requested: Option<PrimitiveKind>, declared: &str) -> Self {
        FunctionError::UnsupportedOperation {
            requested: requested.map_or("evaluateToObject", PrimitiveKind::entry_point_name),
            declared: declared.to_string(),
        }
    }

    pub fn is_unsupported_operation(&self) -> bool {
        matches!(self, FunctionError::UnsupportedOperation { .. })
    }
}

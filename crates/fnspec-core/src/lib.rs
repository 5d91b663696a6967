//! Shared vocabulary for the fnspec workspace.
//!
//! - [`PrimitiveKind`] and [`TypeTable`]: the six primitive return kinds and
//!   their boxed spellings
//! - [`Value`] and [`HostObject`]: what travels through argument arrays
//! - [`EvaluationBackend`] and friends: the seam between the signature parser
//!   and whatever actually runs a body
//! - error types for parsing, backend construction and evaluation

pub mod backend;
pub mod error;
pub mod primitive_kind;
pub mod span;
pub mod value;

pub use backend::{CompiledBody, EntryPoint, EvaluationBackend, UnitRequest, VariableBinding};
pub use error::{BackendError, ParseError, ParseErrorKind, RuntimeError};
pub use primitive_kind::{PrimitiveKind, TypeTable};
pub use span::Span;
pub use value::{FromValue, HostObject, Value};

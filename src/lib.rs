//! Compile compact function signatures into typed callables.
//!
//! A spec string such as `double(Double x,y,z,f)->(x + y + z + f)` names a
//! return type, a list of boxed parameters and a body. [`FunctionParser`]
//! turns it into a [`ParsedFunction`] that can be invoked any number of
//! times with a positional array of [`Value`]s:
//!
//! ```
//! use fnspec::{FunctionParser, Value};
//!
//! let f = FunctionParser::from_str("double (Double x,y,z,f, Boolean a)->a ? x * y : z * f").unwrap();
//! let args = [1.0, 2.0, 3.0, 4.0].map(Value::from);
//! let with = |a: bool| [&args[..], &[Value::from(a)]].concat();
//!
//! assert_eq!(f.evaluate_to_double(&with(true)).unwrap(), 2.0);
//! assert_eq!(f.evaluate_to_double(&with(false)).unwrap(), 12.0);
//! ```
//!
//! Parameter names in the body are rewritten into accesses on the argument
//! array ([`substitute`]), the body is wrapped into a method ([`body`]) and
//! handed to an [`EvaluationBackend`]. The default backend interprets the
//! Java-flavoured body language; host types are added through a
//! [`TypeRegistry`].

pub mod body;
pub mod error;
pub mod function;
pub mod params;
pub mod parser;
pub mod signature;
pub mod substitute;

pub use body::MethodSource;
pub use error::{FunctionError, Result, SignatureError};
pub use function::ParsedFunction;
pub use parser::{DEFAULT_ARGS_IDENTIFIER, FunctionParser, FunctionParserBuilder, ParserOptions};
pub use signature::{DEFAULT_RETURN_TYPE, RawSignature, split_signature};

pub use fnspec_core::{
    BackendError, CompiledBody, EntryPoint, EvaluationBackend, FromValue, HostObject, PrimitiveKind,
    RuntimeError, TypeTable, UnitRequest, Value, VariableBinding,
};
pub use fnspec_macros::HostObject;
pub use fnspec_runtime::{InterpreterBackend, NativeFn, RegistrationError, TypeEntry, TypeKind, TypeRegistry};

/// The shared vocabulary crate, for `#[fnspec(crate = "fnspec::core")]`.
pub use fnspec_core as core;

//! Default evaluation backend for fnspec.
//!
//! Bodies are parsed by `fnspec-parser`, lowered by the [`compiler`] into a
//! slot-resolved [`Program`] and executed by the [`interpreter`]. Names in a
//! body resolve against a [`TypeRegistry`], which starts out with the
//! [`builtins`] and can be extended with host types.
//!
//! ```
//! use std::sync::Arc;
//! use fnspec_runtime::{InterpreterBackend, TypeRegistry};
//!
//! let backend = InterpreterBackend::new(Arc::new(TypeRegistry::with_builtins()));
//! assert!(backend.registry().contains("java.lang.Math"));
//! ```

pub mod backend;
pub mod builtins;
pub mod compiler;
pub mod convert;
pub mod interpreter;
pub mod operators;
pub mod registry;

pub use backend::{CompiledProgram, InterpreterBackend};
pub use compiler::{Compiler, Program};
pub use registry::{NativeFn, RegistrationError, TypeEntry, TypeKind, TypeRegistry};

//! The evaluation-backend contract.
//!
//! The signature parser never executes anything itself. Once it has
//! produced finalized body source it hands a [`UnitRequest`] to an
//! [`EvaluationBackend`], which either returns a [`CompiledBody`] or a
//! [`BackendError`]. `fnspec-runtime` ships the default interpreter; hosts can
//! supply their own (a JIT, a sandboxed script engine, ...).

use std::fmt;

use crate::error::{BackendError, RuntimeError};
use crate::primitive_kind::PrimitiveKind;
use crate::value::Value;

/// Which typed entry point a unit exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// `evaluateTo<Boxed>`, returning the given primitive kind.
    Primitive(PrimitiveKind),
    /// `evaluateToObject`.
    Object,
}

impl EntryPoint {
    /// Select the entry point for a declared return type name.
    pub fn for_return_type(return_type: &str) -> Self {
        PrimitiveKind::from_name(return_type).map_or(EntryPoint::Object, EntryPoint::Primitive)
    }

    /// Method name, e.g. `evaluateToDouble`.
    pub fn method_name(self) -> &'static str {
        match self {
            EntryPoint::Primitive(kind) => kind.entry_point_name(),
            EntryPoint::Object => "evaluateToObject",
        }
    }

    /// Declared return type of the entry-point method.
    pub fn return_type_name(self) -> &'static str {
        match self {
            EntryPoint::Primitive(kind) => kind.name(),
            EntryPoint::Object => "Object",
        }
    }

    pub fn primitive(self) -> Option<PrimitiveKind> {
        match self {
            EntryPoint::Primitive(kind) => Some(kind),
            EntryPoint::Object => None,
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// A parameter bound to a slot of the argument array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableBinding {
    /// Position in the argument array.
    pub index: usize,
    pub name: String,
    /// Declared (boxed or object) type name.
    pub type_name: String,
}

/// Everything a backend needs to build one unit.
#[derive(Debug, Clone, Copy)]
pub struct UnitRequest<'a> {
    /// The original spec string, verbatim.
    pub function_string: &'a str,
    /// Declared return type, e.g. `double` or `geom.Point`.
    pub return_type: &'a str,
    pub entry_point: EntryPoint,
    /// Identifier the body uses for the argument array.
    pub args_identifier: &'a str,
    /// Finalized statement-block source: substituted, and wrapped in an
    /// explicit `return` when the spec gave a bare expression.
    pub body: &'a str,
    /// Bindings in declaration order.
    pub bindings: &'a [VariableBinding],
}

/// Builds invocable units from finalized source.
///
/// Implementations must be safe to call from several threads when
/// functions are parsed concurrently.
pub trait EvaluationBackend: Send + Sync {
    fn compile(&self, request: &UnitRequest<'_>) -> Result<Box<dyn CompiledBody>, BackendError>;
}

/// An invocable unit produced by a backend.
///
/// `invoke` must not keep per-call state on `self`: the same unit may be
/// invoked concurrently.
pub trait CompiledBody: Send + Sync + fmt::Debug {
    /// Run the body against an argument array.
    ///
    /// For primitive entry points the returned value already carries the
    /// declared primitive kind.
    fn invoke(&self, args: &[Value]) -> Result<Value, RuntimeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_point_selection() {
        assert_eq!(
            EntryPoint::for_return_type("double"),
            EntryPoint::Primitive(PrimitiveKind::Double)
        );
        assert_eq!(EntryPoint::for_return_type("Double"), EntryPoint::Object);
        assert_eq!(EntryPoint::for_return_type("geom.Point"), EntryPoint::Object);
        assert_eq!(EntryPoint::for_return_type("char"), EntryPoint::Object);
    }

    #[test]
    fn entry_point_names() {
        assert_eq!(EntryPoint::Object.method_name(), "evaluateToObject");
        assert_eq!(EntryPoint::Object.return_type_name(), "Object");
        let int = EntryPoint::Primitive(PrimitiveKind::Int);
        assert_eq!(int.to_string(), "evaluateToInteger");
        assert_eq!(int.return_type_name(), "int");
        assert_eq!(int.primitive(), Some(PrimitiveKind::Int));
    }
}

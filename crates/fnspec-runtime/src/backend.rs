//! The default [`EvaluationBackend`]: compile with [`Compiler`], run with
//! the tree-walking interpreter.

use std::sync::Arc;

use fnspec_core::{BackendError, CompiledBody, EvaluationBackend, RuntimeError, UnitRequest, Value};
use tracing::debug;

use crate::compiler::{Compiler, Program};
use crate::interpreter;
use crate::registry::TypeRegistry;

/// Interprets bodies against a shared [`TypeRegistry`].
#[derive(Debug, Clone)]
pub struct InterpreterBackend {
    registry: Arc<TypeRegistry>,
}

impl InterpreterBackend {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    /// A backend that only knows the builtin types.
    pub fn with_builtins() -> Self {
        Self::new(Arc::new(TypeRegistry::with_builtins()))
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }
}

impl Default for InterpreterBackend {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl EvaluationBackend for InterpreterBackend {
    /// Object entry points return `Object`. The declared type only matters
    /// to the cast wrapped around a bare expression body.
    fn compile(&self, request: &UnitRequest<'_>) -> Result<Box<dyn CompiledBody>, BackendError> {
        let program = Compiler::compile_source(
            &self.registry,
            request.args_identifier,
            request.entry_point.return_type_name(),
            request.body,
        )?;
        debug!(
            function = request.function_string,
            entry_point = %request.entry_point,
            frame_size = program.frame_size(),
            "compiled body"
        );
        Ok(Box::new(CompiledProgram(program)))
    }
}

/// A [`Program`] exposed through the backend contract.
#[derive(Debug)]
pub struct CompiledProgram(Program);

impl CompiledProgram {
    pub fn program(&self) -> &Program {
        &self.0
    }
}

impl CompiledBody for CompiledProgram {
    fn invoke(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        interpreter::run(&self.0, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnspec_core::{EntryPoint, PrimitiveKind};

    fn request<'a>(return_type: &'a str, body: &'a str) -> UnitRequest<'a> {
        UnitRequest {
            function_string: "test",
            return_type,
            entry_point: EntryPoint::for_return_type(return_type),
            args_identifier: "ARGS",
            body,
            bindings: &[],
        }
    }

    #[test]
    fn compile_and_invoke() {
        let backend = InterpreterBackend::default();
        let unit = backend
            .compile(&request("double", "return ((double)((((Double) ARGS[0]).doubleValue()) * 2));"))
            .unwrap();
        assert_eq!(unit.invoke(&[Value::Double(1.5)]).unwrap(), Value::Double(3.0));
        assert!(matches!(
            unit.invoke(&[Value::Int(1)]),
            Err(RuntimeError::ClassCast { .. })
        ));
    }

    #[test]
    fn primitive_entry_points_return_their_kind() {
        let backend = InterpreterBackend::default();
        let unit = backend.compile(&request("long", "return 1;")).unwrap();
        let value = unit.invoke(&[]).unwrap();
        assert_eq!(value.primitive_kind(), Some(PrimitiveKind::Long));
    }

    #[test]
    fn object_entry_point_ignores_declared_type() {
        let backend = InterpreterBackend::default();
        let unit = backend
            .compile(&request("Number", "return ((Double) ARGS[0]);"))
            .unwrap();
        assert_eq!(unit.invoke(&[Value::Double(2.5)]).unwrap(), Value::Double(2.5));

        let err = backend
            .compile(&request("Number", "return ((Number)(((Double) ARGS[0])));"))
            .unwrap_err();
        assert_eq!(err.message, "cannot find symbol: class Number");
    }

    #[test]
    fn compile_errors_carry_spans() {
        let backend = InterpreterBackend::default();
        let err = backend.compile(&request("double", "return nope;")).unwrap_err();
        assert_eq!(err.message, "cannot find symbol: variable nope");
        assert_eq!(err.span.map(|s| s.offset), Some(7));
    }
}

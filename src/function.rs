//! The callable a spec string compiles to.

use std::fmt;
use std::str::FromStr;

use fnspec_core::{CompiledBody, EntryPoint, FromValue, PrimitiveKind, Value, VariableBinding};
use indexmap::IndexSet;

use crate::body::MethodSource;
use crate::error::{FunctionError, Result};
use crate::parser::FunctionParser;

/// A compiled function.
///
/// Only the entry point matching the declared return type is live: a
/// function declared `double(...)` answers [`evaluate_to_double`] and fails
/// every other `evaluate_to_*` call with
/// [`FunctionError::UnsupportedOperation`]. Functions with any other return
/// type answer [`evaluate_to_object`] and [`evaluate`].
///
/// Invocation takes `&self` and keeps no state between calls.
///
/// [`evaluate_to_double`]: ParsedFunction::evaluate_to_double
/// [`evaluate_to_object`]: ParsedFunction::evaluate_to_object
/// [`evaluate`]: ParsedFunction::evaluate
#[derive(Debug)]
pub struct ParsedFunction {
    function_string: String,
    variables: IndexSet<String>,
    bindings: Vec<VariableBinding>,
    source: MethodSource,
    unit: Box<dyn CompiledBody>,
}

impl ParsedFunction {
    pub(crate) fn new(
        function_string: &str,
        bindings: Vec<VariableBinding>,
        source: MethodSource,
        unit: Box<dyn CompiledBody>,
    ) -> Self {
        Self {
            function_string: function_string.to_string(),
            variables: bindings.iter().map(|b| b.name.clone()).collect(),
            bindings,
            source,
            unit,
        }
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    fn invoke_primitive<T: FromValue>(&self, kind: PrimitiveKind, args: &[Value]) -> Result<T> {
        if self.source.entry_point() != EntryPoint::Primitive(kind) {
            return Err(FunctionError::unsupported(Some(kind), self.source.return_type()));
        }
        let value = self.unit.invoke(args)?;
        Ok(T::from_value(value)?)
    }

    pub fn evaluate_to_double(&self, args: &[Value]) -> Result<f64> {
        self.invoke_primitive(PrimitiveKind::Double, args)
    }

    pub fn evaluate_to_float(&self, args: &[Value]) -> Result<f32> {
        self.invoke_primitive(PrimitiveKind::Float, args)
    }

    pub fn evaluate_to_int(&self, args: &[Value]) -> Result<i32> {
        self.invoke_primitive(PrimitiveKind::Int, args)
    }

    pub fn evaluate_to_long(&self, args: &[Value]) -> Result<i64> {
        self.invoke_primitive(PrimitiveKind::Long, args)
    }

    pub fn evaluate_to_boolean(&self, args: &[Value]) -> Result<bool> {
        self.invoke_primitive(PrimitiveKind::Boolean, args)
    }

    pub fn evaluate_to_short(&self, args: &[Value]) -> Result<i16> {
        self.invoke_primitive(PrimitiveKind::Short, args)
    }

    /// Entry point of functions whose return type is not primitive.
    pub fn evaluate_to_object(&self, args: &[Value]) -> Result<Value> {
        if self.source.entry_point() != EntryPoint::Object {
            return Err(FunctionError::unsupported(None, self.source.return_type()));
        }
        Ok(self.unit.invoke(args)?)
    }

    /// [`evaluate_to_object`](Self::evaluate_to_object), narrowed to `T`.
    pub fn evaluate<T: FromValue>(&self, args: &[Value]) -> Result<T> {
        let value = self.evaluate_to_object(args)?;
        Ok(T::from_value(value)?)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// The spec string, exactly as given.
    pub fn function_string(&self) -> &str {
        &self.function_string
    }

    /// Parameter names in argument order, each once.
    pub fn variable_set(&self) -> &IndexSet<String> {
        &self.variables
    }

    pub fn bindings(&self) -> &[VariableBinding] {
        &self.bindings
    }

    pub fn entry_point(&self) -> EntryPoint {
        self.source.entry_point()
    }

    pub fn method_source(&self) -> &MethodSource {
        &self.source
    }
}

impl fmt::Display for ParsedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParsedFunction[{}]", self.function_string)
    }
}

impl FromStr for ParsedFunction {
    type Err = FunctionError;

    fn from_str(spec: &str) -> Result<Self> {
        FunctionParser::from_str(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubles(values: &[f64]) -> Vec<Value> {
        values.iter().copied().map(Value::from).collect()
    }

    #[test]
    fn declared_entry_point_only() {
        let f = FunctionParser::from_str("double(Double x,y,z,f)->(x + y + z + f)").unwrap();
        let args = doubles(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(f.evaluate_to_double(&args).unwrap(), 10.0);

        assert!(f.evaluate_to_float(&args).unwrap_err().is_unsupported_operation());
        assert!(f.evaluate_to_int(&args).unwrap_err().is_unsupported_operation());
        assert!(f.evaluate_to_long(&args).unwrap_err().is_unsupported_operation());
        assert!(f.evaluate_to_boolean(&args).unwrap_err().is_unsupported_operation());
        assert!(f.evaluate_to_short(&args).unwrap_err().is_unsupported_operation());
        assert!(f.evaluate_to_object(&args).unwrap_err().is_unsupported_operation());
        // Raised on every call, not just the first.
        assert!(f.evaluate_to_int(&args).unwrap_err().is_unsupported_operation());
    }

    #[test]
    fn object_functions_use_the_object_entry_point() {
        let f: ParsedFunction = "Double(Double x)->x+2.0".parse().unwrap();
        assert_eq!(f.entry_point(), EntryPoint::Object);
        assert_eq!(f.evaluate_to_object(&[Value::from(2.0)]).unwrap(), Value::Double(4.0));
        assert_eq!(f.evaluate::<f64>(&[Value::from(2.0)]).unwrap(), 4.0);
        assert!(f.evaluate_to_double(&[Value::from(2.0)]).unwrap_err().is_unsupported_operation());
    }

    #[test]
    fn narrowing_failure_is_an_evaluation_error() {
        let f = FunctionParser::from_str("Object(Double x)->x").unwrap();
        assert!(matches!(
            f.evaluate::<String>(&[Value::from(1.0)]),
            Err(FunctionError::Evaluation(_))
        ));
    }

    #[test]
    fn introspection() {
        let spec = "  double (     Double   x,   y ,z  ,f, Boolean    a     )   ->       a ? x * y : z * f";
        let f = FunctionParser::from_str(spec).unwrap();
        assert_eq!(f.function_string(), spec);
        assert_eq!(f.to_string(), format!("ParsedFunction[{spec}]"));
        assert_eq!(
            f.variable_set().iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["x", "y", "z", "f", "a"]
        );
        assert_eq!(f.bindings()[4].type_name, "Boolean");
        assert!(!f.method_source().has_explicit_return());
    }
}

//! Builtin types and member dispatch.
//!
//! | Type | Module |
//! |------|--------|
//! | `Object` | here |
//! | `Double`, `Float`, `Integer`, `Long`, `Boolean`, `Short` | [`boxed`] |
//! | `String` | [`string`] |
//! | `Math` | [`math`] |
//! | `List`, `Iterator` | [`list`] |
//!
//! Every builtin is also reachable through its `java.lang` or `java.util`
//! qualified name.

pub mod boxed;
pub mod list;
pub mod math;
pub mod string;

use fnspec_core::{HostObject, RuntimeError, Value};

use crate::registry::{TypeEntry, TypeKind, TypeRegistry};

/// Populate a registry with every builtin type.
pub fn register_all(registry: &mut TypeRegistry) {
    register(registry, TypeEntry::new("Object", TypeKind::Object), "java.lang");
    boxed::register(registry);
    string::register(registry);
    math::register(registry);
    list::register(registry);
}

/// Register a builtin under its simple name and `package.Name`.
///
/// Builtins go into a registry before anything else, so neither name can be
/// taken yet.
fn register(registry: &mut TypeRegistry, entry: TypeEntry, package: &str) {
    let qualified = format!("{package}.{}", entry.name());
    let name = entry.name().to_string();
    if registry.register(entry).is_ok() {
        let _ = registry.alias(qualified, &name);
    }
}

// ============================================================================
// Member dispatch
// ============================================================================

fn null_receiver(member: &str) -> RuntimeError {
    RuntimeError::NullPointer {
        context: format!("cannot access '{member}' on null"),
    }
}

/// Invoke an instance method on any value.
pub fn call_method(receiver: &Value, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match receiver {
        Value::Null => Err(null_receiver(name)),
        Value::Object(obj) => match obj.call_method(name, args) {
            Err(RuntimeError::UnknownMethod { .. }) => object_method(receiver, &**obj, name, args),
            result => result,
        },
        _ => match common_method(receiver, name, args) {
            Some(result) => result,
            None => match receiver {
                Value::Str(s) => string::call_method(s, name, args),
                Value::List(items) => list::call_method(items, name, args),
                _ => boxed::call_method(receiver, name, args),
            },
        },
    }
}

/// Methods every value answers to.
fn common_method(receiver: &Value, name: &str, args: &[Value]) -> Option<Result<Value, RuntimeError>> {
    match (name, args) {
        ("equals", [other]) => Some(Ok(Value::Boolean(receiver == other))),
        ("toString", []) => Some(Ok(Value::from(receiver.to_string()))),
        _ => None,
    }
}

/// `equals` and `toString` for host objects that do not define them.
fn object_method(
    receiver: &Value,
    obj: &dyn HostObject,
    name: &str,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    common_method(receiver, name, args).unwrap_or_else(|| {
        Err(RuntimeError::UnknownMethod {
            type_name: obj.type_name().to_string(),
            method: name.to_string(),
        })
    })
}

/// Read an instance field.
pub fn get_field(receiver: &Value, name: &str) -> Result<Value, RuntimeError> {
    match receiver {
        Value::Null => Err(null_receiver(name)),
        Value::Object(obj) => obj.field(name).ok_or_else(|| RuntimeError::UnknownField {
            type_name: obj.type_name().to_string(),
            field: name.to_string(),
        }),
        other => Err(RuntimeError::UnknownField {
            type_name: other.type_name().to_string(),
            field: name.to_string(),
        }),
    }
}

/// Write an instance field.
pub fn set_field(receiver: &Value, name: &str, value: Value) -> Result<(), RuntimeError> {
    match receiver {
        Value::Null => Err(null_receiver(name)),
        Value::Object(obj) => obj.set_field(name, value),
        other => Err(RuntimeError::UnknownField {
            type_name: other.type_name().to_string(),
            field: name.to_string(),
        }),
    }
}

// ============================================================================
// Argument helpers
// ============================================================================

pub(crate) fn expect_arity(callee: &str, args: &[Value], expected: usize) -> Result<(), RuntimeError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::ArgumentCount {
            callee: callee.to_string(),
            expected,
            found: args.len(),
        })
    }
}

pub(crate) fn unknown_method(type_name: &str, method: &str) -> RuntimeError {
    RuntimeError::UnknownMethod {
        type_name: type_name.to_string(),
        method: method.to_string(),
    }
}

pub(crate) fn argument_type(callee: &str, expected: &str, found: &Value) -> RuntimeError {
    RuntimeError::native(format!(
        "{callee}: expected {expected} argument, found {}",
        found.type_name()
    ))
}

/// An `int` argument, widening `short`.
pub(crate) fn int_arg(callee: &str, value: &Value) -> Result<i32, RuntimeError> {
    crate::convert::as_i32(value).ok_or_else(|| argument_type(callee, "int", value))
}

pub(crate) fn str_arg<'a>(callee: &str, value: &'a Value) -> Result<&'a str, RuntimeError> {
    match value {
        Value::Str(s) => Ok(&**s),
        other => Err(argument_type(callee, "String", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    #[derive(Debug)]
    struct Opaque;

    impl HostObject for Opaque {
        fn type_name(&self) -> &str {
            "Opaque"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn null_receivers() {
        assert!(matches!(
            call_method(&Value::Null, "size", &[]),
            Err(RuntimeError::NullPointer { .. })
        ));
        assert!(matches!(get_field(&Value::Null, "x"), Err(RuntimeError::NullPointer { .. })));
    }

    #[test]
    fn equals_and_to_string_everywhere() {
        let five = Value::Int(5);
        assert_eq!(call_method(&five, "equals", &[Value::Int(5)]).unwrap(), Value::Boolean(true));
        assert_eq!(call_method(&five, "equals", &[Value::Long(5)]).unwrap(), Value::Boolean(false));
        assert_eq!(call_method(&five, "toString", &[]).unwrap(), Value::from("5"));
        assert_eq!(
            call_method(&Value::list([1.0, 2.0]), "toString", &[]).unwrap(),
            Value::from("[1.0, 2.0]")
        );
    }

    #[test]
    fn host_object_fallbacks() {
        let obj = Value::object(Opaque);
        assert_eq!(call_method(&obj, "equals", &[obj.clone()]).unwrap(), Value::Boolean(true));
        assert_eq!(call_method(&obj, "toString", &[]).unwrap(), Value::from("Opaque"));
        assert!(matches!(
            call_method(&obj, "frob", &[]),
            Err(RuntimeError::UnknownMethod { .. })
        ));
        assert!(matches!(get_field(&obj, "x"), Err(RuntimeError::UnknownField { .. })));
        assert!(set_field(&obj, "x", Value::Int(1)).is_err());
    }

    #[test]
    fn fields_on_non_objects() {
        assert!(matches!(
            get_field(&Value::Double(1.0), "x"),
            Err(RuntimeError::UnknownField { .. })
        ));
    }
}

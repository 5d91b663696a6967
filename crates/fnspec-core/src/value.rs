//! Runtime values.
//!
//! [`Value`] is the unit of exchange between a host application and a parsed
//! function: argument arrays are `&[Value]` and every entry point produces a
//! `Value` internally before it is narrowed to the caller's requested type.
//!
//! The six primitive variants double as their boxed forms. A `Value::Double`
//! in an argument array is a "boxed `Double`"; the same variant produced by
//! `x.doubleValue()` is the unboxed primitive.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::RuntimeError;
use crate::primitive_kind::PrimitiveKind;

/// A value flowing through argument arrays and body evaluation.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Immutable string.
    Str(Arc<str>),
    /// Immutable list, exposed to bodies as `List`.
    List(Arc<[Value]>),
    /// A host object registered with the runtime.
    Object(Arc<dyn HostObject>),
}

impl Value {
    /// Wrap a host object.
    pub fn object<T: HostObject>(object: T) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Build a list value from anything yielding values.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Type name as seen from a body, e.g. `Integer` or `geom.Point`.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Str(_) => "String",
            Value::List(_) => "List",
            Value::Object(obj) => obj.type_name(),
            other => other
                .primitive_kind()
                .map(PrimitiveKind::boxed_name)
                .unwrap_or("Object"),
        }
    }

    /// The primitive kind carried by this value, if any.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Value::Boolean(_) => Some(PrimitiveKind::Boolean),
            Value::Short(_) => Some(PrimitiveKind::Short),
            Value::Int(_) => Some(PrimitiveKind::Int),
            Value::Long(_) => Some(PrimitiveKind::Long),
            Value::Float(_) => Some(PrimitiveKind::Float),
            Value::Double(_) => Some(PrimitiveKind::Double),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the host object as a concrete Rust type.
    pub fn downcast_ref<T: HostObject>(&self) -> Option<&T> {
        match self {
            Value::Object(obj) => obj.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Identity comparison: primitives by value, references by pointer.
    ///
    /// This is the semantics of `==` inside a body.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => self == other,
        }
    }

    fn class_cast(&self, expected: &str) -> RuntimeError {
        RuntimeError::ClassCast {
            expected: expected.to_string(),
            found: self.type_name().to_string(),
        }
    }
}

/// Structural equality, the semantics of `equals()` inside a body.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                Arc::ptr_eq(a, b) || a.host_eq(b.as_ref())
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Boolean(v) => write!(f, "Boolean({v})"),
            Value::Short(v) => write!(f, "Short({v})"),
            Value::Int(v) => write!(f, "Int({v})"),
            Value::Long(v) => write!(f, "Long({v})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::Double(v) => write!(f, "Double({v})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Object(obj) => write!(f, "Object({obj:?})"),
        }
    }
}

/// Text form used by string concatenation and `toString()`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Double(v) => write!(f, "{v:?}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(obj) => f.write_str(&obj.to_display_string()),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Boolean,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(Arc::from(v))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(Arc::from(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ============================================================================
// Host objects
// ============================================================================

/// A Rust value that bodies can read fields from and call methods on.
///
/// Implementations are shared behind an `Arc` and may be used from several
/// threads at once, so any mutation must go through interior mutability.
/// Most types derive this with `#[derive(HostObject)]` from `fnspec-macros`.
pub trait HostObject: fmt::Debug + Send + Sync + 'static {
    /// Registered type name, e.g. `geom.Point`.
    fn type_name(&self) -> &str;

    /// Read a public field.
    fn field(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }

    /// Write a public field. Fields are read-only unless the host opts in.
    fn set_field(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let _ = value;
        Err(RuntimeError::native(format!(
            "field '{name}' of {} is read-only",
            self.type_name()
        )))
    }

    /// Invoke an instance method.
    ///
    /// The default knows no methods.
    fn call_method(&self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        let _ = args;
        Err(RuntimeError::UnknownMethod {
            type_name: self.type_name().to_string(),
            method: name.to_string(),
        })
    }

    /// Structural equality against another host object.
    fn host_eq(&self, other: &dyn HostObject) -> bool {
        let _ = other;
        false
    }

    /// Text produced by `toString()` and string concatenation.
    fn to_display_string(&self) -> String {
        format!("{self:?}")
    }

    fn as_any(&self) -> &dyn Any;
}

// ============================================================================
// Narrowing out of Value
// ============================================================================

/// Conversion from a [`Value`] returned by a body into a Rust type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, RuntimeError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, RuntimeError> {
        Ok(value)
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident, $boxed:literal;)*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, RuntimeError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other.class_cast($boxed)),
                    }
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Boolean, "Boolean";
    i16 => Short, "Short";
    i32 => Int, "Integer";
    i64 => Long, "Long";
    f32 => Float, "Float";
    f64 => Double, "Double";
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, RuntimeError> {
        match value {
            Value::Str(s) => Ok(s.to_string()),
            other => Err(other.class_cast("String")),
        }
    }
}

impl FromValue for Vec<Value> {
    fn from_value(value: Value) -> Result<Self, RuntimeError> {
        match value {
            Value::List(items) => Ok(items.to_vec()),
            other => Err(other.class_cast("List")),
        }
    }
}

impl<T: HostObject + Clone> FromValue for T {
    fn from_value(value: Value) -> Result<Self, RuntimeError> {
        match value.downcast_ref::<T>() {
            Some(obj) => Ok(obj.clone()),
            None => Err(RuntimeError::ClassCast {
                expected: std::any::type_name::<T>().to_string(),
                found: value.type_name().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Pair(i32, i32);

    impl HostObject for Pair {
        fn type_name(&self) -> &str {
            "Pair"
        }

        fn field(&self, name: &str) -> Option<Value> {
            match name {
                "a" => Some(Value::Int(self.0)),
                "b" => Some(Value::Int(self.1)),
                _ => None,
            }
        }

        fn host_eq(&self, other: &dyn HostObject) -> bool {
            other.as_any().downcast_ref::<Pair>() == Some(self)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn boxed_type_names() {
        assert_eq!(Value::from(1.0).type_name(), "Double");
        assert_eq!(Value::from(1).type_name(), "Integer");
        assert_eq!(Value::from(true).type_name(), "Boolean");
        assert_eq!(Value::from("s").type_name(), "String");
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::object(Pair(1, 2)).type_name(), "Pair");
    }

    #[test]
    fn equality_vs_identity() {
        let a = Value::object(Pair(1, 2));
        let b = Value::object(Pair(1, 2));
        assert_eq!(a, b);
        assert!(!a.same(&b));
        assert!(a.same(&a.clone()));
        assert!(Value::Int(3).same(&Value::Int(3)));
        assert_ne!(Value::Int(3), Value::Long(3));
    }

    #[test]
    fn narrowing() {
        assert_eq!(f64::from_value(Value::Double(2.5)).unwrap(), 2.5);
        assert!(matches!(
            f64::from_value(Value::Int(2)),
            Err(RuntimeError::ClassCast { .. })
        ));
        assert_eq!(Pair::from_value(Value::object(Pair(3, 4))).unwrap(), Pair(3, 4));
        assert!(Pair::from_value(Value::Null).is_err());
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Double(10.0).to_string(), "10.0");
        assert_eq!(Value::list([1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::from(None::<i32>).to_string(), "null");
    }

    #[test]
    fn host_fields() {
        let v = Value::object(Pair(5, 6));
        assert_eq!(v.downcast_ref::<Pair>().unwrap().field("b"), Some(Value::Int(6)));
    }
}

//! Primitive conversions between [`Value`] variants.
//!
//! Two flavours follow the Java rules:
//! - [`cast`]: an explicit `(int) x` style conversion; narrowing is allowed
//! - [`widen`]: assignment and return conversion; only widening is allowed,
//!   plus `int` to `short` when the value fits

use fnspec_core::{PrimitiveKind, RuntimeError, Value};

/// Width order used by widening: `short < int < long < float < double`.
fn width(kind: PrimitiveKind) -> Option<u8> {
    match kind {
        PrimitiveKind::Short => Some(0),
        PrimitiveKind::Int => Some(1),
        PrimitiveKind::Long => Some(2),
        PrimitiveKind::Float => Some(3),
        PrimitiveKind::Double => Some(4),
        PrimitiveKind::Boolean => None,
    }
}

pub fn as_i32(value: &Value) -> Option<i32> {
    match *value {
        Value::Short(v) => Some(v as i32),
        Value::Int(v) => Some(v),
        _ => None,
    }
}

pub fn as_i64(value: &Value) -> Option<i64> {
    match *value {
        Value::Short(v) => Some(v as i64),
        Value::Int(v) => Some(v as i64),
        Value::Long(v) => Some(v),
        _ => None,
    }
}

pub fn as_f64(value: &Value) -> Option<f64> {
    match *value {
        Value::Short(v) => Some(v as f64),
        Value::Int(v) => Some(v as f64),
        Value::Long(v) => Some(v as f64),
        Value::Float(v) => Some(v as f64),
        Value::Double(v) => Some(v),
        _ => None,
    }
}

pub fn is_numeric(value: &Value) -> bool {
    value.primitive_kind().is_some_and(PrimitiveKind::is_numeric)
}

fn class_cast(value: &Value, expected: &str) -> RuntimeError {
    RuntimeError::ClassCast {
        expected: expected.to_string(),
        found: value.type_name().to_string(),
    }
}

fn unboxing_null(kind: PrimitiveKind) -> RuntimeError {
    RuntimeError::NullPointer {
        context: format!("cannot unbox null to {}", kind.name()),
    }
}

/// Explicit primitive cast.
///
/// Numeric values convert to any numeric kind with Java's truncation and
/// saturation rules; `boolean` only converts to itself.
pub fn cast(value: &Value, to: PrimitiveKind) -> Result<Value, RuntimeError> {
    if value.is_null() {
        return Err(unboxing_null(to));
    }
    if to == PrimitiveKind::Boolean {
        return match value {
            Value::Boolean(_) => Ok(value.clone()),
            other => Err(class_cast(other, to.name())),
        };
    }
    if !is_numeric(value) {
        return Err(class_cast(value, to.name()));
    }

    Ok(match (value, to) {
        (_, PrimitiveKind::Double) => Value::Double(as_f64(value).unwrap_or_default()),
        (Value::Double(v), PrimitiveKind::Float) => Value::Float(*v as f32),
        (_, PrimitiveKind::Float) => match as_i64(value) {
            Some(v) => Value::Float(v as f32),
            None => Value::Float(as_f64(value).unwrap_or_default() as f32),
        },
        (Value::Float(_) | Value::Double(_), PrimitiveKind::Long) => {
            Value::Long(as_f64(value).unwrap_or_default() as i64)
        }
        (_, PrimitiveKind::Long) => Value::Long(as_i64(value).unwrap_or_default()),
        (Value::Float(_) | Value::Double(_), PrimitiveKind::Int) => {
            Value::Int(as_f64(value).unwrap_or_default() as i32)
        }
        (_, PrimitiveKind::Int) => Value::Int(as_i64(value).unwrap_or_default() as i32),
        (Value::Float(_) | Value::Double(_), PrimitiveKind::Short) => {
            Value::Short(as_f64(value).unwrap_or_default() as i32 as i16)
        }
        (_, PrimitiveKind::Short) => Value::Short(as_i64(value).unwrap_or_default() as i16),
        (_, PrimitiveKind::Boolean) => return Err(class_cast(value, to.name())),
    })
}

/// Assignment conversion into a primitive slot.
///
/// Widening is implicit; narrowing fails with a class cast, except that an
/// `int` which fits is accepted by a `short` slot.
pub fn widen(value: &Value, to: PrimitiveKind) -> Result<Value, RuntimeError> {
    if value.is_null() {
        return Err(unboxing_null(to));
    }
    let Some(from) = value.primitive_kind() else {
        return Err(class_cast(value, to.name()));
    };
    if from == to {
        return Ok(value.clone());
    }

    match (width(from), width(to)) {
        (Some(from_width), Some(to_width)) if from_width <= to_width => cast(value, to),
        _ => match (value, to) {
            (Value::Int(v), PrimitiveKind::Short) if i16::try_from(*v).is_ok() => cast(value, to),
            _ => Err(class_cast(value, to.name())),
        },
    }
}

/// Increment or decrement by one, keeping the operand's kind.
pub fn step(value: &Value, delta: i32) -> Result<Value, RuntimeError> {
    Ok(match *value {
        Value::Short(v) => Value::Short((v as i32).wrapping_add(delta) as i16),
        Value::Int(v) => Value::Int(v.wrapping_add(delta)),
        Value::Long(v) => Value::Long(v.wrapping_add(delta as i64)),
        Value::Float(v) => Value::Float(v + delta as f32),
        Value::Double(v) => Value::Double(v + delta as f64),
        Value::Null => {
            return Err(RuntimeError::NullPointer {
                context: "increment of null".to_string(),
            });
        }
        ref other => {
            return Err(RuntimeError::InvalidOperands {
                op: if delta > 0 { "++" } else { "--" }.to_string(),
                left: other.type_name().to_string(),
                right: String::new(),
            });
        }
    })
}

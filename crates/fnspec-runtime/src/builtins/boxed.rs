//! The six boxed primitive types.
//!
//! Statics per type: `MIN_VALUE`/`MAX_VALUE` (`TRUE`/`FALSE` for `Boolean`),
//! `valueOf(x)` and `parseXxx(s)`. Instances answer to every `xxxValue()`
//! accessor that Java's `Number` offers, plus `compareTo` and, for the
//! floating kinds, `isNaN`.

use fnspec_core::{PrimitiveKind, RuntimeError, Value};

use super::{argument_type, expect_arity, str_arg, unknown_method};
use crate::convert;
use crate::registry::{TypeEntry, TypeKind, TypeRegistry};

pub fn register(registry: &mut TypeRegistry) {
    for kind in PrimitiveKind::ALL {
        super::register(registry, entry(kind), "java.lang");
    }
}

fn entry(kind: PrimitiveKind) -> TypeEntry {
    let (min, max) = limits(kind);
    let parse_name = parse_function_name(kind);

    TypeEntry::new(kind.boxed_name(), TypeKind::Boxed(kind))
        .with_static_field(if kind == PrimitiveKind::Boolean { "FALSE" } else { "MIN_VALUE" }, min)
        .with_static_field(if kind == PrimitiveKind::Boolean { "TRUE" } else { "MAX_VALUE" }, max)
        .with_static_function("valueOf", move |args| {
            expect_arity("valueOf", args, 1)?;
            match &args[0] {
                Value::Str(s) => parse(kind, s),
                other => convert::widen(other, kind),
            }
        })
        .with_static_function(parse_name, move |args| {
            expect_arity(parse_name, args, 1)?;
            parse(kind, str_arg(parse_name, &args[0])?)
        })
}

fn limits(kind: PrimitiveKind) -> (Value, Value) {
    match kind {
        PrimitiveKind::Double => (Value::Double(f64::from_bits(1)), Value::Double(f64::MAX)),
        PrimitiveKind::Float => (Value::Float(f32::from_bits(1)), Value::Float(f32::MAX)),
        PrimitiveKind::Int => (Value::Int(i32::MIN), Value::Int(i32::MAX)),
        PrimitiveKind::Long => (Value::Long(i64::MIN), Value::Long(i64::MAX)),
        PrimitiveKind::Short => (Value::Short(i16::MIN), Value::Short(i16::MAX)),
        PrimitiveKind::Boolean => (Value::Boolean(false), Value::Boolean(true)),
    }
}

fn parse_function_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Double => "parseDouble",
        PrimitiveKind::Float => "parseFloat",
        PrimitiveKind::Int => "parseInt",
        PrimitiveKind::Long => "parseLong",
        PrimitiveKind::Short => "parseShort",
        PrimitiveKind::Boolean => "parseBoolean",
    }
}

/// Parse text the way `Integer.parseInt` and friends do.
///
/// Floating kinds tolerate surrounding whitespace; integer kinds do not.
/// `parseBoolean` never fails: anything other than `true` (any case) is
/// `false`.
pub fn parse(kind: PrimitiveKind, text: &str) -> Result<Value, RuntimeError> {
    let invalid = || RuntimeError::native(format!("invalid {} format: \"{text}\"", kind.name()));

    Ok(match kind {
        PrimitiveKind::Boolean => Value::Boolean(text.eq_ignore_ascii_case("true")),
        PrimitiveKind::Double => Value::Double(text.trim().parse().map_err(|_| invalid())?),
        PrimitiveKind::Float => Value::Float(text.trim().parse().map_err(|_| invalid())?),
        PrimitiveKind::Int => Value::Int(text.parse().map_err(|_| invalid())?),
        PrimitiveKind::Long => Value::Long(text.parse().map_err(|_| invalid())?),
        PrimitiveKind::Short => Value::Short(text.parse().map_err(|_| invalid())?),
    })
}

/// Instance methods of a boxed primitive.
pub fn call_method(receiver: &Value, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    let Some(kind) = receiver.primitive_kind() else {
        return Err(unknown_method(receiver.type_name(), name));
    };

    if let Some(target) = PrimitiveKind::ALL.into_iter().find(|k| k.unbox_method() == name) {
        expect_arity(name, args, 0)?;
        // Boolean has only booleanValue(); numbers have every numeric accessor.
        if (kind == PrimitiveKind::Boolean) != (target == PrimitiveKind::Boolean) {
            return Err(unknown_method(receiver.type_name(), name));
        }
        return convert::cast(receiver, target);
    }

    match name {
        "compareTo" => {
            expect_arity(name, args, 1)?;
            let other = &args[0];
            if other.primitive_kind() != Some(kind) {
                return Err(argument_type(name, kind.boxed_name(), other));
            }
            let ordering = match (receiver, other) {
                (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
                _ => {
                    let (a, b) = (convert::as_f64(receiver), convert::as_f64(other));
                    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
                }
            };
            Ok(Value::Int(ordering as i32))
        }
        "isNaN" => {
            expect_arity(name, args, 0)?;
            match receiver {
                Value::Double(v) => Ok(Value::Boolean(v.is_nan())),
                Value::Float(v) => Ok(Value::Boolean(v.is_nan())),
                _ => Err(unknown_method(receiver.type_name(), name)),
            }
        }
        "hashCode" => {
            expect_arity(name, args, 0)?;
            Ok(Value::Int(match *receiver {
                Value::Boolean(v) => if v { 1231 } else { 1237 },
                Value::Short(v) => v as i32,
                Value::Int(v) => v,
                Value::Long(v) => (v ^ (v >> 32)) as i32,
                Value::Float(v) => v.to_bits() as i32,
                Value::Double(v) => {
                    let bits = v.to_bits();
                    (bits ^ (bits >> 32)) as i32
                }
                _ => 0,
            }))
        }
        _ => Err(unknown_method(receiver.type_name(), name)),
    }
}

//! `Math`: constants and functions.
//!
//! `abs`, `min` and `max` keep the promoted type of their arguments, as in
//! Java; the rest work on `double`.

use fnspec_core::{RuntimeError, Value};

use super::{argument_type, expect_arity};
use crate::convert::as_f64;
use crate::operators::{Promoted, promote};
use crate::registry::{TypeEntry, TypeKind, TypeRegistry};

// =============================================================================
// CONSTANTS
// =============================================================================

const CONSTANTS: &[(&str, f64)] = &[("PI", std::f64::consts::PI), ("E", std::f64::consts::E)];

// =============================================================================
// DOUBLE FUNCTIONS
// =============================================================================

const UNARY: &[(&str, fn(f64) -> f64)] = &[
    ("sqrt", f64::sqrt),
    ("cbrt", f64::cbrt),
    ("floor", f64::floor),
    ("ceil", f64::ceil),
    ("rint", f64::round_ties_even),
    ("sin", f64::sin),
    ("cos", f64::cos),
    ("tan", f64::tan),
    ("asin", f64::asin),
    ("acos", f64::acos),
    ("atan", f64::atan),
    ("exp", f64::exp),
    ("log", f64::ln),
    ("log10", f64::log10),
    ("signum", signum),
    ("toRadians", f64::to_radians),
    ("toDegrees", f64::to_degrees),
];

const BINARY: &[(&str, fn(f64, f64) -> f64)] = &[
    ("pow", f64::powf),
    ("atan2", f64::atan2),
    ("hypot", f64::hypot),
];

fn signum(x: f64) -> f64 {
    if x == 0.0 || x.is_nan() { x } else { x.signum() }
}

pub fn register(registry: &mut TypeRegistry) {
    let mut entry = TypeEntry::new("Math", TypeKind::Utility);

    for &(name, value) in CONSTANTS {
        entry = entry.with_static_field(name, Value::Double(value));
    }
    for &(name, f) in UNARY {
        entry = entry.with_static_function(name, move |args| {
            expect_arity(name, args, 1)?;
            Ok(Value::Double(f(double_arg(name, &args[0])?)))
        });
    }
    for &(name, f) in BINARY {
        entry = entry.with_static_function(name, move |args| {
            expect_arity(name, args, 2)?;
            Ok(Value::Double(f(double_arg(name, &args[0])?, double_arg(name, &args[1])?)))
        });
    }

    entry = entry
        .with_static_function("abs", abs)
        .with_static_function("min", |args| min_max("min", args))
        .with_static_function("max", |args| min_max("max", args))
        .with_static_function("round", round);

    super::register(registry, entry, "java.lang");
}

fn double_arg(callee: &str, value: &Value) -> Result<f64, RuntimeError> {
    as_f64(value).ok_or_else(|| argument_type(callee, "numeric", value))
}

// =============================================================================
// TYPE-PRESERVING FUNCTIONS
// =============================================================================

fn abs(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("abs", args, 1)?;
    Ok(match args[0] {
        Value::Short(v) => Value::Int((v as i32).abs()),
        Value::Int(v) => Value::Int(v.wrapping_abs()),
        Value::Long(v) => Value::Long(v.wrapping_abs()),
        Value::Float(v) => Value::Float(v.abs()),
        Value::Double(v) => Value::Double(v.abs()),
        ref other => return Err(argument_type("abs", "numeric", other)),
    })
}

fn min_max(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity(name, args, 2)?;
    let is_min = name == "min";
    let pick_float = |a: f64, b: f64| {
        if a.is_nan() || b.is_nan() {
            f64::NAN
        } else if is_min {
            a.min(b)
        } else {
            a.max(b)
        }
    };

    match promote(&args[0], &args[1]) {
        Some(Promoted::Int(a, b)) => Ok(Value::Int(if is_min { a.min(b) } else { a.max(b) })),
        Some(Promoted::Long(a, b)) => Ok(Value::Long(if is_min { a.min(b) } else { a.max(b) })),
        Some(Promoted::Float(a, b)) => Ok(Value::Float(pick_float(a as f64, b as f64) as f32)),
        Some(Promoted::Double(a, b)) => Ok(Value::Double(pick_float(a, b))),
        None => {
            let bad = if as_f64(&args[0]).is_none() { &args[0] } else { &args[1] };
            Err(argument_type(name, "numeric", bad))
        }
    }
}

/// `Math.round`: half up, `float` to `int` and everything else to `long`.
fn round(args: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity("round", args, 1)?;
    Ok(match args[0] {
        Value::Float(v) => Value::Int((v as f64 + 0.5).floor() as i32),
        ref other => Value::Long((double_arg("round", other)? + 0.5).floor() as i64),
    })
}

//! Operator evaluation on primitive values.
//!
//! Binary operators apply Java binary numeric promotion: if either operand is
//! `double` both are treated as `double`, otherwise `float`, otherwise
//! `long`, otherwise `int`. `short` always promotes to `int`.
//!
//! `&&` and `||` never reach this module; the interpreter short-circuits them.

use fnspec_core::{RuntimeError, Value};
use fnspec_parser::ast::{BinaryOp, UnaryOp};

use crate::convert::{as_f64, as_i32, as_i64, is_numeric};

/// Result of binary numeric promotion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Promoted {
    Int(i32, i32),
    Long(i64, i64),
    Float(f32, f32),
    Double(f64, f64),
}

pub(crate) fn promote(left: &Value, right: &Value) -> Option<Promoted> {
    if !is_numeric(left) || !is_numeric(right) {
        return None;
    }
    let is = |kind: fn(&Value) -> bool| kind(left) || kind(right);

    Some(if is(|v| matches!(v, Value::Double(_))) {
        Promoted::Double(as_f64(left)?, as_f64(right)?)
    } else if is(|v| matches!(v, Value::Float(_))) {
        Promoted::Float(as_f64(left)? as f32, as_f64(right)? as f32)
    } else if is(|v| matches!(v, Value::Long(_))) {
        Promoted::Long(as_i64(left)?, as_i64(right)?)
    } else {
        Promoted::Int(as_i32(left)?, as_i32(right)?)
    })
}

fn invalid(op: BinaryOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::InvalidOperands {
        op: op.as_str().to_string(),
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    }
}

/// Evaluate a non-short-circuit binary operator.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Add if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) => {
            Ok(Value::from(format!("{left}{right}")))
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            arithmetic(op, left, right)
        }
        BinaryOp::Equal => Ok(Value::Boolean(equals(left, right))),
        BinaryOp::NotEqual => Ok(Value::Boolean(!equals(left, right))),
        BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
            compare(op, left, right)
        }
        BinaryOp::BitwiseAnd | BinaryOp::BitwiseOr | BinaryOp::BitwiseXor => {
            bitwise(op, left, right)
        }
        BinaryOp::ShiftLeft | BinaryOp::ShiftRight | BinaryOp::ShiftRightUnsigned => {
            shift(op, left, right)
        }
        BinaryOp::LogicalAnd | BinaryOp::LogicalOr => match (left, right) {
            (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(if op == BinaryOp::LogicalAnd {
                *a && *b
            } else {
                *a || *b
            })),
            _ => Err(invalid(op, left, right)),
        },
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if left.is_null() || right.is_null() {
        return Err(RuntimeError::NullPointer {
            context: format!("operand of '{}' is null", op.as_str()),
        });
    }
    let promoted = promote(left, right).ok_or_else(|| invalid(op, left, right))?;

    Ok(match promoted {
        Promoted::Int(a, b) => Value::Int(match op {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
            BinaryOp::Div if b == 0 => return Err(RuntimeError::DivisionByZero),
            BinaryOp::Div => a.wrapping_div(b),
            BinaryOp::Mod if b == 0 => return Err(RuntimeError::DivisionByZero),
            _ => a.wrapping_rem(b),
        }),
        Promoted::Long(a, b) => Value::Long(match op {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
            BinaryOp::Div if b == 0 => return Err(RuntimeError::DivisionByZero),
            BinaryOp::Div => a.wrapping_div(b),
            BinaryOp::Mod if b == 0 => return Err(RuntimeError::DivisionByZero),
            _ => a.wrapping_rem(b),
        }),
        Promoted::Float(a, b) => Value::Float(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            _ => a % b,
        }),
        Promoted::Double(a, b) => Value::Double(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            _ => a % b,
        }),
    })
}

/// `==` inside a body.
///
/// Numeric operands compare by promoted value, booleans by value, and
/// everything else by identity.
pub fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        _ => match promote(left, right) {
            Some(Promoted::Int(a, b)) => a == b,
            Some(Promoted::Long(a, b)) => a == b,
            Some(Promoted::Float(a, b)) => a == b,
            Some(Promoted::Double(a, b)) => a == b,
            None => left.same(right),
        },
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    fn apply<T: PartialOrd>(op: BinaryOp, a: T, b: T) -> bool {
        match op {
            BinaryOp::Less => a < b,
            BinaryOp::LessEqual => a <= b,
            BinaryOp::Greater => a > b,
            _ => a >= b,
        }
    }

    let result = match promote(left, right) {
        Some(Promoted::Int(a, b)) => apply(op, a, b),
        Some(Promoted::Long(a, b)) => apply(op, a, b),
        Some(Promoted::Float(a, b)) => apply(op, a, b),
        Some(Promoted::Double(a, b)) => apply(op, a, b),
        None => return Err(invalid(op, left, right)),
    };
    Ok(Value::Boolean(result))
}

fn bitwise(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if let (Value::Boolean(a), Value::Boolean(b)) = (left, right) {
        return Ok(Value::Boolean(match op {
            BinaryOp::BitwiseAnd => a & b,
            BinaryOp::BitwiseOr => a | b,
            _ => a ^ b,
        }));
    }

    match promote(left, right) {
        Some(Promoted::Int(a, b)) => Ok(Value::Int(match op {
            BinaryOp::BitwiseAnd => a & b,
            BinaryOp::BitwiseOr => a | b,
            _ => a ^ b,
        })),
        Some(Promoted::Long(a, b)) => Ok(Value::Long(match op {
            BinaryOp::BitwiseAnd => a & b,
            BinaryOp::BitwiseOr => a | b,
            _ => a ^ b,
        })),
        _ => Err(invalid(op, left, right)),
    }
}

/// Shifts promote each operand separately; the result has the left operand's
/// promoted type and the distance is masked to its width.
fn shift(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let distance = as_i64(right).ok_or_else(|| invalid(op, left, right))?;

    match *left {
        Value::Short(_) | Value::Int(_) => {
            let value = as_i32(left).unwrap_or_default();
            let distance = (distance & 31) as u32;
            Ok(Value::Int(match op {
                BinaryOp::ShiftLeft => value.wrapping_shl(distance),
                BinaryOp::ShiftRight => value.wrapping_shr(distance),
                _ => ((value as u32) >> distance) as i32,
            }))
        }
        Value::Long(value) => {
            let distance = (distance & 63) as u32;
            Ok(Value::Long(match op {
                BinaryOp::ShiftLeft => value.wrapping_shl(distance),
                BinaryOp::ShiftRight => value.wrapping_shr(distance),
                _ => ((value as u64) >> distance) as i64,
            }))
        }
        _ => Err(invalid(op, left, right)),
    }
}

/// Evaluate a prefix operator other than `++`/`--`.
pub fn unary(op: UnaryOp, operand: &Value) -> Result<Value, RuntimeError> {
    let invalid = || RuntimeError::InvalidOperands {
        op: op.as_str().to_string(),
        left: operand.type_name().to_string(),
        right: String::new(),
    };

    match (op, operand) {
        (UnaryOp::LogicalNot, Value::Boolean(v)) => Ok(Value::Boolean(!v)),
        (UnaryOp::Neg, Value::Short(v)) => Ok(Value::Int(-(*v as i32))),
        (UnaryOp::Neg, Value::Int(v)) => Ok(Value::Int(v.wrapping_neg())),
        (UnaryOp::Neg, Value::Long(v)) => Ok(Value::Long(v.wrapping_neg())),
        (UnaryOp::Neg, Value::Float(v)) => Ok(Value::Float(-v)),
        (UnaryOp::Neg, Value::Double(v)) => Ok(Value::Double(-v)),
        (UnaryOp::Plus, Value::Short(v)) => Ok(Value::Int(*v as i32)),
        (UnaryOp::Plus, v) if is_numeric(v) => Ok(v.clone()),
        (UnaryOp::BitwiseNot, Value::Short(v)) => Ok(Value::Int(!(*v as i32))),
        (UnaryOp::BitwiseNot, Value::Int(v)) => Ok(Value::Int(!v)),
        (UnaryOp::BitwiseNot, Value::Long(v)) => Ok(Value::Long(!v)),
        (_, Value::Null) => Err(RuntimeError::NullPointer {
            context: format!("operand of '{}' is null", op.as_str()),
        }),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(op: BinaryOp, left: impl Into<Value>, right: impl Into<Value>) -> Value {
        binary(op, &left.into(), &right.into()).unwrap()
    }

    // ========================================================================
    // Promotion
    // ========================================================================

    #[test]
    fn int_plus_double_is_double() {
        assert_eq!(eval(BinaryOp::Add, 1, 2.5), Value::Double(3.5));
        assert_eq!(eval(BinaryOp::Add, 1i64, 2), Value::Long(3));
        assert_eq!(eval(BinaryOp::Mul, 2.0f32, 3), Value::Float(6.0));
        assert_eq!(eval(BinaryOp::Add, 1i16, 1i16), Value::Int(2));
    }

    #[test]
    fn integer_division_truncates() {
        assert_eq!(eval(BinaryOp::Div, 7, 2), Value::Int(3));
        assert_eq!(eval(BinaryOp::Mod, -7, 2), Value::Int(-1));
        assert_eq!(eval(BinaryOp::Div, 7.0, 2), Value::Double(3.5));
        assert_eq!(eval(BinaryOp::Div, i32::MIN, -1), Value::Int(i32::MIN));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(
            binary(BinaryOp::Div, &Value::Int(1), &Value::Int(0)),
            Err(RuntimeError::DivisionByZero)
        );
        assert_eq!(
            binary(BinaryOp::Mod, &Value::Long(1), &Value::Int(0)),
            Err(RuntimeError::DivisionByZero)
        );
        assert!(matches!(eval(BinaryOp::Div, 1.0, 0), Value::Double(v) if v.is_infinite()));
    }

    #[test]
    fn overflow_wraps() {
        assert_eq!(eval(BinaryOp::Add, i32::MAX, 1), Value::Int(i32::MIN));
    }

    // ========================================================================
    // Comparison and equality
    // ========================================================================

    #[test]
    fn mixed_comparisons() {
        assert_eq!(eval(BinaryOp::Less, 3, 3.5), Value::Boolean(true));
        assert_eq!(eval(BinaryOp::GreaterEqual, 4i64, 4), Value::Boolean(true));
        assert_eq!(eval(BinaryOp::Greater, f64::NAN, 1), Value::Boolean(false));
        assert!(binary(BinaryOp::Less, &Value::Boolean(true), &Value::Int(1)).is_err());
    }

    #[test]
    fn equality_rules() {
        assert!(equals(&Value::Int(2), &Value::Double(2.0)));
        assert!(equals(&Value::Boolean(true), &Value::Boolean(true)));
        assert!(equals(&Value::Null, &Value::Null));
        assert!(!equals(&Value::from("a"), &Value::from("a")));
        let s = Value::from("a");
        assert!(equals(&s, &s.clone()));
        assert_eq!(eval(BinaryOp::NotEqual, 1, 2), Value::Boolean(true));
    }

    // ========================================================================
    // Strings, bits and unary
    // ========================================================================

    #[test]
    fn string_concatenation() {
        assert_eq!(eval(BinaryOp::Add, "x=", 1.5), Value::from("x=1.5"));
        assert_eq!(eval(BinaryOp::Add, 2, "!"), Value::from("2!"));
        assert_eq!(binary(BinaryOp::Add, &Value::from("a"), &Value::Null).unwrap(), Value::from("anull"));
    }

    #[test]
    fn bitwise_and_shifts() {
        assert_eq!(eval(BinaryOp::BitwiseAnd, 6, 3), Value::Int(2));
        assert_eq!(eval(BinaryOp::BitwiseXor, true, false), Value::Boolean(true));
        assert_eq!(eval(BinaryOp::ShiftLeft, 1, 33), Value::Int(2));
        assert_eq!(eval(BinaryOp::ShiftRight, -8, 1), Value::Int(-4));
        assert_eq!(eval(BinaryOp::ShiftRightUnsigned, -1, 28), Value::Int(15));
        assert_eq!(eval(BinaryOp::ShiftLeft, 1i64, 40), Value::Long(1 << 40));
        assert!(binary(BinaryOp::BitwiseOr, &Value::Double(1.0), &Value::Int(1)).is_err());
    }

    #[test]
    fn unary_operators() {
        assert_eq!(unary(UnaryOp::Neg, &Value::Double(2.0)).unwrap(), Value::Double(-2.0));
        assert_eq!(unary(UnaryOp::Neg, &Value::Short(2)).unwrap(), Value::Int(-2));
        assert_eq!(unary(UnaryOp::LogicalNot, &Value::Boolean(false)).unwrap(), Value::Boolean(true));
        assert_eq!(unary(UnaryOp::BitwiseNot, &Value::Int(0)).unwrap(), Value::Int(-1));
        assert!(unary(UnaryOp::LogicalNot, &Value::Int(1)).is_err());
        assert!(matches!(
            unary(UnaryOp::Neg, &Value::Null),
            Err(RuntimeError::NullPointer { .. })
        ));
    }

    #[test]
    fn null_arithmetic() {
        assert!(matches!(
            binary(BinaryOp::Sub, &Value::Null, &Value::Int(1)),
            Err(RuntimeError::NullPointer { .. })
        ));
    }
}

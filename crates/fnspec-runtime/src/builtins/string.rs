//! `String`.
//!
//! Indices (`substring`, `indexOf`, `length`) count characters, not bytes.

use std::sync::Arc;

use fnspec_core::{RuntimeError, Value};

use super::{expect_arity, int_arg, str_arg, unknown_method};
use crate::registry::{TypeEntry, TypeKind, TypeRegistry};

pub fn register(registry: &mut TypeRegistry) {
    let entry = TypeEntry::new("String", TypeKind::String).with_static_function("valueOf", |args| {
        expect_arity("valueOf", args, 1)?;
        Ok(Value::from(args[0].to_string()))
    });
    super::register(registry, entry, "java.lang");
}

/// Byte offset of the `index`th character, allowing one past the end.
fn byte_offset(s: &str, index: i32) -> Option<usize> {
    let index = usize::try_from(index).ok()?;
    if index == 0 {
        return Some(0);
    }
    s.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(s.len()))
        .nth(index)
}

fn out_of_bounds(s: &str, index: i32) -> RuntimeError {
    RuntimeError::IndexOutOfBounds {
        index: index as i64,
        len: s.chars().count(),
    }
}

pub fn call_method(s: &Arc<str>, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    let arity = |n| expect_arity(name, args, n);

    match name {
        "length" => {
            arity(0)?;
            Ok(Value::Int(s.chars().count() as i32))
        }
        "isEmpty" => {
            arity(0)?;
            Ok(Value::Boolean(s.is_empty()))
        }
        "toUpperCase" => {
            arity(0)?;
            Ok(Value::from(s.to_uppercase()))
        }
        "toLowerCase" => {
            arity(0)?;
            Ok(Value::from(s.to_lowercase()))
        }
        "trim" => {
            arity(0)?;
            Ok(Value::from(s.trim()))
        }
        "concat" => {
            arity(1)?;
            Ok(Value::from(format!("{s}{}", str_arg(name, &args[0])?)))
        }
        "contains" => {
            arity(1)?;
            Ok(Value::Boolean(s.contains(str_arg(name, &args[0])?)))
        }
        "startsWith" => {
            arity(1)?;
            Ok(Value::Boolean(s.starts_with(str_arg(name, &args[0])?)))
        }
        "endsWith" => {
            arity(1)?;
            Ok(Value::Boolean(s.ends_with(str_arg(name, &args[0])?)))
        }
        "equalsIgnoreCase" => {
            arity(1)?;
            Ok(Value::Boolean(match &args[0] {
                Value::Str(other) => s.to_lowercase() == other.to_lowercase(),
                _ => false,
            }))
        }
        "indexOf" => {
            arity(1)?;
            let needle = str_arg(name, &args[0])?;
            Ok(Value::Int(match s.find(needle) {
                Some(offset) => s[..offset].chars().count() as i32,
                None => -1,
            }))
        }
        "substring" => {
            let (begin, end) = match args {
                [begin] => (int_arg(name, begin)?, None),
                [begin, end] => (int_arg(name, begin)?, Some(int_arg(name, end)?)),
                _ => {
                    return Err(RuntimeError::ArgumentCount {
                        callee: name.to_string(),
                        expected: 1,
                        found: args.len(),
                    });
                }
            };
            let start = byte_offset(s, begin).ok_or_else(|| out_of_bounds(s, begin))?;
            let stop = match end {
                Some(end) => byte_offset(s, end).ok_or_else(|| out_of_bounds(s, end))?,
                None => s.len(),
            };
            if start > stop {
                return Err(out_of_bounds(s, begin));
            }
            Ok(Value::from(&s[start..stop]))
        }
        _ => Err(unknown_method("String", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(s: &str, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        call_method(&Arc::from(s), name, args)
    }

    #[test]
    fn queries() {
        assert_eq!(call("héllo", "length", &[]).unwrap(), Value::Int(5));
        assert_eq!(call("", "isEmpty", &[]).unwrap(), Value::Boolean(true));
        assert_eq!(call("abc", "contains", &[Value::from("bc")]).unwrap(), Value::Boolean(true));
        assert_eq!(call("abc", "startsWith", &[Value::from("b")]).unwrap(), Value::Boolean(false));
        assert_eq!(call("héllo", "indexOf", &[Value::from("l")]).unwrap(), Value::Int(2));
        assert_eq!(call("abc", "indexOf", &[Value::from("z")]).unwrap(), Value::Int(-1));
        assert_eq!(call("AbC", "equalsIgnoreCase", &[Value::from("abc")]).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn transforms() {
        assert_eq!(call(" a ", "trim", &[]).unwrap(), Value::from("a"));
        assert_eq!(call("a", "concat", &[Value::from("b")]).unwrap(), Value::from("ab"));
        assert_eq!(call("ab", "toUpperCase", &[]).unwrap(), Value::from("AB"));
        assert!(call("a", "concat", &[Value::Int(1)]).is_err());
    }

    #[test]
    fn substrings() {
        assert_eq!(call("héllo", "substring", &[Value::Int(1), Value::Int(3)]).unwrap(), Value::from("él"));
        assert_eq!(call("hello", "substring", &[Value::Int(5)]).unwrap(), Value::from(""));
        assert!(matches!(
            call("hello", "substring", &[Value::Int(6)]),
            Err(RuntimeError::IndexOutOfBounds { index: 6, len: 5 })
        ));
        assert!(call("hello", "substring", &[Value::Int(3), Value::Int(1)]).is_err());
        assert!(call("hello", "substring", &[Value::Int(-1)]).is_err());
        assert!(matches!(
            call("hello", "substring", &[]),
            Err(RuntimeError::ArgumentCount { .. })
        ));
    }

    #[test]
    fn value_of() {
        let registry = TypeRegistry::with_builtins();
        let value_of = registry.get("java.lang.String").unwrap().static_function("valueOf").unwrap();
        assert_eq!(value_of.call(&[Value::Double(1.5)]).unwrap(), Value::from("1.5"));
    }
}

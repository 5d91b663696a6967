//! `List` and `Iterator`.
//!
//! Lists are immutable snapshots supplied by the host. `iterator()` hands
//! out a fresh [`ListIterator`] that lives as long as the body keeps it in a
//! local, so concurrent calls never share cursor state.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fnspec_core::{HostObject, RuntimeError, Value};

use super::{expect_arity, int_arg, unknown_method};
use crate::registry::{TypeEntry, TypeKind, TypeRegistry};

/// Type name reported by iterator objects.
pub const ITERATOR_TYPE_NAME: &str = "Iterator";

pub fn register(registry: &mut TypeRegistry) {
    super::register(registry, TypeEntry::new("List", TypeKind::List), "java.util");
    super::register(
        registry,
        TypeEntry::new(ITERATOR_TYPE_NAME, TypeKind::Iterator),
        "java.util",
    );
}

pub fn call_method(items: &Arc<[Value]>, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "size" => {
            expect_arity(name, args, 0)?;
            Ok(Value::Int(items.len() as i32))
        }
        "isEmpty" => {
            expect_arity(name, args, 0)?;
            Ok(Value::Boolean(items.is_empty()))
        }
        "get" => {
            expect_arity(name, args, 1)?;
            let index = int_arg(name, &args[0])?;
            usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .ok_or(RuntimeError::IndexOutOfBounds {
                    index: index as i64,
                    len: items.len(),
                })
        }
        "contains" => {
            expect_arity(name, args, 1)?;
            Ok(Value::Boolean(items.contains(&args[0])))
        }
        "indexOf" => {
            expect_arity(name, args, 1)?;
            let position = items.iter().position(|item| *item == args[0]);
            Ok(Value::Int(position.map_or(-1, |i| i as i32)))
        }
        "iterator" => {
            expect_arity(name, args, 0)?;
            Ok(Value::object(ListIterator::new(Arc::clone(items))))
        }
        _ => Err(unknown_method("List", name)),
    }
}

/// Forward cursor over a list, exposed to bodies as `Iterator`.
#[derive(Debug)]
pub struct ListIterator {
    items: Arc<[Value]>,
    cursor: AtomicUsize,
}

impl ListIterator {
    pub fn new(items: Arc<[Value]>) -> Self {
        Self {
            items,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl HostObject for ListIterator {
    fn type_name(&self) -> &str {
        ITERATOR_TYPE_NAME
    }

    fn call_method(&self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        match name {
            "hasNext" => {
                expect_arity(name, args, 0)?;
                Ok(Value::Boolean(self.cursor.load(Ordering::Relaxed) < self.items.len()))
            }
            "next" => {
                expect_arity(name, args, 0)?;
                let index = self.cursor.fetch_add(1, Ordering::Relaxed);
                match self.items.get(index) {
                    Some(item) => Ok(item.clone()),
                    None => {
                        self.cursor.store(self.items.len(), Ordering::Relaxed);
                        Err(RuntimeError::native("no more elements in iteration"))
                    }
                }
            }
            _ => Err(unknown_method(ITERATOR_TYPE_NAME, name)),
        }
    }

    fn to_display_string(&self) -> String {
        format!("Iterator@{}", self.cursor.load(Ordering::Relaxed))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

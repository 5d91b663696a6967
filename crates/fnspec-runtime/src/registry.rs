//! TypeRegistry - the types a body may name.
//!
//! Bodies refer to types in casts (`(Double) x`), declarations
//! (`java.util.Iterator it = ...`), static calls (`Math.abs(x)`) and `new`
//! expressions. Every one of those names is resolved against a
//! [`TypeRegistry`] when the body is compiled; nothing is looked up at call
//! time.
//!
//! # Storage Model
//!
//! - Entries are stored once, behind an `Arc`, and indexed by every name they
//!   answer to. A builtin such as `List` is reachable as `List` and
//!   `java.util.List`; a host type registered as `geom.Point` is reachable as
//!   `geom.Point` and, unless something else already claimed it, `Point`.
//! - Lookup is exact. There is no import or package search.
//!
//! # Thread Safety
//!
//! Registration takes `&mut self`; afterwards the registry is shared behind
//! an `Arc` and only read.
//!
//! # Example
//!
//! ```
//! use fnspec_core::Value;
//! use fnspec_runtime::{TypeEntry, TypeRegistry};
//!
//! let mut registry = TypeRegistry::with_builtins();
//! registry
//!     .register(
//!         TypeEntry::host("geom.Origin")
//!             .with_static_field("ZERO", Value::Int(0)),
//!     )
//!     .unwrap();
//!
//! assert!(registry.get("java.lang.Math").is_some());
//! assert!(registry.get("Origin").is_some());
//! assert!(registry.get("Point").is_none());
//! ```

use std::fmt;
use std::sync::Arc;

use fnspec_core::{PrimitiveKind, RuntimeError, Value};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::builtins;

// ============================================================================
// Native functions
// ============================================================================

type NativeCallable = dyn Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync;

/// A Rust function callable from a body.
///
/// Used for constructors and static functions. The callable receives the
/// evaluated arguments and checks their count and types itself.
#[derive(Clone)]
pub struct NativeFn {
    inner: Arc<NativeCallable>,
}

impl NativeFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    #[inline]
    pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        (self.inner)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NativeFn")
    }
}

// ============================================================================
// Type entries
// ============================================================================

/// What a registered type is, which decides the values it admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// `Object`: admits everything.
    Object,
    String,
    /// One of the six boxed primitive types.
    Boxed(PrimitiveKind),
    List,
    Iterator,
    /// A holder of static members only, such as `Math`.
    Utility,
    /// A type supplied by the host application.
    Host,
}

/// A type known to the body compiler.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    name: String,
    simple_name: String,
    kind: TypeKind,
    constructor: Option<NativeFn>,
    static_functions: FxHashMap<String, NativeFn>,
    static_fields: FxHashMap<String, Value>,
}

impl TypeEntry {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        let name = name.into();
        let simple_name = name.rsplit('.').next().unwrap_or(&name).to_string();
        Self {
            name,
            simple_name,
            kind,
            constructor: None,
            static_functions: FxHashMap::default(),
            static_fields: FxHashMap::default(),
        }
    }

    /// Start describing a host type.
    pub fn host(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Host)
    }

    /// Make the type constructible with `new`.
    pub fn with_constructor<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        self.constructor = Some(NativeFn::new(f));
        self
    }

    pub fn with_static_function<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        self.static_functions.insert(name.into(), NativeFn::new(f));
        self
    }

    pub fn with_static_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.static_fields.insert(name.into(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last segment of the name: `Point` for `java.awt.Point`.
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn constructor(&self) -> Option<&NativeFn> {
        self.constructor.as_ref()
    }

    pub fn static_function(&self, name: &str) -> Option<&NativeFn> {
        self.static_functions.get(name)
    }

    pub fn static_field(&self, name: &str) -> Option<&Value> {
        self.static_fields.get(name)
    }

    /// Whether a value may be viewed as this type, i.e. whether a cast or a
    /// typed local accepts it. `null` is admitted by every reference type.
    pub fn admits(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self.kind {
            TypeKind::Object => true,
            TypeKind::String => matches!(value, Value::Str(_)),
            TypeKind::Boxed(kind) => value.primitive_kind() == Some(kind),
            TypeKind::List => matches!(value, Value::List(_)),
            TypeKind::Iterator => {
                matches!(value, Value::Object(obj) if obj.type_name() == builtins::list::ITERATOR_TYPE_NAME)
            }
            TypeKind::Utility => false,
            TypeKind::Host => match value {
                Value::Object(obj) => obj.type_name() == self.name || obj.type_name() == self.simple_name,
                _ => false,
            },
        }
    }

    /// Check a value against this type, as a reference cast does.
    pub fn check(&self, value: Value) -> Result<Value, RuntimeError> {
        if self.admits(&value) {
            Ok(value)
        } else {
            Err(RuntimeError::ClassCast {
                expected: self.name.clone(),
                found: value.type_name().to_string(),
            })
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Registration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("type '{0}' is already registered")]
    DuplicateType(String),

    #[error("type not found: {0}")]
    TypeNotFound(String),
}

/// Name-indexed store of [`TypeEntry`] values.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: FxHashMap<String, Arc<TypeEntry>>,
}

impl TypeRegistry {
    /// Create an empty registry. Bodies compiled against it cannot name any
    /// type, not even `Object`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with `Object`, `String`, the boxed primitives,
    /// `Math`, `List` and `Iterator`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Register a type under its name, plus its simple name when the name is
    /// dotted and the simple name is still free.
    pub fn register(&mut self, entry: TypeEntry) -> Result<Arc<TypeEntry>, RegistrationError> {
        if self.types.contains_key(entry.name()) {
            return Err(RegistrationError::DuplicateType(entry.name().to_string()));
        }
        let entry = Arc::new(entry);
        self.types.insert(entry.name().to_string(), Arc::clone(&entry));
        if entry.simple_name() != entry.name() && !self.types.contains_key(entry.simple_name()) {
            self.types.insert(entry.simple_name().to_string(), Arc::clone(&entry));
        }
        Ok(entry)
    }

    /// Make an already registered type reachable under another name.
    pub fn alias(&mut self, alias: impl Into<String>, target: &str) -> Result<(), RegistrationError> {
        let alias = alias.into();
        if self.types.contains_key(&alias) {
            return Err(RegistrationError::DuplicateType(alias));
        }
        let entry = self
            .types
            .get(target)
            .cloned()
            .ok_or_else(|| RegistrationError::TypeNotFound(target.to_string()))?;
        self.types.insert(alias, entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeEntry>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Every name a type can be looked up by, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

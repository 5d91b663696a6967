//! Primitive return kinds and their boxed counterparts.
//!
//! A function may return one of six primitive kinds; every argument, however,
//! travels through the argument array in its boxed form. [`TypeTable`] is the
//! process-wide, read-only mapping between the two spellings.
//!
//! ```
//! use fnspec_core::{PrimitiveKind, TypeTable};
//!
//! let table = TypeTable::global();
//! assert_eq!(table.boxed_name_of("int"), Some("Integer"));
//! assert_eq!(table.primitive_name_of("Double"), Some("double"));
//! assert_eq!(table.primitive("java.util.List"), None);
//! assert_eq!(PrimitiveKind::Long.entry_point_name(), "evaluateToLong");
//! ```

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// The six supported primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Double,
    Float,
    Int,
    Long,
    Boolean,
    Short,
}

impl PrimitiveKind {
    /// Every kind, in entry-point declaration order.
    pub const ALL: [PrimitiveKind; 6] = [
        PrimitiveKind::Double,
        PrimitiveKind::Float,
        PrimitiveKind::Boolean,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Short,
    ];

    /// Primitive spelling, as written in a return type.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Double => "double",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Short => "short",
        }
    }

    /// Boxed spelling, as written in a parameter declaration.
    pub const fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Int => "Integer",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Short => "Short",
        }
    }

    /// Accessor that unboxes a value of this kind, e.g. `doubleValue`.
    pub const fn unbox_method(self) -> &'static str {
        match self {
            PrimitiveKind::Double => "doubleValue",
            PrimitiveKind::Float => "floatValue",
            PrimitiveKind::Int => "intValue",
            PrimitiveKind::Long => "longValue",
            PrimitiveKind::Boolean => "booleanValue",
            PrimitiveKind::Short => "shortValue",
        }
    }

    /// Name of the typed entry point that returns this kind.
    pub const fn entry_point_name(self) -> &'static str {
        match self {
            PrimitiveKind::Double => "evaluateToDouble",
            PrimitiveKind::Float => "evaluateToFloat",
            PrimitiveKind::Int => "evaluateToInteger",
            PrimitiveKind::Long => "evaluateToLong",
            PrimitiveKind::Boolean => "evaluateToBoolean",
            PrimitiveKind::Short => "evaluateToShort",
        }
    }

    /// Whether this kind is numeric (everything except `boolean`).
    pub const fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveKind::Boolean)
    }

    /// Look up a kind by its primitive spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        TypeTable::global().primitive(name)
    }

    /// Look up a kind by its boxed spelling.
    pub fn from_boxed_name(name: &str) -> Option<Self> {
        TypeTable::global().boxed(name)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static TYPE_TABLE: LazyLock<TypeTable> = LazyLock::new(TypeTable::build);

/// Bidirectional primitive/boxed name table.
///
/// Built once on first use and shared immutably afterwards.
#[derive(Debug)]
pub struct TypeTable {
    by_primitive: FxHashMap<&'static str, PrimitiveKind>,
    by_boxed: FxHashMap<&'static str, PrimitiveKind>,
}

impl TypeTable {
    /// The process-wide table.
    pub fn global() -> &'static TypeTable {
        &TYPE_TABLE
    }

    fn build() -> Self {
        let mut by_primitive = FxHashMap::default();
        let mut by_boxed = FxHashMap::default();
        for kind in PrimitiveKind::ALL {
            by_primitive.insert(kind.name(), kind);
            by_boxed.insert(kind.boxed_name(), kind);
        }
        Self {
            by_primitive,
            by_boxed,
        }
    }

    /// Kind registered under a primitive spelling (`"double"`).
    pub fn primitive(&self, name: &str) -> Option<PrimitiveKind> {
        self.by_primitive.get(name).copied()
    }

    /// Kind registered under a boxed spelling (`"Double"`).
    pub fn boxed(&self, name: &str) -> Option<PrimitiveKind> {
        self.by_boxed.get(name).copied()
    }

    /// `"int"` → `"Integer"`.
    pub fn boxed_name_of(&self, primitive: &str) -> Option<&'static str> {
        self.primitive(primitive).map(PrimitiveKind::boxed_name)
    }

    /// `"Integer"` → `"int"`.
    pub fn primitive_name_of(&self, boxed: &str) -> Option<&'static str> {
        self.boxed(boxed).map(PrimitiveKind::name)
    }

    pub fn is_primitive(&self, name: &str) -> bool {
        self.by_primitive.contains_key(name)
    }

    pub fn is_boxed(&self, name: &str) -> bool {
        self.by_boxed.contains_key(name)
    }
}

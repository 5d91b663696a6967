//! The lowered program: an owned, slot-resolved tree ready to interpret.
//!
//! Lowering removes everything the interpreter should not have to think
//! about at call time. Names are gone: locals are frame slots, types are
//! [`TypeEntry`] handles, and static calls and constructors hold the
//! [`NativeFn`] they resolve to. The tree owns its data, so it does not
//! borrow from the parse arena.

use std::sync::Arc;

use fnspec_core::{PrimitiveKind, Value};
use fnspec_parser::ast::{BinaryOp, UnaryOp};

use crate::registry::{NativeFn, TypeEntry};

/// Declared type of a local, or of the value a body returns.
#[derive(Debug, Clone)]
pub enum LocalType {
    Primitive(PrimitiveKind),
    Reference(Arc<TypeEntry>),
}

impl LocalType {
    /// Value a local holds before anything is assigned to it.
    pub fn default_value(&self) -> Value {
        match self {
            LocalType::Primitive(PrimitiveKind::Boolean) => Value::Boolean(false),
            LocalType::Primitive(PrimitiveKind::Double) => Value::Double(0.0),
            LocalType::Primitive(PrimitiveKind::Float) => Value::Float(0.0),
            LocalType::Primitive(PrimitiveKind::Long) => Value::Long(0),
            LocalType::Primitive(PrimitiveKind::Int) => Value::Int(0),
            LocalType::Primitive(PrimitiveKind::Short) => Value::Short(0),
            LocalType::Reference(_) => Value::Null,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            LocalType::Primitive(kind) => kind.name(),
            LocalType::Reference(entry) => entry.name(),
        }
    }
}

/// Target of a cast expression.
pub type CastTarget = LocalType;

/// Something that can be assigned to.
#[derive(Debug, Clone)]
pub enum Place {
    Local { slot: usize, ty: LocalType },
    Field { object: Box<Expr>, name: String },
}

#[derive(Debug, Clone)]
pub enum Expr {
    Const(Value),
    Local(usize),
    /// `args[index]`
    Arg(Box<Expr>),
    /// `args.length`
    ArgCount,
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// Every binary operator, including the short-circuiting ones.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Cast {
        target: CastTarget,
        expr: Box<Expr>,
    },
    Field {
        object: Box<Expr>,
        name: String,
    },
    MethodCall {
        receiver: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
    StaticCall {
        func: NativeFn,
        name: String,
        args: Vec<Expr>,
    },
    New {
        ctor: NativeFn,
        type_name: String,
        args: Vec<Expr>,
    },
    /// Plain (`op == None`) or compound assignment.
    Assign {
        place: Place,
        op: Option<BinaryOp>,
        value: Box<Expr>,
    },
    /// `++`/`--`, prefix or postfix.
    IncDec {
        place: Place,
        delta: i32,
        prefix: bool,
    },
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    /// A local declaration; `init` is already the default value when the
    /// source gave none.
    Local {
        slot: usize,
        ty: LocalType,
        init: Expr,
    },
    Return(Expr),
    If {
        condition: Expr,
        then_stmt: Box<Stmt>,
        else_stmt: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Vec<Stmt>,
        condition: Option<Expr>,
        update: Vec<Expr>,
        body: Box<Stmt>,
    },
    Block(Vec<Stmt>),
    Break,
    Continue,
}

/// A compiled body.
#[derive(Debug, Clone)]
pub struct Program {
    pub(crate) stmts: Vec<Stmt>,
    pub(crate) frame_size: usize,
    /// Conversion applied to every returned value.
    pub(crate) returns: LocalType,
}

impl Program {
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    /// Number of local slots a call needs.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn return_type(&self) -> &LocalType {
        &self.returns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;

    #[test]
    fn default_values() {
        assert_eq!(LocalType::Primitive(PrimitiveKind::Double).default_value(), Value::Double(0.0));
        assert_eq!(LocalType::Primitive(PrimitiveKind::Boolean).default_value(), Value::Boolean(false));
        let registry = TypeRegistry::with_builtins();
        let object = LocalType::Reference(Arc::clone(registry.get("Object").unwrap()));
        assert_eq!(object.default_value(), Value::Null);
        assert_eq!(object.name(), "Object");
    }
}

//! Tree-walking evaluation of a [`Program`].
//!
//! Each call gets its own [`Frame`], so a program can be evaluated from any
//! number of threads at once. Control flow other than normal completion
//! travels up as a [`Flow`] value rather than as an error.

use fnspec_core::{RuntimeError, Value};
use fnspec_parser::ast::BinaryOp;

use crate::builtins;
use crate::compiler::{Expr, LocalType, Place, Program, Stmt};
use crate::convert;
use crate::operators;

/// How a statement finished.
#[derive(Debug)]
enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

/// Per-call state: the locals and the caller's arguments.
struct Frame<'a> {
    locals: Vec<Value>,
    args: &'a [Value],
}

/// Run `program` with `args` bound to the argument array.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn run(program: &Program, args: &[Value]) -> Result<Value, RuntimeError> {
    let mut frame = Frame {
        locals: vec![Value::Null; program.frame_size()],
        args,
    };

    for stmt in program.stmts() {
        if let Flow::Return(value) = frame.exec(stmt)? {
            return coerce(program.return_type(), value);
        }
    }
    Err(RuntimeError::MissingReturn)
}

/// Conversion applied when a value is stored into a slot of type `ty`.
fn coerce(ty: &LocalType, value: Value) -> Result<Value, RuntimeError> {
    match ty {
        LocalType::Primitive(kind) => convert::widen(&value, *kind),
        LocalType::Reference(entry) => entry.check(value),
    }
}

fn truthy(value: &Value) -> Result<bool, RuntimeError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Null => Err(RuntimeError::NullPointer {
            context: "condition".to_string(),
        }),
        other => Err(RuntimeError::ClassCast {
            expected: "boolean".to_string(),
            found: other.type_name().to_string(),
        }),
    }
}

impl Frame<'_> {
    // ========================================================================
    // Statements
    // ========================================================================

    fn exec(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            }
            Stmt::Local { slot, ty, init } => {
                let value = self.eval(init)?;
                self.locals[*slot] = coerce(ty, value)?;
                Ok(Flow::Normal)
            }
            Stmt::Return(expr) => Ok(Flow::Return(self.eval(expr)?)),
            Stmt::If {
                condition,
                then_stmt,
                else_stmt,
            } => {
                if truthy(&self.eval(condition)?)? {
                    self.exec(then_stmt)
                } else if let Some(else_stmt) = else_stmt {
                    self.exec(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::While { condition, body } => {
                while truthy(&self.eval(condition)?)? {
                    match self.exec(body)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                for stmt in init {
                    self.exec(stmt)?;
                }
                loop {
                    if let Some(condition) = condition {
                        if !truthy(&self.eval(condition)?)? {
                            break;
                        }
                    }
                    match self.exec(body)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                    for expr in update {
                        self.eval(expr)?;
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    match self.exec(stmt)? {
                        Flow::Normal => {}
                        flow => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Break => Ok(Flow::Break),
            Stmt::Continue => Ok(Flow::Continue),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn eval(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Const(value) => Ok(value.clone()),
            Expr::Local(slot) => Ok(self.locals[*slot].clone()),
            Expr::Arg(index) => {
                let index = self.eval(index)?;
                self.arg(&index)
            }
            Expr::ArgCount => Ok(Value::Int(self.args.len() as i32)),
            Expr::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                operators::unary(*op, &operand)
            }
            Expr::Binary {
                op: BinaryOp::LogicalAnd,
                left,
                right,
            } => {
                if !truthy(&self.eval(left)?)? {
                    return Ok(Value::Boolean(false));
                }
                Ok(Value::Boolean(truthy(&self.eval(right)?)?))
            }
            Expr::Binary {
                op: BinaryOp::LogicalOr,
                left,
                right,
            } => {
                if truthy(&self.eval(left)?)? {
                    return Ok(Value::Boolean(true));
                }
                Ok(Value::Boolean(truthy(&self.eval(right)?)?))
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                operators::binary(*op, &left, &right)
            }
            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                if truthy(&self.eval(condition)?)? {
                    self.eval(then_expr)
                } else {
                    self.eval(else_expr)
                }
            }
            Expr::Cast { target, expr } => {
                let value = self.eval(expr)?;
                match target {
                    LocalType::Primitive(kind) => convert::cast(&value, *kind),
                    LocalType::Reference(entry) => entry.check(value),
                }
            }
            Expr::Field { object, name } => {
                let object = self.eval(object)?;
                builtins::get_field(&object, name)
            }
            Expr::MethodCall { receiver, name, args } => {
                let receiver = self.eval(receiver)?;
                let args = self.eval_all(args)?;
                builtins::call_method(&receiver, name, &args)
            }
            Expr::StaticCall { func, args, .. } => {
                let args = self.eval_all(args)?;
                func.call(&args)
            }
            Expr::New { ctor, args, .. } => {
                let args = self.eval_all(args)?;
                ctor.call(&args)
            }
            Expr::Assign { place, op, value } => self.assign(place, *op, value),
            Expr::IncDec { place, delta, prefix } => self.inc_dec(place, *delta, *prefix),
        }
    }

    fn eval_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, RuntimeError> {
        exprs.iter().map(|expr| self.eval(expr)).collect()
    }

    fn arg(&self, index: &Value) -> Result<Value, RuntimeError> {
        let index = match index {
            Value::Short(_) | Value::Int(_) => convert::as_i64(index).unwrap_or_default(),
            other => {
                return Err(RuntimeError::ClassCast {
                    expected: "int".to_string(),
                    found: other.type_name().to_string(),
                });
            }
        };
        usize::try_from(index)
            .ok()
            .and_then(|i| self.args.get(i))
            .cloned()
            .ok_or(RuntimeError::IndexOutOfBounds {
                index,
                len: self.args.len(),
            })
    }

    // ========================================================================
    // Assignment
    // ========================================================================

    fn assign(&mut self, place: &Place, op: Option<BinaryOp>, value: &Expr) -> Result<Value, RuntimeError> {
        match place {
            Place::Local { slot, ty } => {
                let stored = match op {
                    None => coerce(ty, self.eval(value)?)?,
                    Some(op) => {
                        let current = self.locals[*slot].clone();
                        let rhs = self.eval(value)?;
                        let result = operators::binary(op, &current, &rhs)?;
                        compound_store(ty, result)?
                    }
                };
                self.locals[*slot] = stored.clone();
                Ok(stored)
            }
            Place::Field { object, name } => {
                let object = self.eval(object)?;
                let stored = match op {
                    None => self.eval(value)?,
                    Some(op) => {
                        let current = builtins::get_field(&object, name)?;
                        let rhs = self.eval(value)?;
                        let result = operators::binary(op, &current, &rhs)?;
                        match current.primitive_kind() {
                            Some(kind) => convert::cast(&result, kind)?,
                            None => result,
                        }
                    }
                };
                builtins::set_field(&object, name, stored.clone())?;
                Ok(stored)
            }
        }
    }

    fn inc_dec(&mut self, place: &Place, delta: i32, prefix: bool) -> Result<Value, RuntimeError> {
        let (old, new) = match place {
            Place::Local { slot, .. } => {
                let old = self.locals[*slot].clone();
                let new = convert::step(&old, delta)?;
                self.locals[*slot] = new.clone();
                (old, new)
            }
            Place::Field { object, name } => {
                let object = self.eval(object)?;
                let old = builtins::get_field(&object, name)?;
                let new = convert::step(&old, delta)?;
                builtins::set_field(&object, name, new.clone())?;
                (old, new)
            }
        };
        Ok(if prefix { new } else { old })
    }
}

/// Compound assignment narrows back to the target's type, as `x += y`
/// means `x = (T) (x + y)`.
fn compound_store(ty: &LocalType, result: Value) -> Result<Value, RuntimeError> {
    match ty {
        LocalType::Primitive(kind) => convert::cast(&result, *kind),
        LocalType::Reference(entry) => match entry.kind() {
            crate::registry::TypeKind::Boxed(kind) => convert::cast(&result, kind),
            _ => entry.check(result),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Compiler;
    use crate::registry::TypeRegistry;
    use std::sync::Arc;

    fn eval_with(source: &str, return_type: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        let registry = TypeRegistry::with_builtins();
        let program = Compiler::compile_source(&registry, "args", return_type, source)
            .unwrap_or_else(|e| panic!("compile failed for {source:?}: {e}"));
        run(&program, args)
    }

    fn eval(source: &str, return_type: &str) -> Value {
        eval_with(source, return_type, &[]).unwrap()
    }

    fn doubles(values: &[f64]) -> Value {
        Value::from(values.iter().copied().map(Value::Double).collect::<Vec<_>>())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    #[test]
    fn arithmetic_and_return_widening() {
        assert_eq!(eval("return 1 + 2 * 3;", "int"), Value::Int(7));
        assert_eq!(eval("return 7 / 2;", "double"), Value::Double(3.0));
        assert_eq!(eval("return 7 / 2.0;", "double"), Value::Double(3.5));
        assert_eq!(eval("return 1;", "long"), Value::Long(1));
        assert_eq!(eval("return \"a\" + 1;", "String"), Value::from("a1"));
    }

    #[test]
    fn arguments() {
        let args = [Value::Double(2.0), Value::Double(3.0)];
        let sum = "return ((Double) args[0]).doubleValue() + ((Double) args[1]).doubleValue();";
        assert_eq!(eval_with(sum, "double", &args).unwrap(), Value::Double(5.0));
        assert_eq!(eval_with("return args.length;", "int", &args).unwrap(), Value::Int(2));
        assert!(matches!(
            eval_with("return args[2];", "Object", &args),
            Err(RuntimeError::IndexOutOfBounds { index: 2, len: 2 })
        ));
    }

    #[test]
    fn short_circuit() {
        // The right side would fail with a division by zero if evaluated.
        assert_eq!(eval("return false && 1 / 0 == 0;", "boolean"), Value::Boolean(false));
        assert_eq!(eval("return true || 1 / 0 == 0;", "boolean"), Value::Boolean(true));
        assert!(matches!(
            eval_with("return true && 1 / 0 == 0;", "boolean", &[]),
            Err(RuntimeError::DivisionByZero)
        ));
    }

    #[test]
    fn ternary_selects_one_branch() {
        let source = "return ((Boolean) args[0]).booleanValue() ? 1 : 1 / 0;";
        assert_eq!(eval_with(source, "int", &[Value::Boolean(true)]).unwrap(), Value::Int(1));
        assert!(eval_with(source, "int", &[Value::Boolean(false)]).is_err());
    }

    #[test]
    fn casts() {
        assert_eq!(eval("return (int) 3.9;", "int"), Value::Int(3));
        assert!(matches!(
            eval_with("return (String) args[0];", "Object", &[Value::Int(1)]),
            Err(RuntimeError::ClassCast { .. })
        ));
    }

    #[test]
    fn conditions_must_be_boolean() {
        assert!(matches!(
            eval_with("if (args[0]) return 1; return 2;", "int", &[Value::Int(1)]),
            Err(RuntimeError::ClassCast { expected, .. }) if expected == "boolean"
        ));
        assert!(matches!(
            eval_with("if (args[0]) return 1; return 2;", "int", &[Value::Null]),
            Err(RuntimeError::NullPointer { .. })
        ));
    }

    // ========================================================================
    // Statements
    // ========================================================================

    #[test]
    fn loops_and_locals() {
        let source = "int total = 0; for (int i = 0; i < 10; i++) { if (i % 2 == 0) continue; if (i > 7) break; total += i; } return total;";
        assert_eq!(eval(source, "int"), Value::Int(1 + 3 + 5 + 7));

        let source = "long n = 1; int i = 0; while (i < 5) { n *= 2; i++; } return n;";
        assert_eq!(eval(source, "long"), Value::Long(32));

        let source = "int i = 0; while (true) { if (++i == 3) return i; }";
        assert_eq!(eval(source, "int"), Value::Int(3));
    }

    #[test]
    fn compound_assignment_narrows() {
        assert_eq!(eval("int x = 1; x += 2.7; return x;", "int"), Value::Int(3));
        assert_eq!(eval("short s = 1; s += 1; return s;", "short"), Value::Short(2));
        assert_eq!(eval("Double d = 1.0; d += 1; return d;", "Double"), Value::Double(2.0));
    }

    #[test]
    fn increments() {
        assert_eq!(eval("int i = 1; int j = i++; return j * 10 + i;", "int"), Value::Int(12));
        assert_eq!(eval("int i = 1; int j = --i; return j * 10 + i;", "int"), Value::Int(0));
    }

    #[test]
    fn slot_reuse_resets_locals() {
        let source = "int total = 0; for (int i = 0; i < 3; i++) { int x; x += i; total += x; } return total;";
        assert_eq!(eval(source, "int"), Value::Int(3));
    }

    #[test]
    fn list_iteration() {
        let source = "double tot = 0; for (java.util.Iterator it = ((java.util.List) args[0]).iterator(); it.hasNext(); ) { Object o = it.next(); tot += ((Double) o).doubleValue(); } return tot;";
        let list = doubles(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(eval_with(source, "double", &[list]).unwrap(), Value::Double(15.0));
    }

    #[test]
    fn declared_types_are_checked() {
        assert!(matches!(
            eval_with("String s = (Object) args[0]; return 1;", "int", &[Value::Int(1)]),
            Err(RuntimeError::ClassCast { .. })
        ));
        assert!(matches!(
            eval_with("return args[0];", "boolean", &[Value::Null]),
            Err(RuntimeError::NullPointer { .. })
        ));
    }

    #[test]
    fn programs_are_reentrant() {
        let registry = TypeRegistry::with_builtins();
        let program = Arc::new(
            Compiler::compile_source(&registry, "args", "int", "int x = ((Integer) args[0]).intValue(); return x * x;")
                .unwrap(),
        );
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let program = Arc::clone(&program);
                std::thread::spawn(move || run(&program, &[Value::Int(i)]).unwrap())
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), Value::Int((i * i) as i32));
        }
    }
}

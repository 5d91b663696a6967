//! Lowering from the parsed body to a [`Program`].
//!
//! The compiler resolves every name a body uses:
//!
//! - identifiers become local slots; the argument array identifier is only
//!   legal when indexed (`args[0]`) or asked for its `length`
//! - type names in casts, declarations and `new` resolve through the
//!   [`TypeRegistry`]
//! - a dotted path whose head is not a local (`Math.abs`, `java.lang.Math.PI`)
//!   is a static member access on the type the rest of the path names
//!
//! Anything that does not resolve is a [`BackendError`] pointing at the
//! offending span, as are Java's structural rules: expression statements
//! must have an effect, `break`/`continue` must be inside a loop, and every
//! path must end in a `return`.

pub mod program;
pub mod return_checker;
pub mod scope;

use std::sync::Arc;

use bumpalo::Bump;
use fnspec_core::{BackendError, PrimitiveKind, Span, Value};
use fnspec_parser::ast::{self, AssignExpr, Body, LiteralKind, MemberAccess, ParseErrors, TypeExpr, UnaryOp};
use fnspec_parser::Parser;

pub use program::{CastTarget, Expr, LocalType, Place, Program, Stmt};
pub use return_checker::ReturnChecker;
pub use scope::LocalScope;

use crate::registry::{TypeEntry, TypeRegistry};

/// Compiles one body against a registry.
pub struct Compiler<'r> {
    registry: &'r TypeRegistry,
    args_identifier: &'r str,
    scope: LocalScope,
    loop_depth: u32,
}

impl<'r> Compiler<'r> {
    pub fn new(registry: &'r TypeRegistry, args_identifier: &'r str) -> Self {
        Self {
            registry,
            args_identifier,
            scope: LocalScope::new(),
            loop_depth: 0,
        }
    }

    /// Parse and compile body source in one step.
    ///
    /// `return_type` is the declared return type of the body; it decides the
    /// conversion applied to returned values.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_source(
        registry: &'r TypeRegistry,
        args_identifier: &'r str,
        return_type: &str,
        source: &str,
    ) -> Result<Program, BackendError> {
        let arena = Bump::new();
        let body = Parser::parse_body(source, &arena).map_err(parse_failure)?;
        let mut compiler = Compiler::new(registry, args_identifier);
        let returns = compiler.resolve_type_name(return_type, body.span())?;
        compiler.compile(&body, returns)
    }

    /// Compile a parsed body.
    pub fn compile(mut self, body: &Body<'_>, returns: LocalType) -> Result<Program, BackendError> {
        if !ReturnChecker::all_paths_return(body.stmts()) {
            return Err(BackendError::at(body.span(), "missing return statement"));
        }

        let stmts = body
            .stmts()
            .iter()
            .map(|stmt| self.lower_stmt(stmt))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Program {
            stmts,
            frame_size: self.scope.frame_size(),
            returns,
        })
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn resolve_type_name(&self, name: &str, span: Span) -> Result<LocalType, BackendError> {
        if let Some(kind) = PrimitiveKind::from_name(name) {
            return Ok(LocalType::Primitive(kind));
        }
        self.lookup_type(name)
            .map(LocalType::Reference)
            .ok_or_else(|| BackendError::at(span, format!("cannot find symbol: class {name}")))
    }

    fn resolve_type(&self, ty: &TypeExpr<'_>) -> Result<LocalType, BackendError> {
        match ty.primitive {
            Some(kind) => Ok(LocalType::Primitive(kind)),
            None => self.resolve_type_name(ty.name, ty.span),
        }
    }

    fn lookup_type(&self, name: &str) -> Option<Arc<TypeEntry>> {
        self.registry.get(name).cloned()
    }

    /// Whether a dotted path starts with something that holds a value rather
    /// than naming a type.
    fn is_value_path(&self, path: &str) -> bool {
        let head = path.split('.').next().unwrap_or(path);
        head == self.args_identifier || self.scope.lookup(head).is_some()
    }

    /// Resolve the object of a static member access, e.g. `java.lang.Math`.
    fn static_owner(&self, path: &str, span: Span) -> Result<Arc<TypeEntry>, BackendError> {
        self.lookup_type(path)
            .ok_or_else(|| BackendError::at(span, format!("cannot find symbol: {path}")))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn lower_stmt(&mut self, stmt: &ast::Stmt<'_>) -> Result<Stmt, BackendError> {
        match stmt {
            ast::Stmt::Expr(expr_stmt) => {
                if !is_statement_expression(expr_stmt.expr) {
                    return Err(BackendError::at(expr_stmt.span, "not a statement"));
                }
                Ok(Stmt::Expr(self.lower_expr(expr_stmt.expr)?))
            }
            ast::Stmt::VarDecl(decl) => {
                let mut locals = self.lower_var_decl(decl)?;
                Ok(if locals.len() == 1 {
                    locals.remove(0)
                } else {
                    // Declarators share the enclosing scope, not a block of their own.
                    Stmt::Block(locals)
                })
            }
            ast::Stmt::Return(ret) => match ret.value {
                Some(value) => Ok(Stmt::Return(self.lower_expr(value)?)),
                None => Err(BackendError::at(ret.span, "missing return value")),
            },
            ast::Stmt::Break(span) => {
                if self.loop_depth == 0 {
                    return Err(BackendError::at(*span, "break outside of loop"));
                }
                Ok(Stmt::Break)
            }
            ast::Stmt::Continue(span) => {
                if self.loop_depth == 0 {
                    return Err(BackendError::at(*span, "continue outside of loop"));
                }
                Ok(Stmt::Continue)
            }
            ast::Stmt::Block(block) => Ok(Stmt::Block(self.lower_block(block.stmts)?)),
            ast::Stmt::If(if_stmt) => {
                let condition = self.lower_expr(if_stmt.condition)?;
                let then_stmt = Box::new(self.lower_nested(if_stmt.then_stmt)?);
                let else_stmt = match if_stmt.else_stmt {
                    Some(stmt) => Some(Box::new(self.lower_nested(stmt)?)),
                    None => None,
                };
                Ok(Stmt::If {
                    condition,
                    then_stmt,
                    else_stmt,
                })
            }
            ast::Stmt::While(while_stmt) => {
                let condition = self.lower_expr(while_stmt.condition)?;
                let body = Box::new(self.lower_loop_body(while_stmt.body)?);
                Ok(Stmt::While { condition, body })
            }
            ast::Stmt::For(for_stmt) => {
                self.scope.push_scope();
                let result = self.lower_for(for_stmt);
                self.scope.pop_scope();
                result
            }
            ast::Stmt::Empty(_) => Ok(Stmt::Block(Vec::new())),
        }
    }

    fn lower_block(&mut self, stmts: &[ast::Stmt<'_>]) -> Result<Vec<Stmt>, BackendError> {
        self.scope.push_scope();
        let result = stmts.iter().map(|stmt| self.lower_stmt(stmt)).collect();
        self.scope.pop_scope();
        result
    }

    /// The single statement under an `if`, `else` or loop gets its own scope.
    fn lower_nested(&mut self, stmt: &ast::Stmt<'_>) -> Result<Stmt, BackendError> {
        self.scope.push_scope();
        let result = self.lower_stmt(stmt);
        self.scope.pop_scope();
        result
    }

    fn lower_loop_body(&mut self, stmt: &ast::Stmt<'_>) -> Result<Stmt, BackendError> {
        self.loop_depth += 1;
        let result = self.lower_nested(stmt);
        self.loop_depth -= 1;
        result
    }

    fn lower_for(&mut self, for_stmt: &ast::ForStmt<'_>) -> Result<Stmt, BackendError> {
        let init = match for_stmt.init {
            Some(ast::ForInit::VarDecl(decl)) => self.lower_var_decl(&decl)?,
            Some(ast::ForInit::Exprs(exprs)) => exprs
                .iter()
                .map(|expr| self.lower_statement_expression(expr).map(Stmt::Expr))
                .collect::<Result<_, _>>()?,
            None => Vec::new(),
        };
        let condition = match for_stmt.condition {
            Some(condition) => Some(self.lower_expr(condition)?),
            None => None,
        };
        let update = for_stmt
            .update
            .iter()
            .map(|expr| self.lower_statement_expression(expr))
            .collect::<Result<_, _>>()?;
        let body = Box::new(self.lower_loop_body(for_stmt.body)?);

        Ok(Stmt::For {
            init,
            condition,
            update,
            body,
        })
    }

    fn lower_statement_expression(&mut self, expr: &ast::Expr<'_>) -> Result<Expr, BackendError> {
        if !is_statement_expression(expr) {
            return Err(BackendError::at(expr.span(), "not a statement"));
        }
        self.lower_expr(expr)
    }

    fn lower_var_decl(&mut self, decl: &ast::VarDeclStmt<'_>) -> Result<Vec<Stmt>, BackendError> {
        let ty = self.resolve_type(&decl.ty)?;
        let mut locals = Vec::with_capacity(decl.vars.len());

        for var in decl.vars {
            // The initializer cannot see the local it initializes.
            let init = match var.init {
                Some(init) => self.lower_expr(init)?,
                None => Expr::Const(ty.default_value()),
            };
            let slot = self.scope.declare(var.name.name, ty.clone(), var.span)?;
            locals.push(Stmt::Local {
                slot,
                ty: ty.clone(),
                init,
            });
        }
        Ok(locals)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn lower_expr(&mut self, expr: &ast::Expr<'_>) -> Result<Expr, BackendError> {
        match expr {
            ast::Expr::Literal(literal) => Ok(Expr::Const(literal_value(literal.kind))),
            ast::Expr::Ident(ident) => self.lower_ident(ident.ident.name, ident.span),
            ast::Expr::Paren(paren) => self.lower_expr(paren.expr),
            ast::Expr::Binary(binary) => Ok(Expr::Binary {
                op: binary.op,
                left: Box::new(self.lower_expr(binary.left)?),
                right: Box::new(self.lower_expr(binary.right)?),
            }),
            ast::Expr::Unary(unary) => match unary.op {
                UnaryOp::PreInc | UnaryOp::PreDec => Ok(Expr::IncDec {
                    place: self.lower_place(unary.operand)?,
                    delta: if unary.op == UnaryOp::PreInc { 1 } else { -1 },
                    prefix: true,
                }),
                op => Ok(Expr::Unary {
                    op,
                    operand: Box::new(self.lower_expr(unary.operand)?),
                }),
            },
            ast::Expr::Postfix(postfix) => Ok(Expr::IncDec {
                place: self.lower_place(postfix.operand)?,
                delta: if postfix.op == ast::PostfixOp::PostInc { 1 } else { -1 },
                prefix: false,
            }),
            ast::Expr::Assign(assign) => self.lower_assign(assign),
            ast::Expr::Ternary(ternary) => Ok(Expr::Ternary {
                condition: Box::new(self.lower_expr(ternary.condition)?),
                then_expr: Box::new(self.lower_expr(ternary.then_expr)?),
                else_expr: Box::new(self.lower_expr(ternary.else_expr)?),
            }),
            ast::Expr::Cast(cast) => Ok(Expr::Cast {
                target: self.resolve_type(&cast.target_type)?,
                expr: Box::new(self.lower_expr(cast.expr)?),
            }),
            ast::Expr::New(new) => self.lower_new(new),
            ast::Expr::Index(index) => self.lower_index(index),
            ast::Expr::Member(member) => self.lower_member(member, expr),
            ast::Expr::Call(call) => Err(BackendError::at(
                call.span,
                format!("cannot find symbol: method {}", call.callee.name),
            )),
        }
    }

    fn lower_ident(&self, name: &str, span: Span) -> Result<Expr, BackendError> {
        if let Some(local) = self.scope.lookup(name) {
            return Ok(Expr::Local(local.slot));
        }
        if name == self.args_identifier {
            return Err(BackendError::at(
                span,
                format!("the argument array {name} can only be indexed"),
            ));
        }
        Err(BackendError::at(span, format!("cannot find symbol: variable {name}")))
    }

    fn lower_args(&mut self, args: &[&ast::Expr<'_>]) -> Result<Vec<Expr>, BackendError> {
        args.iter().map(|arg| self.lower_expr(arg)).collect()
    }

    fn lower_index(&mut self, index: &ast::IndexExpr<'_>) -> Result<Expr, BackendError> {
        match index.target.unparenthesized() {
            ast::Expr::Ident(ident)
                if ident.ident.name == self.args_identifier && self.scope.lookup(ident.ident.name).is_none() =>
            {
                Ok(Expr::Arg(Box::new(self.lower_expr(index.index)?)))
            }
            _ => Err(BackendError::at(
                index.span,
                "array access is only supported on the argument array",
            )),
        }
    }

    fn lower_new(&mut self, new: &ast::NewExpr<'_>) -> Result<Expr, BackendError> {
        let entry = match self.resolve_type(&new.ty)? {
            LocalType::Reference(entry) => entry,
            LocalType::Primitive(kind) => {
                return Err(BackendError::at(new.ty.span, format!("cannot instantiate primitive type {kind}")));
            }
        };
        let ctor = entry.constructor().cloned().ok_or_else(|| {
            BackendError::at(new.span, format!("{} cannot be instantiated", entry.name()))
        })?;
        Ok(Expr::New {
            ctor,
            type_name: entry.name().to_string(),
            args: self.lower_args(new.args)?,
        })
    }

    fn lower_member(&mut self, member: &ast::MemberExpr<'_>, whole: &ast::Expr<'_>) -> Result<Expr, BackendError> {
        let owner_path = member.object.dotted_path();

        match member.access {
            MemberAccess::Field(field) => match owner_path {
                Some(path) if path == self.args_identifier && self.scope.lookup(&path).is_none() => {
                    if field.name == "length" {
                        Ok(Expr::ArgCount)
                    } else {
                        Err(BackendError::at(field.span, format!("cannot find symbol: variable {}", field.name)))
                    }
                }
                Some(path) if !self.is_value_path(&path) => {
                    let owner = self.static_owner(&path, member.object.span())?;
                    owner.static_field(field.name).cloned().map(Expr::Const).ok_or_else(|| {
                        BackendError::at(
                            whole.span(),
                            format!("cannot find symbol: variable {} in {}", field.name, owner.name()),
                        )
                    })
                }
                _ => Ok(Expr::Field {
                    object: Box::new(self.lower_expr(member.object)?),
                    name: field.name.to_string(),
                }),
            },
            MemberAccess::Method { name, args } => match owner_path {
                Some(path) if !self.is_value_path(&path) => {
                    let owner = self.static_owner(&path, member.object.span())?;
                    let func = owner.static_function(name.name).cloned().ok_or_else(|| {
                        BackendError::at(
                            name.span,
                            format!("cannot find symbol: method {} in {}", name.name, owner.name()),
                        )
                    })?;
                    Ok(Expr::StaticCall {
                        func,
                        name: format!("{}.{}", owner.simple_name(), name.name),
                        args: self.lower_args(args)?,
                    })
                }
                _ => Ok(Expr::MethodCall {
                    receiver: Box::new(self.lower_expr(member.object)?),
                    name: name.name.to_string(),
                    args: self.lower_args(args)?,
                }),
            },
        }
    }

    fn lower_assign(&mut self, assign: &AssignExpr<'_>) -> Result<Expr, BackendError> {
        let place = self.lower_place(assign.target)?;
        Ok(Expr::Assign {
            place,
            op: assign.op.binary_op(),
            value: Box::new(self.lower_expr(assign.value)?),
        })
    }

    fn lower_place(&mut self, target: &ast::Expr<'_>) -> Result<Place, BackendError> {
        let read_only = |span| BackendError::at(span, "cannot assign to the argument array");

        match target.unparenthesized() {
            ast::Expr::Ident(ident) => match self.scope.lookup(ident.ident.name) {
                Some(local) => Ok(Place::Local {
                    slot: local.slot,
                    ty: local.ty.clone(),
                }),
                None if ident.ident.name == self.args_identifier => Err(read_only(ident.span)),
                None => Err(BackendError::at(
                    ident.span,
                    format!("cannot find symbol: variable {}", ident.ident.name),
                )),
            },
            ast::Expr::Index(index) => Err(read_only(index.span)),
            ast::Expr::Member(member) => match member.access {
                MemberAccess::Field(field) => {
                    if let Some(path) = member.object.dotted_path() {
                        if !self.is_value_path(&path) {
                            return Err(BackendError::at(
                                member.span,
                                format!("cannot assign a value to static field {path}.{}", field.name),
                            ));
                        }
                    }
                    Ok(Place::Field {
                        object: Box::new(self.lower_expr(member.object)?),
                        name: field.name.to_string(),
                    })
                }
                MemberAccess::Method { .. } => Err(BackendError::at(member.span, "unexpected assignment target")),
            },
            other => Err(BackendError::at(other.span(), "unexpected assignment target")),
        }
    }
}

/// Expressions Java accepts as statements.
fn is_statement_expression(expr: &ast::Expr<'_>) -> bool {
    match expr {
        ast::Expr::Assign(_) | ast::Expr::Postfix(_) | ast::Expr::New(_) | ast::Expr::Call(_) => true,
        ast::Expr::Unary(unary) => matches!(unary.op, UnaryOp::PreInc | UnaryOp::PreDec),
        ast::Expr::Member(member) => matches!(member.access, MemberAccess::Method { .. }),
        _ => false,
    }
}

fn literal_value(kind: LiteralKind<'_>) -> Value {
    match kind {
        LiteralKind::Int(v) => Value::Int(v),
        LiteralKind::Long(v) => Value::Long(v),
        LiteralKind::Float(v) => Value::Float(v),
        LiteralKind::Double(v) => Value::Double(v),
        LiteralKind::Bool(v) => Value::Boolean(v),
        LiteralKind::String(s) => Value::from(s),
        LiteralKind::Null => Value::Null,
    }
}

/// Fold a parse failure into one backend error that points at the first
/// problem and keeps the rest as its source.
fn parse_failure(errors: ParseErrors) -> BackendError {
    let span = errors.first().map(|e| e.span);
    let message = match errors.first() {
        Some(first) if errors.len() > 1 => format!("{first} (and {} more)", errors.len() - 1),
        Some(first) => first.to_string(),
        None => "body could not be parsed".to_string(),
    };
    BackendError {
        message,
        span,
        source: Some(Box::new(errors)),
    }
}

//! Return path verification.
//!
//! A body must not be able to fall off its end: every path has to reach a
//! `return`. [`ReturnChecker`] walks the parsed statements with a
//! simplified form of Java's "can complete normally" analysis:
//!
//! - `return`, `break` and `continue` never complete normally
//! - a block completes normally unless one of its statements does not
//! - `if` without `else` always may; with `else`, when either branch may
//! - `while (true)` and `for (;;)` only complete normally through a `break`
//!   that targets them; any other loop may always fall through

use fnspec_parser::ast::{Expr, LiteralKind, Stmt};

pub struct ReturnChecker;

impl ReturnChecker {
    /// Whether every path through `stmts` ends in a `return`.
    pub fn all_paths_return(stmts: &[Stmt<'_>]) -> bool {
        !completes_normally(stmts)
    }
}

fn completes_normally(stmts: &[Stmt<'_>]) -> bool {
    stmts.iter().all(stmt_completes_normally)
}

fn stmt_completes_normally(stmt: &Stmt<'_>) -> bool {
    match stmt {
        Stmt::Return(_) | Stmt::Break(_) | Stmt::Continue(_) => false,
        Stmt::Block(block) => completes_normally(block.stmts),
        Stmt::If(if_stmt) => match if_stmt.else_stmt {
            Some(else_stmt) => {
                stmt_completes_normally(if_stmt.then_stmt) || stmt_completes_normally(else_stmt)
            }
            None => true,
        },
        Stmt::While(while_stmt) => {
            !is_constant_true(while_stmt.condition) || breaks_out(while_stmt.body)
        }
        Stmt::For(for_stmt) => match for_stmt.condition {
            Some(condition) if !is_constant_true(condition) => true,
            _ => breaks_out(for_stmt.body),
        },
        Stmt::Expr(_) | Stmt::VarDecl(_) | Stmt::Empty(_) => true,
    }
}

fn is_constant_true(expr: &Expr<'_>) -> bool {
    matches!(
        expr.unparenthesized(),
        Expr::Literal(literal) if literal.kind == LiteralKind::Bool(true)
    )
}

/// Whether `stmt` contains a `break` that leaves the loop whose body it is.
/// Breaks inside nested loops target those loops instead.
fn breaks_out(stmt: &Stmt<'_>) -> bool {
    match stmt {
        Stmt::Break(_) => true,
        Stmt::Block(block) => block.stmts.iter().any(breaks_out),
        Stmt::If(if_stmt) => breaks_out(if_stmt.then_stmt) || if_stmt.else_stmt.is_some_and(breaks_out),
        Stmt::While(_) | Stmt::For(_) => false,
        Stmt::Return(_) | Stmt::Continue(_) | Stmt::Expr(_) | Stmt::VarDecl(_) | Stmt::Empty(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use fnspec_parser::Parser;

    fn check(source: &str) -> bool {
        let arena = Bump::new();
        let body = Parser::parse_body(source, &arena).unwrap();
        ReturnChecker::all_paths_return(body.stmts())
    }

    #[test]
    fn straight_line() {
        assert!(check("return 1;"));
        assert!(check("double t = 1; return t;"));
        assert!(!check("double t = 1;"));
        assert!(!check(""));
    }

    #[test]
    fn branches() {
        assert!(check("if (a) return 1; else return 2;"));
        assert!(!check("if (a) return 1;"));
        assert!(!check("if (a) { return 1; } else { x = 2; }"));
        assert!(check("if (a) return 1; return 2;"));
        assert!(check("{ { return 1; } }"));
    }

    #[test]
    fn loops() {
        assert!(!check("while (i < 3) { return 1; }"));
        assert!(check("while (true) { i++; }"));
        assert!(check("for (;;) { }"));
        assert!(!check("while ((true)) { break; }"));
        assert!(check("while (true) { for (;;) { break; } }"));
        assert!(!check("for (;;) { if (x) { break; } }"));
        assert!(check("for (int i = 0; i < 3; i++) {} return 0;"));
    }
}

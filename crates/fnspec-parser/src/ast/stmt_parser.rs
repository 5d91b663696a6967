//! Statement parsing.

use fnspec_core::ParseError;

use super::parser::Parser;
use crate::ast::stmt::*;
use crate::ast::{Expr, Ident};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse one statement.
    pub fn parse_statement(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let token = self.peek();

        match token.kind {
            TokenKind::LeftBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Semicolon => {
                self.advance();
                Ok(Stmt::Empty(token.span))
            }
            TokenKind::Return => self.parse_return(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Break => {
                self.advance();
                let semi = self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Break(token.span.merge(semi.span)))
            }
            TokenKind::Continue => {
                self.advance();
                let semi = self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Continue(token.span.merge(semi.span)))
            }
            _ if self.is_var_decl() => {
                let decl = self.parse_var_decl()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::VarDecl(decl))
            }
            _ => {
                let expr = self.parse_expr(0)?;
                let semi = self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Expr(ExprStmt {
                    expr,
                    span: expr.span().merge(semi.span),
                }))
            }
        }
    }

    /// Parse a statement nested under `if`, `while` or `for`.
    fn parse_boxed_statement(&mut self) -> Result<&'ast Stmt<'ast>, ParseError> {
        let stmt = self.parse_statement()?;
        Ok(self.arena.alloc(stmt))
    }

    /// `{ stmt* }`
    pub fn parse_block(&mut self) -> Result<Block<'ast>, ParseError> {
        let open = self.expect(TokenKind::LeftBrace)?;
        let mut stmts = bumpalo::collections::Vec::new_in(self.arena);

        while !self.check(TokenKind::RightBrace) && !self.is_eof() {
            stmts.push(self.parse_statement()?);
        }
        let close = self.expect(TokenKind::RightBrace)?;

        Ok(Block {
            stmts: stmts.into_bump_slice(),
            span: open.span.merge(close.span),
        })
    }

    /// `Type name [= init] (, name [= init])*`, without the semicolon.
    pub fn parse_var_decl(&mut self) -> Result<VarDeclStmt<'ast>, ParseError> {
        let ty = self.parse_type()?;
        let mut vars = bumpalo::collections::Vec::new_in(self.arena);

        loop {
            let name_token = self.expect(TokenKind::Identifier)?;
            let name = Ident::new(name_token.lexeme, name_token.span);
            let init = if self.eat(TokenKind::Equal).is_some() {
                Some(self.parse_expr(0)?)
            } else {
                None
            };
            let span = init.map_or(name.span, |e| name.span.merge(e.span()));
            vars.push(VarDeclarator { name, init, span });

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        let span = ty.span.merge(self.previous().span);
        Ok(VarDeclStmt {
            ty,
            vars: vars.into_bump_slice(),
            span,
        })
    }

    fn parse_return(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let ret = self.expect(TokenKind::Return)?;
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr(0)?)
        };
        let semi = self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return(ReturnStmt {
            value,
            span: ret.span.merge(semi.span),
        }))
    }

    fn parse_condition(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expr(0)?;
        self.expect(TokenKind::RightParen)?;
        Ok(condition)
    }

    fn parse_if(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::If)?;
        let condition = self.parse_condition()?;
        let then_stmt = self.parse_boxed_statement()?;
        let else_stmt = if self.eat(TokenKind::Else).is_some() {
            Some(self.parse_boxed_statement()?)
        } else {
            None
        };
        let end = else_stmt.unwrap_or(then_stmt).span();

        Ok(Stmt::If(self.arena.alloc(IfStmt {
            condition,
            then_stmt,
            else_stmt,
            span: start.span.merge(end),
        })))
    }

    fn parse_while(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::While)?;
        let condition = self.parse_condition()?;
        let body = self.parse_boxed_statement()?;

        Ok(Stmt::While(self.arena.alloc(WhileStmt {
            condition,
            body,
            span: start.span.merge(body.span()),
        })))
    }

    /// `for (init; condition; update) body` with every clause optional.
    fn parse_for(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = self.expect(TokenKind::For)?;
        self.expect(TokenKind::LeftParen)?;

        let init = if self.check(TokenKind::Semicolon) {
            None
        } else if self.is_var_decl() {
            Some(ForInit::VarDecl(self.parse_var_decl()?))
        } else {
            Some(ForInit::Exprs(self.parse_expr_list(TokenKind::Semicolon)?))
        };
        self.expect(TokenKind::Semicolon)?;

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr(0)?)
        };
        self.expect(TokenKind::Semicolon)?;

        let update = self.parse_expr_list(TokenKind::RightParen)?;
        self.expect(TokenKind::RightParen)?;

        let body = self.parse_boxed_statement()?;

        Ok(Stmt::For(self.arena.alloc(ForStmt {
            init,
            condition,
            update,
            body,
            span: start.span.merge(body.span()),
        })))
    }

    /// Comma-separated expressions up to (not including) `terminator`.
    fn parse_expr_list(&mut self, terminator: TokenKind) -> Result<&'ast [&'ast Expr<'ast>], ParseError> {
        let mut exprs = bumpalo::collections::Vec::new_in(self.arena);
        if !self.check(terminator) {
            loop {
                exprs.push(self.parse_expr(0)?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        Ok(exprs.into_bump_slice())
    }
}

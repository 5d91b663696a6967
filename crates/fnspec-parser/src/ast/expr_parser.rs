//! Expression parsing using Pratt parsing (precedence climbing).

use fnspec_core::{ParseError, ParseErrorKind, Span};

use super::parser::{Parser, describe};
use crate::ast::expr::*;
use crate::ast::{AssignOp, BinaryOp, Ident, PostfixOp, TERNARY_BP, UnaryOp};
use crate::lexer::{Token, TokenKind};

impl<'ast> Parser<'ast> {
    /// Parse an expression, consuming only operators that bind at least as
    /// tightly as `min_bp`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_expr(&mut self, min_bp: u8) -> Result<&'ast Expr<'ast>, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let token = self.peek();

            if let Some(op) = PostfixOp::from_token(token.kind) {
                if PostfixOp::binding_power() < min_bp {
                    break;
                }
                self.advance();
                self.check_assignable(lhs, token)?;
                let span = lhs.span().merge(token.span);
                lhs = self.alloc(Expr::Postfix(self.arena.alloc(PostfixExpr {
                    operand: lhs,
                    op,
                    span,
                })));
                continue;
            }

            match token.kind {
                TokenKind::Dot | TokenKind::LeftBracket | TokenKind::LeftParen
                    if PostfixOp::binding_power() < min_bp =>
                {
                    break;
                }
                TokenKind::Dot => {
                    lhs = self.parse_member_access(lhs)?;
                    continue;
                }
                TokenKind::LeftBracket => {
                    lhs = self.parse_index(lhs)?;
                    continue;
                }
                TokenKind::LeftParen => {
                    lhs = self.parse_call(lhs)?;
                    continue;
                }
                TokenKind::Question => {
                    if TERNARY_BP.0 < min_bp {
                        break;
                    }
                    lhs = self.parse_ternary(lhs)?;
                    continue;
                }
                _ => {}
            }

            if let Some(op) = AssignOp::from_token(token.kind) {
                let (l_bp, r_bp) = AssignOp::binding_power();
                if l_bp < min_bp {
                    break;
                }
                self.advance();
                self.check_assignable(lhs, token)?;
                let value = self.parse_expr(r_bp)?;
                let span = lhs.span().merge(value.span());
                lhs = self.alloc(Expr::Assign(self.arena.alloc(AssignExpr {
                    target: lhs,
                    op,
                    value,
                    span,
                })));
                continue;
            }

            if let Some(op) = BinaryOp::from_token(token.kind) {
                let (l_bp, r_bp) = op.binding_power();
                if l_bp < min_bp {
                    break;
                }
                self.advance();
                let right = self.parse_expr(r_bp)?;
                let span = lhs.span().merge(right.span());
                lhs = self.alloc(Expr::Binary(self.arena.alloc(BinaryExpr {
                    left: lhs,
                    op,
                    right,
                    span,
                })));
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    fn alloc(&self, expr: Expr<'ast>) -> &'ast Expr<'ast> {
        self.arena.alloc(expr)
    }

    fn check_assignable(&self, target: &Expr<'ast>, op: Token<'ast>) -> Result<(), ParseError> {
        if target.is_assignable() {
            Ok(())
        } else {
            Err(ParseError::new(
                ParseErrorKind::InvalidAssignmentTarget,
                target.span(),
                format!("left side of '{}' is not assignable", op.lexeme),
            ))
        }
    }

    /// Parse the start of an expression.
    fn parse_prefix(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let token = self.peek();

        let literal = match token.kind {
            TokenKind::IntLiteral => Some(self.int_literal(token)?),
            TokenKind::LongLiteral => Some(self.long_literal(token)?),
            TokenKind::FloatLiteral => {
                let text = strip_number(token.lexeme, &['f', 'F']);
                let value = text.parse::<f32>().map_err(|_| invalid_number(token))?;
                Some(LiteralKind::Float(value))
            }
            TokenKind::DoubleLiteral => {
                let text = strip_number(token.lexeme, &['d', 'D']);
                let value = text.parse::<f64>().map_err(|_| invalid_number(token))?;
                Some(LiteralKind::Double(value))
            }
            TokenKind::StringLiteral => Some(LiteralKind::String(self.decode_string(token)?)),
            TokenKind::True => Some(LiteralKind::Bool(true)),
            TokenKind::False => Some(LiteralKind::Bool(false)),
            TokenKind::Null => Some(LiteralKind::Null),
            _ => None,
        };
        if let Some(kind) = literal {
            self.advance();
            return Ok(self.alloc(Expr::Literal(LiteralExpr {
                kind,
                span: token.span,
            })));
        }

        if let Some(op) = UnaryOp::from_token(token.kind) {
            self.advance();
            if matches!(op, UnaryOp::Neg)
                && let Some(kind) = negated_minimum(self.peek())
            {
                let literal = self.advance();
                return Ok(self.alloc(Expr::Literal(LiteralExpr {
                    kind,
                    span: token.span.merge(literal.span),
                })));
            }
            let operand = self.parse_expr(UnaryOp::binding_power())?;
            if matches!(op, UnaryOp::PreInc | UnaryOp::PreDec) {
                self.check_assignable(operand, token)?;
            }
            let span = token.span.merge(operand.span());
            return Ok(self.alloc(Expr::Unary(self.arena.alloc(UnaryExpr { op, operand, span }))));
        }

        match token.kind {
            TokenKind::LeftParen if self.is_cast() => self.parse_cast(),

            TokenKind::LeftParen => {
                let open = self.advance();
                let expr = self.parse_expr(0)?;
                let close = self.expect(TokenKind::RightParen)?;
                Ok(self.alloc(Expr::Paren(self.arena.alloc(ParenExpr {
                    expr,
                    span: open.span.merge(close.span),
                }))))
            }

            TokenKind::New => self.parse_new(),

            TokenKind::Identifier => {
                self.advance();
                Ok(self.alloc(Expr::Ident(IdentExpr {
                    ident: Ident::new(token.lexeme, token.span),
                    span: token.span,
                })))
            }

            TokenKind::Eof => Err(ParseError::new(
                ParseErrorKind::UnexpectedEof,
                token.span,
                "expected expression, found end of body",
            )),

            _ => Err(ParseError::expected_expression(token.span, &describe(token))),
        }
    }

    fn int_literal(&self, token: Token<'ast>) -> Result<LiteralKind<'ast>, ParseError> {
        let text = strip_number(token.lexeme, &[]);
        let value = match hex_digits(&text) {
            Some(hex) => u32::from_str_radix(hex, 16).map(|v| v as i32).ok(),
            None => text.parse::<i32>().ok(),
        };
        value
            .map(LiteralKind::Int)
            .ok_or_else(|| invalid_number(token))
    }

    fn long_literal(&self, token: Token<'ast>) -> Result<LiteralKind<'ast>, ParseError> {
        let text = strip_number(token.lexeme, &['l', 'L']);
        let value = match hex_digits(&text) {
            Some(hex) => u64::from_str_radix(hex, 16).map(|v| v as i64).ok(),
            None => text.parse::<i64>().ok(),
        };
        value
            .map(LiteralKind::Long)
            .ok_or_else(|| invalid_number(token))
    }

    /// Decode escapes in a string literal and copy it into the arena.
    fn decode_string(&self, token: Token<'ast>) -> Result<&'ast str, ParseError> {
        let inner = &token.lexeme[1..token.lexeme.len() - 1];
        if !inner.contains('\\') {
            return Ok(inner);
        }

        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            let decoded = match chars.next() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some('b') => '\u{8}',
                Some('f') => '\u{c}',
                Some('0') => '\0',
                Some(c @ ('"' | '\'' | '\\')) => c,
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    u32::from_str_radix(&hex, 16)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| {
                            ParseError::new(
                                ParseErrorKind::UnexpectedChar,
                                token.span,
                                format!("invalid unicode escape '\\u{hex}'"),
                            )
                        })?
                }
                other => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedChar,
                        token.span,
                        format!("invalid escape '\\{}'", other.unwrap_or(' ')),
                    ));
                }
            };
            out.push(decoded);
        }
        Ok(self.arena.alloc_str(&out))
    }

    // ========================================================================
    // Casts
    // ========================================================================

    /// Decide whether the `(` under the cursor opens a cast.
    ///
    /// `(int) x` is always a cast. `(Name) x` is a cast only when the token
    /// after `)` can start an operand but not a binary expression, so
    /// `(a) + b` stays a parenthesized `a`.
    fn is_cast(&self) -> bool {
        let first = self.peek_nth(1);
        let Some(len) = self.type_len_at(1) else {
            return false;
        };
        if self.peek_nth(1 + len).kind != TokenKind::RightParen {
            return false;
        }
        if first.kind.is_primitive_type() {
            return true;
        }
        matches!(
            self.peek_nth(2 + len).kind,
            TokenKind::Identifier
                | TokenKind::LeftParen
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::IntLiteral
                | TokenKind::LongLiteral
                | TokenKind::FloatLiteral
                | TokenKind::DoubleLiteral
                | TokenKind::StringLiteral
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::New
        )
    }

    fn parse_cast(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let open = self.expect(TokenKind::LeftParen)?;
        let target_type = self.parse_type()?;
        self.expect(TokenKind::RightParen)?;
        let expr = self.parse_expr(UnaryOp::binding_power())?;
        let span = open.span.merge(expr.span());
        Ok(self.alloc(Expr::Cast(self.arena.alloc(CastExpr {
            target_type,
            expr,
            span,
        }))))
    }

    // ========================================================================
    // Postfix forms
    // ========================================================================

    fn parse_member_access(&mut self, object: &'ast Expr<'ast>) -> Result<&'ast Expr<'ast>, ParseError> {
        self.expect(TokenKind::Dot)?;
        let name_token = self.peek();
        if name_token.kind != TokenKind::Identifier {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedIdentifier,
                name_token.span,
                format!("expected member name after '.', found {}", describe(name_token)),
            ));
        }
        self.advance();
        let name = Ident::new(name_token.lexeme, name_token.span);

        let access = if self.check(TokenKind::LeftParen) {
            let args = self.parse_arguments()?;
            MemberAccess::Method { name, args }
        } else {
            MemberAccess::Field(name)
        };
        let span = object.span().merge(self.previous().span);

        Ok(self.alloc(Expr::Member(self.arena.alloc(MemberExpr {
            object,
            access,
            span,
        }))))
    }

    fn parse_index(&mut self, target: &'ast Expr<'ast>) -> Result<&'ast Expr<'ast>, ParseError> {
        self.expect(TokenKind::LeftBracket)?;
        let index = self.parse_expr(0)?;
        let close = self.expect(TokenKind::RightBracket)?;
        Ok(self.alloc(Expr::Index(self.arena.alloc(IndexExpr {
            target,
            index,
            span: target.span().merge(close.span),
        }))))
    }

    /// `name(args)`. Only a bare identifier may be called this way.
    fn parse_call(&mut self, callee: &'ast Expr<'ast>) -> Result<&'ast Expr<'ast>, ParseError> {
        let Expr::Ident(ident) = callee else {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedExpression,
                callee.span(),
                "expression cannot be called",
            ));
        };
        let args = self.parse_arguments()?;
        Ok(self.alloc(Expr::Call(self.arena.alloc(CallExpr {
            callee: ident.ident,
            args,
            span: callee.span().merge(self.previous().span),
        }))))
    }

    /// `( expr, ... )`
    fn parse_arguments(&mut self) -> Result<&'ast [&'ast Expr<'ast>], ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let mut args = bumpalo::collections::Vec::new_in(self.arena);
        if self.eat(TokenKind::RightParen).is_none() {
            loop {
                args.push(self.parse_expr(0)?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            self.expect(TokenKind::RightParen)?;
        }
        Ok(args.into_bump_slice())
    }

    fn parse_ternary(&mut self, condition: &'ast Expr<'ast>) -> Result<&'ast Expr<'ast>, ParseError> {
        self.expect(TokenKind::Question)?;
        let then_expr = self.parse_expr(0)?;
        self.expect(TokenKind::Colon)?;
        let else_expr = self.parse_expr(TERNARY_BP.1)?;
        let span = condition.span().merge(else_expr.span());
        Ok(self.alloc(Expr::Ternary(self.arena.alloc(TernaryExpr {
            condition,
            then_expr,
            else_expr,
            span,
        }))))
    }

    fn parse_new(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let new = self.expect(TokenKind::New)?;
        let ty = self.parse_type()?;
        let args = self.parse_arguments()?;
        let span: Span = new.span.merge(self.previous().span);
        Ok(self.alloc(Expr::New(self.arena.alloc(NewExpr { ty, args, span }))))
    }
}

/// Drop digit separators and any of the given suffix characters.
fn strip_number(lexeme: &str, suffixes: &[char]) -> String {
    lexeme
        .trim_end_matches(suffixes)
        .chars()
        .filter(|&c| c != '_')
        .collect()
}

/// `2147483648` and `9223372036854775808L` are only legal after a unary
/// minus, where they denote the minimum value of their type.
fn negated_minimum<'ast>(token: Token<'ast>) -> Option<LiteralKind<'ast>> {
    match token.kind {
        TokenKind::IntLiteral if strip_number(token.lexeme, &[]) == "2147483648" => {
            Some(LiteralKind::Int(i32::MIN))
        }
        TokenKind::LongLiteral if strip_number(token.lexeme, &['l', 'L']) == "9223372036854775808" => {
            Some(LiteralKind::Long(i64::MIN))
        }
        _ => None,
    }
}

fn hex_digits(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}

fn invalid_number(token: Token<'_>) -> ParseError {
    ParseError::new(
        ParseErrorKind::InvalidNumber,
        token.span,
        format!("number '{}' is out of range", token.lexeme),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    fn parse<'a>(source: &str, arena: &'a Bump) -> &'a Expr<'a> {
        match Parser::parse_expression(source, arena) {
            Ok(expr) => expr,
            Err(errors) => panic!("failed to parse {source:?}: {errors}"),
        }
    }

    // ========================================================================
    // Literals
    // ========================================================================

    #[test]
    fn numeric_literals() {
        let arena = Bump::new();
        let cases = [
            ("42", LiteralKind::Int(42)),
            ("0xFF", LiteralKind::Int(255)),
            ("0xFFFFFFFF", LiteralKind::Int(-1)),
            ("1_000", LiteralKind::Int(1000)),
            ("7L", LiteralKind::Long(7)),
            ("1.5f", LiteralKind::Float(1.5)),
            ("2.0", LiteralKind::Double(2.0)),
            ("3d", LiteralKind::Double(3.0)),
        ];
        for (source, expected) in cases {
            match parse(source, &arena) {
                Expr::Literal(lit) => assert_eq!(lit.kind, expected, "{source}"),
                other => panic!("expected literal for {source}, got {other:?}"),
            }
        }
    }

    #[test]
    fn int_literal_overflow() {
        let arena = Bump::new();
        let errors = Parser::parse_expression("3000000000", &arena).unwrap_err();
        assert_eq!(errors.errors()[0].kind, ParseErrorKind::InvalidNumber);
        assert!(Parser::parse_expression("3000000000L", &arena).is_ok());
    }

    #[test]
    fn negated_minimum_literals() {
        let arena = Bump::new();
        match parse("-2147483648", &arena) {
            Expr::Literal(literal) => assert_eq!(literal.kind, LiteralKind::Int(i32::MIN)),
            other => panic!("expected literal, got {other:?}"),
        }
        match parse("-9223372036854775808L", &arena) {
            Expr::Literal(literal) => assert_eq!(literal.kind, LiteralKind::Long(i64::MIN)),
            other => panic!("expected literal, got {other:?}"),
        }
        match parse("-2147483648 + 1", &arena) {
            Expr::Binary(binary) => assert!(matches!(
                binary.left,
                Expr::Literal(LiteralExpr { kind: LiteralKind::Int(i32::MIN), .. })
            )),
            other => panic!("expected binary, got {other:?}"),
        }
        // Without the sign the magnitude is still out of range.
        assert!(Parser::parse_expression("2147483648", &arena).is_err());
        assert!(Parser::parse_expression("-(2147483648)", &arena).is_err());
    }

    #[test]
    fn string_escapes() {
        let arena = Bump::new();
        match parse(r#""a\tb\"cA""#, &arena) {
            Expr::Literal(LiteralExpr {
                kind: LiteralKind::String(s),
                ..
            }) => assert_eq!(*s, "a\tb\"cA"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    // ========================================================================
    // Precedence
    // ========================================================================

    #[test]
    fn multiplication_binds_tighter() {
        let arena = Bump::new();
        match parse("a + b * c", &arena) {
            Expr::Binary(bin) => {
                assert_eq!(bin.op, BinaryOp::Add);
                assert!(matches!(bin.right, Expr::Binary(r) if r.op == BinaryOp::Mul));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn comparison_of_sums() {
        let arena = Bump::new();
        match parse("x + y < z", &arena) {
            Expr::Binary(bin) => {
                assert_eq!(bin.op, BinaryOp::Less);
                assert!(matches!(bin.left, Expr::Binary(l) if l.op == BinaryOp::Add));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn ternary_with_comparison_condition() {
        let arena = Bump::new();
        match parse("a ? x + y : z * f", &arena) {
            Expr::Ternary(t) => {
                assert!(matches!(t.condition, Expr::Ident(_)));
                assert!(matches!(t.then_expr, Expr::Binary(b) if b.op == BinaryOp::Add));
                assert!(matches!(t.else_expr, Expr::Binary(b) if b.op == BinaryOp::Mul));
            }
            other => panic!("expected ternary, got {other:?}"),
        }
    }

    #[test]
    fn nested_ternary_is_right_associative() {
        let arena = Bump::new();
        match parse("a ? 1 : b ? 2 : 3", &arena) {
            Expr::Ternary(t) => assert!(matches!(t.else_expr, Expr::Ternary(_))),
            other => panic!("expected ternary, got {other:?}"),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        let arena = Bump::new();
        match parse("a = b += 2", &arena) {
            Expr::Assign(a) => {
                assert_eq!(a.op, AssignOp::Assign);
                assert!(matches!(a.value, Expr::Assign(inner) if inner.op == AssignOp::AddAssign));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn invalid_assignment_target() {
        let arena = Bump::new();
        let errors = Parser::parse_expression("a + b = c", &arena).unwrap_err();
        assert_eq!(errors.errors()[0].kind, ParseErrorKind::InvalidAssignmentTarget);
        assert!(Parser::parse_expression("1++", &arena).is_err());
    }

    // ========================================================================
    // Casts
    // ========================================================================

    #[test]
    fn boxed_cast_then_unbox() {
        let arena = Bump::new();
        match parse("(((Double) __args[0]).doubleValue())", &arena).unparenthesized() {
            Expr::Member(member) => {
                assert!(matches!(
                    member.access,
                    MemberAccess::Method { name, args } if name.name == "doubleValue" && args.is_empty()
                ));
                match member.object.unparenthesized() {
                    Expr::Cast(cast) => {
                        assert_eq!(cast.target_type.name, "Double");
                        assert!(matches!(cast.expr, Expr::Index(_)));
                    }
                    other => panic!("expected cast, got {other:?}"),
                }
            }
            other => panic!("expected member call, got {other:?}"),
        }
    }

    #[test]
    fn primitive_cast_of_parenthesized_body() {
        let arena = Bump::new();
        match parse("(double)(x + y)", &arena) {
            Expr::Cast(cast) => {
                assert!(cast.target_type.is_primitive());
                assert!(matches!(cast.expr, Expr::Paren(_)));
            }
            other => panic!("expected cast, got {other:?}"),
        }
    }

    #[test]
    fn primitive_cast_of_negation() {
        let arena = Bump::new();
        assert!(matches!(parse("(int) -x", &arena), Expr::Cast(_)));
    }

    #[test]
    fn parenthesized_name_before_operator_is_not_cast() {
        let arena = Bump::new();
        match parse("(a) + b", &arena) {
            Expr::Binary(bin) => assert!(matches!(bin.left, Expr::Paren(_))),
            other => panic!("expected binary, got {other:?}"),
        }
        assert!(matches!(parse("(a)", &arena), Expr::Paren(_)));
    }

    #[test]
    fn dotted_reference_cast() {
        let arena = Bump::new();
        match parse("((java.util.List) l).iterator()", &arena) {
            Expr::Member(member) => match member.object.unparenthesized() {
                Expr::Cast(cast) => assert_eq!(cast.target_type.name, "java.util.List"),
                other => panic!("expected cast, got {other:?}"),
            },
            other => panic!("expected member call, got {other:?}"),
        }
    }

    // ========================================================================
    // Calls, members, new
    // ========================================================================

    #[test]
    fn static_call_and_field() {
        let arena = Bump::new();
        match parse("Math.abs(a.x - b.x)", &arena) {
            Expr::Member(member) => {
                assert_eq!(member.object.dotted_path().as_deref(), Some("Math"));
                match member.access {
                    MemberAccess::Method { name, args } => {
                        assert_eq!(name.name, "abs");
                        assert_eq!(args.len(), 1);
                    }
                    MemberAccess::Field(_) => panic!("expected method"),
                }
            }
            other => panic!("expected member, got {other:?}"),
        }
    }

    #[test]
    fn new_with_arguments() {
        let arena = Bump::new();
        match parse("new java.awt.Point(a.x + b.x, 7)", &arena) {
            Expr::New(new) => {
                assert_eq!(new.ty.name, "java.awt.Point");
                assert_eq!(new.args.len(), 2);
            }
            other => panic!("expected new, got {other:?}"),
        }
    }

    #[test]
    fn unqualified_call() {
        let arena = Bump::new();
        assert!(matches!(parse("f(1, 2)", &arena), Expr::Call(c) if c.args.len() == 2));
        assert!(Parser::parse_expression("x.f()(1)", &arena).is_err());
    }

    #[test]
    fn postfix_and_prefix_increment() {
        let arena = Bump::new();
        assert!(matches!(parse("i++", &arena), Expr::Postfix(p) if p.op == PostfixOp::PostInc));
        assert!(matches!(parse("--i", &arena), Expr::Unary(u) if u.op == UnaryOp::PreDec));
    }

    #[test]
    fn missing_operand() {
        let arena = Bump::new();
        let errors = Parser::parse_expression("a +", &arena).unwrap_err();
        assert_eq!(errors.errors()[0].kind, ParseErrorKind::UnexpectedEof);
        let errors = Parser::parse_expression("a + )", &arena).unwrap_err();
        assert_eq!(errors.errors()[0].kind, ParseErrorKind::ExpectedExpression);
    }
}

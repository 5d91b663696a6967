//! Operator definitions for body expressions.
//!
//! Binary, unary, postfix and assignment operators along with the binding
//! powers the Pratt parser uses.

use crate::lexer::TokenKind;
use std::fmt;

/// Binary operators, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `||`
    LogicalOr,
    /// `&&`
    LogicalAnd,
    /// `|`
    BitwiseOr,
    /// `^`
    BitwiseXor,
    /// `&`
    BitwiseAnd,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `>>>`
    ShiftRightUnsigned,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
}

impl BinaryOp {
    /// Binding power as `(left_bp, right_bp)`. Every binary operator is
    /// left-associative, so `right_bp = left_bp + 1`.
    pub fn binding_power(&self) -> (u8, u8) {
        use BinaryOp::*;
        match self {
            LogicalOr => (5, 6),
            LogicalAnd => (7, 8),
            BitwiseOr => (9, 10),
            BitwiseXor => (11, 12),
            BitwiseAnd => (13, 14),
            Equal | NotEqual => (15, 16),
            Less | LessEqual | Greater | GreaterEqual => (17, 18),
            ShiftLeft | ShiftRight | ShiftRightUnsigned => (19, 20),
            Add | Sub => (21, 22),
            Mul | Div | Mod => (23, 24),
        }
    }

    pub fn from_token(token: TokenKind) -> Option<Self> {
        use TokenKind::*;

        Some(match token {
            PipePipe => BinaryOp::LogicalOr,
            AmpAmp => BinaryOp::LogicalAnd,
            Pipe => BinaryOp::BitwiseOr,
            Caret => BinaryOp::BitwiseXor,
            Amp => BinaryOp::BitwiseAnd,
            EqualEqual => BinaryOp::Equal,
            BangEqual => BinaryOp::NotEqual,
            Less => BinaryOp::Less,
            LessEqual => BinaryOp::LessEqual,
            Greater => BinaryOp::Greater,
            GreaterEqual => BinaryOp::GreaterEqual,
            LessLess => BinaryOp::ShiftLeft,
            GreaterGreater => BinaryOp::ShiftRight,
            GreaterGreaterGreater => BinaryOp::ShiftRightUnsigned,
            Plus => BinaryOp::Add,
            Minus => BinaryOp::Sub,
            Star => BinaryOp::Mul,
            Slash => BinaryOp::Div,
            Percent => BinaryOp::Mod,
            _ => return None,
        })
    }

    pub fn is_comparison(&self) -> bool {
        use BinaryOp::*;
        matches!(
            self,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual
        )
    }

    /// `&&` and `||`, which evaluate their right side conditionally.
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, BinaryOp::LogicalAnd | BinaryOp::LogicalOr)
    }

    pub fn as_str(&self) -> &'static str {
        use BinaryOp::*;
        match self {
            LogicalOr => "||",
            LogicalAnd => "&&",
            BitwiseOr => "|",
            BitwiseXor => "^",
            BitwiseAnd => "&",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            ShiftRightUnsigned => ">>>",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `+`
    Plus,
    /// `!`
    LogicalNot,
    /// `~`
    BitwiseNot,
    /// `++x`
    PreInc,
    /// `--x`
    PreDec,
}

impl UnaryOp {
    /// Prefix operators bind tighter than every binary operator.
    pub fn binding_power() -> u8 {
        27
    }

    pub fn from_token(token: TokenKind) -> Option<Self> {
        use TokenKind::*;

        Some(match token {
            Minus => UnaryOp::Neg,
            Plus => UnaryOp::Plus,
            Bang => UnaryOp::LogicalNot,
            Tilde => UnaryOp::BitwiseNot,
            PlusPlus => UnaryOp::PreInc,
            MinusMinus => UnaryOp::PreDec,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::LogicalNot => "!",
            UnaryOp::BitwiseNot => "~",
            UnaryOp::PreInc => "++",
            UnaryOp::PreDec => "--",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Postfix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    /// `x++`
    PostInc,
    /// `x--`
    PostDec,
}

impl PostfixOp {
    /// Postfix operators bind tightest.
    pub fn binding_power() -> u8 {
        29
    }

    pub fn from_token(token: TokenKind) -> Option<Self> {
        match token {
            TokenKind::PlusPlus => Some(PostfixOp::PostInc),
            TokenKind::MinusMinus => Some(PostfixOp::PostDec),
            _ => None,
        }
    }
}

impl fmt::Display for PostfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PostfixOp::PostInc => "++",
            PostfixOp::PostDec => "--",
        })
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
    /// `*=`
    MulAssign,
    /// `/=`
    DivAssign,
    /// `%=`
    ModAssign,
    /// `&=`
    AndAssign,
    /// `|=`
    OrAssign,
    /// `^=`
    XorAssign,
    /// `<<=`
    ShlAssign,
    /// `>>=`
    ShrAssign,
    /// `>>>=`
    UshrAssign,
}

impl AssignOp {
    /// Assignment is the loosest and right-associative.
    pub fn binding_power() -> (u8, u8) {
        (2, 1)
    }

    pub fn from_token(token: TokenKind) -> Option<Self> {
        use AssignOp::*;
        use TokenKind::*;

        Some(match token {
            Equal => Assign,
            PlusEqual => AddAssign,
            MinusEqual => SubAssign,
            StarEqual => MulAssign,
            SlashEqual => DivAssign,
            PercentEqual => ModAssign,
            AmpEqual => AndAssign,
            PipeEqual => OrAssign,
            CaretEqual => XorAssign,
            LessLessEqual => ShlAssign,
            GreaterGreaterEqual => ShrAssign,
            GreaterGreaterGreaterEqual => UshrAssign,
            _ => return None,
        })
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Assign)
    }

    /// The binary operator a compound assignment applies, or `None` for `=`.
    pub fn binary_op(&self) -> Option<BinaryOp> {
        use AssignOp::*;
        Some(match self {
            Assign => return None,
            AddAssign => BinaryOp::Add,
            SubAssign => BinaryOp::Sub,
            MulAssign => BinaryOp::Mul,
            DivAssign => BinaryOp::Div,
            ModAssign => BinaryOp::Mod,
            AndAssign => BinaryOp::BitwiseAnd,
            OrAssign => BinaryOp::BitwiseOr,
            XorAssign => BinaryOp::BitwiseXor,
            ShlAssign => BinaryOp::ShiftLeft,
            ShrAssign => BinaryOp::ShiftRight,
            UshrAssign => BinaryOp::ShiftRightUnsigned,
        })
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.binary_op() {
            Some(op) => write!(f, "{op}="),
            None => f.write_str("="),
        }
    }
}

/// Binding power of the conditional `? :` operator, just above assignment.
pub const TERNARY_BP: (u8, u8) = (4, 3);

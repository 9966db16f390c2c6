//! Pratt expression parser tables: precedence and handler dispatch.

use crate::ast::{BinaryOp, PrefixOp};
use crate::lexer::{Keyword, TokenKind};

/// Operator precedence, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    /// OR
    Or,
    /// AND
    And,
    /// = == != AS
    Equals,
    /// < > <= >= LIKE NOT IN BETWEEN
    LessGreater,
    /// + - | & \
    Sum,
    /// * /
    Product,
    /// -x !x NOT x
    Prefix,
    /// f(x)
    Call,
    /// a[x]
    Index,
}

impl Precedence {
    /// Returns the binding precedence of a token in infix position.
    ///
    /// Tokens that cannot continue an expression return `Lowest`.
    #[must_use]
    pub const fn of(kind: &TokenKind) -> Self {
        match kind {
            TokenKind::Keyword(Keyword::Or) => Self::Or,
            TokenKind::Keyword(Keyword::And) => Self::And,
            TokenKind::Assign
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Keyword(Keyword::As) => Self::Equals,
            TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::Keyword(
                Keyword::Like | Keyword::Not | Keyword::In | Keyword::Between,
            ) => Self::LessGreater,
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::BitOr
            | TokenKind::BitAnd
            | TokenKind::Backslash => Self::Sum,
            TokenKind::Star | TokenKind::Slash => Self::Product,
            TokenKind::LeftParen => Self::Call,
            TokenKind::LeftBracket => Self::Index,
            _ => Self::Lowest,
        }
    }
}

/// A way to start an expression from the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixRule {
    Identifier,
    Integer,
    String,
    Boolean,
    /// `! - NOT` applied to an operand.
    Operator(PrefixOp),
    /// `*` read as a name.
    Wildcard,
    /// `(SELECT ...)`; declines when `(` is not followed by SELECT.
    SubSelect,
    /// `( condition )`
    Grouped,
}

impl PrefixRule {
    /// Returns the candidate rules for a token, in the order they are tried.
    #[must_use]
    pub const fn candidates(kind: &TokenKind) -> &'static [Self] {
        match kind {
            TokenKind::Identifier => &[Self::Identifier],
            TokenKind::Integer => &[Self::Integer],
            TokenKind::String(_) => &[Self::String],
            TokenKind::Keyword(Keyword::True | Keyword::False) => &[Self::Boolean],
            TokenKind::Bang => &[Self::Operator(PrefixOp::Bang)],
            TokenKind::Minus => &[Self::Operator(PrefixOp::Neg)],
            TokenKind::Keyword(Keyword::Not) => &[Self::Operator(PrefixOp::Not)],
            TokenKind::Star => &[Self::Wildcard],
            TokenKind::LeftParen => &[Self::SubSelect, Self::Grouped],
            _ => &[],
        }
    }
}

/// A way to continue an expression with the token after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixRule {
    /// A plain binary operator.
    Binary(BinaryOp),
    /// `AND` / `OR`; the result is wrapped in a condition node.
    Condition(BinaryOp),
    /// `expr AS alias`
    Alias,
    /// `name(args)`
    Call,
    /// `expr[index]`
    Index,
    /// `expr IN (...)`
    In,
    /// `expr BETWEEN low AND high`
    Between,
    /// `NOT IN`, `NOT BETWEEN`, `NOT LIKE`
    Not,
}

impl InfixRule {
    /// Returns the infix rule registered for a token, if any.
    #[must_use]
    pub const fn of(kind: &TokenKind) -> Option<Self> {
        if let Some(op) = token_to_binary_op(kind) {
            return Some(match op {
                BinaryOp::And | BinaryOp::Or => Self::Condition(op),
                BinaryOp::As => Self::Alias,
                _ => Self::Binary(op),
            });
        }
        match kind {
            TokenKind::LeftParen => Some(Self::Call),
            TokenKind::LeftBracket => Some(Self::Index),
            TokenKind::Keyword(Keyword::In) => Some(Self::In),
            TokenKind::Keyword(Keyword::Between) => Some(Self::Between),
            TokenKind::Keyword(Keyword::Not) => Some(Self::Not),
            _ => None,
        }
    }
}

/// Converts a token to a binary operator.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Assign => Some(BinaryOp::Assign),
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Backslash => Some(BinaryOp::Backslash),
        TokenKind::BitOr => Some(BinaryOp::BitOr),
        TokenKind::BitAnd => Some(BinaryOp::BitAnd),
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        TokenKind::Keyword(Keyword::Like) => Some(BinaryOp::Like),
        TokenKind::Keyword(Keyword::As) => Some(BinaryOp::As),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        assert!(Precedence::of(&TokenKind::Star) > Precedence::of(&TokenKind::Plus));
        assert!(
            Precedence::of(&TokenKind::Keyword(Keyword::And))
                > Precedence::of(&TokenKind::Keyword(Keyword::Or))
        );
        assert!(
            Precedence::of(&TokenKind::Assign) > Precedence::of(&TokenKind::Keyword(Keyword::And))
        );
        assert!(Precedence::of(&TokenKind::Lt) > Precedence::of(&TokenKind::Assign));
        assert!(Precedence::of(&TokenKind::LeftBracket) > Precedence::of(&TokenKind::LeftParen));
    }

    #[test]
    fn test_non_operators_are_lowest() {
        assert_eq!(Precedence::of(&TokenKind::Comma), Precedence::Lowest);
        assert_eq!(Precedence::of(&TokenKind::Identifier), Precedence::Lowest);
        assert_eq!(
            Precedence::of(&TokenKind::Keyword(Keyword::From)),
            Precedence::Lowest
        );
    }

    #[test]
    fn test_alias_binds_like_equality() {
        assert_eq!(
            Precedence::of(&TokenKind::Keyword(Keyword::As)),
            Precedence::of(&TokenKind::Assign)
        );
    }

    #[test]
    fn test_paren_prefix_candidates_in_order() {
        assert_eq!(
            PrefixRule::candidates(&TokenKind::LeftParen),
            &[PrefixRule::SubSelect, PrefixRule::Grouped]
        );
        assert!(PrefixRule::candidates(&TokenKind::Comma).is_empty());
        assert!(PrefixRule::candidates(&TokenKind::Illegal).is_empty());
    }

    #[test]
    fn test_infix_rules() {
        assert_eq!(
            InfixRule::of(&TokenKind::Keyword(Keyword::And)),
            Some(InfixRule::Condition(BinaryOp::And))
        );
        assert_eq!(
            InfixRule::of(&TokenKind::Keyword(Keyword::As)),
            Some(InfixRule::Alias)
        );
        assert_eq!(
            InfixRule::of(&TokenKind::GtEq),
            Some(InfixRule::Binary(BinaryOp::GtEq))
        );
        assert_eq!(InfixRule::of(&TokenKind::LeftParen), Some(InfixRule::Call));
        assert_eq!(InfixRule::of(&TokenKind::Comma), None);
    }

    #[test]
    fn test_token_to_binary_op() {
        assert_eq!(token_to_binary_op(&TokenKind::Plus), Some(BinaryOp::Add));
        assert_eq!(token_to_binary_op(&TokenKind::NotEq), Some(BinaryOp::NotEq));
        assert_eq!(token_to_binary_op(&TokenKind::LeftParen), None);
    }
}

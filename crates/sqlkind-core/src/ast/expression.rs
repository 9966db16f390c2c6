//! Expression AST types.

use core::fmt;

use super::statement::{JoinClause, OrderItem, SelectStatement, Source};
use crate::lexer::Quote;

/// A possibly dotted name: `id`, `users.id`, `t.*` or the bare wildcard `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// The full name, dots included.
    pub value: String,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns true for `*` and `table.*`.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.value == "*" || self.value.ends_with(".*")
    }
}

/// An integer literal. The source text is kept so rendering reproduces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerLiteral {
    /// The parsed value.
    pub value: i64,
    /// The digits as written.
    pub text: String,
}

impl IntegerLiteral {
    /// Creates an integer literal from its value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self {
            value,
            text: value.to_string(),
        }
    }
}

/// A quoted string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    /// The unquoted body.
    pub value: String,
    /// The quote character that delimited it.
    pub quote: Quote,
}

impl StringLiteral {
    /// Creates a new string literal.
    #[must_use]
    pub fn new(value: impl Into<String>, quote: Quote) -> Self {
        Self {
            value: value.into(),
            quote,
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    /// `!`
    Bang,
    /// `-`
    Neg,
    /// `NOT`
    Not,
}

impl PrefixOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bang => "!",
            Self::Neg => "-",
            Self::Not => "NOT",
        }
    }
}

/// Binary (infix) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Comparison
    Assign,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Backslash,

    // Bitwise
    BitOr,
    BitAnd,

    // Logical
    And,
    Or,

    // Pattern matching
    Like,
    NotLike,

    // Aliasing
    As,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Backslash => "\\",
            Self::BitOr => "|",
            Self::BitAnd => "&",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::As => "AS",
        }
    }

    /// Returns true for `AND` and `OR`.
    #[must_use]
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// The right-hand side of an `IN` predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum InList {
    /// `IN (a, b, c)`; may be empty.
    Values(Vec<Expr>),
    /// `IN (SELECT ...)`
    Query(Box<SelectStatement>),
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column or table name, or a wildcard.
    Identifier(Identifier),

    /// An integer literal.
    Integer(IntegerLiteral),

    /// A quoted string literal.
    String(StringLiteral),

    /// `TRUE` or `FALSE`.
    Boolean(bool),

    /// A prefix expression.
    Prefix {
        /// Operator.
        op: PrefixOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// An infix expression.
    Infix {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// A function call.
    Call {
        /// The called expression (a name).
        function: Box<Expr>,
        /// The arguments.
        args: Vec<Expr>,
    },

    /// `left[index]`
    Index {
        /// The indexed expression.
        left: Box<Expr>,
        /// The index.
        index: Box<Expr>,
    },

    /// A condition wrapper. It carries no meaning of its own and renders
    /// as its inner expression.
    Condition(Box<Expr>),

    /// `column [NOT] IN (...)`
    In {
        /// The tested expression.
        column: Box<Expr>,
        /// The values or sub-query.
        list: InList,
        /// Whether this is NOT IN.
        negated: bool,
    },

    /// `column [NOT] BETWEEN low AND high`
    Between {
        /// The tested expression.
        column: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether this is NOT BETWEEN.
        negated: bool,
    },

    /// A join descriptor.
    Join(Box<JoinClause>),

    /// A source descriptor (FROM, JOIN and GROUP BY items).
    Source(Box<Source>),

    /// An ORDER BY item.
    Order(Box<OrderItem>),

    /// A parenthesized sub-select.
    SubSelect(Box<SelectStatement>),
}

impl Expr {
    /// Creates an identifier expression.
    #[must_use]
    pub fn identifier(value: impl Into<String>) -> Self {
        Self::Identifier(Identifier::new(value))
    }

    /// Creates an integer literal expression.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::Integer(IntegerLiteral::new(value))
    }

    /// Creates a single-quoted string literal expression.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(StringLiteral::new(value, Quote::Single))
    }

    /// Creates an infix expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::Infix {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// Wraps this expression in a condition node.
    #[must_use]
    pub fn condition(self) -> Self {
        Self::Condition(Box::new(self))
    }

    /// Looks through any number of condition wrappers.
    #[must_use]
    pub fn unwrap_condition(&self) -> &Self {
        let mut expr = self;
        while let Self::Condition(inner) = expr {
            expr = &**inner;
        }
        expr
    }

    /// Returns true if this (unwrapped) expression is an integer literal.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self.unwrap_condition(), Self::Integer(_))
    }

    /// Returns a short name for the node type, e.g. `"call"`.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Identifier(_) => "identifier",
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Prefix { .. } => "prefix",
            Self::Infix { .. } => "infix",
            Self::Call { .. } => "call",
            Self::Index { .. } => "index",
            Self::Condition(_) => "condition",
            Self::In { .. } => "in",
            Self::Between { .. } => "between",
            Self::Join(_) => "join",
            Self::Source(_) => "source",
            Self::Order(_) => "order",
            Self::SubSelect(_) => "sub-select",
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Display for IntegerLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = self.quote.as_char();
        write!(f, "{q}{}{q}", self.value)
    }
}

/// Writes `items` separated by `sep`.
pub(crate) fn write_separated<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    sep: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

pub(crate) const fn not_prefix(negated: bool) -> &'static str {
    if negated {
        "NOT "
    } else {
        ""
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::Integer(lit) => write!(f, "{lit}"),
            Self::String(lit) => write!(f, "{lit}"),
            Self::Boolean(value) => f.write_str(if *value { "TRUE" } else { "FALSE" }),
            Self::Prefix { op, operand } => match op {
                PrefixOp::Not => write!(f, "(NOT {operand})"),
                _ => write!(f, "({}{operand})", op.as_str()),
            },
            Self::Infix {
                left,
                op: BinaryOp::As,
                right,
            } => write!(f, "{left} AS {right}"),
            Self::Infix { left, op, right } => write!(f, "({left} {} {right})", op.as_str()),
            Self::Call { function, args } => {
                write!(f, "{function}(")?;
                write_separated(f, args, ", ")?;
                f.write_str(")")
            }
            Self::Index { left, index } => write!(f, "({left}[{index}])"),
            Self::Condition(inner) => write!(f, "{inner}"),
            Self::In {
                column,
                list,
                negated,
            } => {
                write!(f, "{column} {}IN (", not_prefix(*negated))?;
                match list {
                    InList::Values(values) => write_separated(f, values, ", ")?,
                    InList::Query(query) => query.fmt_body(f)?,
                }
                f.write_str(")")
            }
            Self::Between {
                column,
                low,
                high,
                negated,
            } => write!(
                f,
                "{column} {}BETWEEN {low} AND {high}",
                not_prefix(*negated)
            ),
            Self::Join(join) => write!(f, "{join}"),
            Self::Source(source) => write!(f, "{source}"),
            Self::Order(item) => write!(f, "{item}"),
            Self::SubSelect(query) => {
                f.write_str("(")?;
                query.fmt_body(f)?;
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infix_renders_parenthesized() {
        let expr = Expr::identifier("id").binary(BinaryOp::Assign, Expr::integer(100));
        assert_eq!(expr.to_string(), "(id = 100)");
    }

    #[test]
    fn test_alias_renders_without_parens() {
        let expr = Expr::identifier("date").binary(BinaryOp::As, Expr::identifier("dt"));
        assert_eq!(expr.to_string(), "date AS dt");
    }

    #[test]
    fn test_prefix_rendering() {
        let neg = Expr::Prefix {
            op: PrefixOp::Neg,
            operand: Box::new(Expr::integer(5)),
        };
        let not = Expr::Prefix {
            op: PrefixOp::Not,
            operand: Box::new(Expr::identifier("active")),
        };
        assert_eq!(neg.to_string(), "(-5)");
        assert_eq!(not.to_string(), "(NOT active)");
    }

    #[test]
    fn test_string_keeps_quote() {
        let lit = StringLiteral::new("abc", Quote::Backtick);
        assert_eq!(lit.to_string(), "`abc`");
        assert_eq!(Expr::string("x").to_string(), "'x'");
    }

    #[test]
    fn test_in_and_between_rendering() {
        let empty = Expr::In {
            column: Box::new(Expr::identifier("a")),
            list: InList::Values(vec![]),
            negated: false,
        };
        assert_eq!(empty.to_string(), "a IN ()");

        let not_in = Expr::In {
            column: Box::new(Expr::identifier("a")),
            list: InList::Values(vec![Expr::integer(1), Expr::integer(2)]),
            negated: true,
        };
        assert_eq!(not_in.to_string(), "a NOT IN (1, 2)");

        let between = Expr::Between {
            column: Box::new(Expr::identifier("x")),
            low: Box::new(Expr::integer(1)),
            high: Box::new(Expr::integer(9)),
            negated: false,
        };
        assert_eq!(between.to_string(), "x BETWEEN 1 AND 9");
    }

    #[test]
    fn test_condition_is_transparent() {
        let inner = Expr::identifier("a").binary(BinaryOp::Eq, Expr::identifier("b"));
        let wrapped = inner.clone().condition().condition();
        assert_eq!(wrapped.to_string(), inner.to_string());
        assert_eq!(wrapped.unwrap_condition(), &inner);
    }

    #[test]
    fn test_call_and_index() {
        let call = Expr::Call {
            function: Box::new(Expr::identifier("now")),
            args: vec![],
        };
        assert_eq!(call.to_string(), "now()");

        let index = Expr::Index {
            left: Box::new(Expr::identifier("arr")),
            index: Box::new(Expr::integer(0)),
        };
        assert_eq!(index.to_string(), "(arr[0])");
    }

    #[test]
    fn test_identifier_wildcard() {
        assert!(Identifier::new("*").is_wildcard());
        assert!(Identifier::new("t.*").is_wildcard());
        assert!(!Identifier::new("t.id").is_wildcard());
    }
}

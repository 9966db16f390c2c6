//! SQL statement AST types.

use core::fmt;

use super::expression::{write_separated, Expr, IntegerLiteral};

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Join type, as given by the modifier in front of `JOIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    /// A bare `JOIN`.
    #[default]
    Plain,
    /// INNER JOIN.
    Inner,
    /// LEFT JOIN.
    Left,
    /// RIGHT JOIN.
    Right,
    /// CROSS JOIN.
    Cross,
}

impl JoinType {
    /// Returns the modifier keyword, empty for a plain join.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Cross => "CROSS",
        }
    }
}

/// A table-like source with an optional alias.
///
/// Used for FROM and JOIN tables and for GROUP BY items.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    /// The source expression (usually a name).
    pub value: Expr,
    /// Alias: an identifier or a quoted string.
    pub alias: Option<Expr>,
}

impl Source {
    /// Creates a source without alias.
    #[must_use]
    pub const fn new(value: Expr) -> Self {
        Self { value, alias: None }
    }

    /// Sets the alias.
    #[must_use]
    pub fn with_alias(mut self, alias: Expr) -> Self {
        self.alias = Some(alias);
        self
    }
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    /// The expression to order by.
    pub value: Expr,
    /// Explicit direction, if any.
    pub direction: Option<OrderDirection>,
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// The type of join.
    pub join_type: JoinType,
    /// Whether `OUTER` was given.
    pub outer: bool,
    /// The joined table.
    pub table: Source,
    /// ON conditions; empty when there is no ON.
    pub on: Vec<Expr>,
}

/// A SELECT statement.
///
/// Every clause is a list; an empty list means the clause is absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectStatement {
    /// The selected columns.
    pub columns: Vec<Expr>,
    /// FROM sources ([`Expr::Source`]).
    pub from: Vec<Expr>,
    /// Joins ([`Expr::Join`]).
    pub joins: Vec<Expr>,
    /// WHERE conditions.
    pub where_clause: Vec<Expr>,
    /// GROUP BY items ([`Expr::Source`]).
    pub group_by: Vec<Expr>,
    /// ORDER BY items ([`Expr::Order`]).
    pub order_by: Vec<Expr>,
    /// LIMIT.
    pub limit: Option<IntegerLiteral>,
    /// OFFSET, given as `LIMIT offset, limit`.
    pub offset: Option<IntegerLiteral>,
}

impl SelectStatement {
    /// Renders the statement without the trailing `;`.
    pub(crate) fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT")?;
        if !self.columns.is_empty() {
            f.write_str(" ")?;
            write_separated(f, &self.columns, ", ")?;
        }
        if !self.from.is_empty() {
            f.write_str(" FROM ")?;
            write_separated(f, &self.from, ", ")?;
        }
        for join in &self.joins {
            write!(f, " {join}")?;
        }
        if !self.where_clause.is_empty() {
            // Conditions have no separator in the grammar.
            f.write_str(" WHERE ")?;
            write_separated(f, &self.where_clause, " ")?;
        }
        if !self.group_by.is_empty() {
            f.write_str(" GROUP BY ")?;
            write_separated(f, &self.group_by, ", ")?;
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            write_separated(f, &self.order_by, ", ")?;
        }
        if let Some(limit) = &self.limit {
            match &self.offset {
                Some(offset) => write!(f, " LIMIT {offset}, {limit}")?,
                None => write!(f, " LIMIT {limit}")?,
            }
        }
        Ok(())
    }
}

/// A sequence of statements separated by `;`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// The successfully parsed statements.
    pub statements: Vec<SelectStatement>,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} AS {alias}", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

impl fmt::Display for OrderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Some(direction) => write!(f, "{} {direction}", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

impl fmt::Display for JoinClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.join_type != JoinType::Plain {
            write!(f, "{} ", self.join_type.as_str())?;
        }
        if self.outer {
            f.write_str("OUTER ")?;
        }
        write!(f, "JOIN {}", self.table)?;
        if !self.on.is_empty() {
            f.write_str(" ON ")?;
            write_separated(f, &self.on, " ")?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_body(f)?;
        f.write_str(";")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_separated(f, &self.statements, "\n")
    }
}

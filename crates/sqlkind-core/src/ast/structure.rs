//! Value-erased rendering.
//!
//! Structural rendering prints an expression the way [`Display`](fmt::Display)
//! does, except that integer and string literals become `?`, `IN` lists
//! collapse to `(?)` and `BETWEEN` bounds become `? AND ?`. A negated integer
//! literal erases to a single `?`. Operands of an `AND`/`OR` chain are
//! sorted, so predicate order does not change the text.
//!
//! Canonical rendering applies the same chain sorting but keeps every value.

use core::fmt;

use super::expression::{not_prefix, BinaryOp, Expr, InList, PrefixOp};
use super::statement::{JoinClause, JoinType, OrderItem, SelectStatement, Source};

/// The value placeholder.
pub const PLACEHOLDER: &str = "?";

/// Display adapter that renders a node with sorted `AND`/`OR` chains,
/// erasing values unless built by `canonical()`.
#[derive(Debug, Clone, Copy)]
pub struct Structure<'a, T> {
    node: &'a T,
    erase: bool,
}


impl Expr {
    /// Returns a displayable value-erased rendering of this expression.
    #[must_use]
    pub const fn structure(&self) -> Structure<'_, Self> {
        Structure {
            node: self,
            erase: true,
        }
    }

    /// Returns a displayable rendering that keeps values but sorts the
    /// operands of `AND`/`OR` chains.
    #[must_use]
    pub const fn canonical(&self) -> Structure<'_, Self> {
        Structure {
            node: self,
            erase: false,
        }
    }
}

impl SelectStatement {
    /// Returns a displayable value-erased rendering of this statement,
    /// without the trailing `;`.
    #[must_use]
    pub const fn structure(&self) -> Structure<'_, Self> {
        Structure {
            node: self,
            erase: true,
        }
    }

    /// Returns a displayable canonical rendering of this statement,
    /// without the trailing `;`.
    #[must_use]
    pub const fn canonical(&self) -> Structure<'_, Self> {
        Structure {
            node: self,
            erase: false,
        }
    }
}

impl<T> Structure<'_, T> {
    /// Renders a child node in the same mode.
    const fn child<'b, U>(&self, node: &'b U) -> Structure<'b, U> {
        Structure {
            node,
            erase: self.erase,
        }
    }

    fn write_all<'b, U: 'b>(
        &self,
        f: &mut fmt::Formatter<'_>,
        items: impl IntoIterator<Item = &'b U>,
        sep: &str,
    ) -> fmt::Result
    where
        Structure<'b, U>: fmt::Display,
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", self.child(item))?;
        }
        Ok(())
    }
}

/// Collects the operands of a chain of `op`, looking through condition
/// wrappers.
fn collect_chain<'a>(expr: &'a Expr, op: BinaryOp, out: &mut Vec<&'a Expr>) {
    match expr.unwrap_condition() {
        Expr::Infix {
            left,
            op: inner,
            right,
        } if *inner == op => {
            collect_chain(left, op, out);
            collect_chain(right, op, out);
        }
        other => out.push(other),
    }
}

impl fmt::Display for Structure<'_, Expr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Expr::Identifier(_) | Expr::Boolean(_) => write!(f, "{}", self.node),
            Expr::Integer(_) | Expr::String(_) if self.erase => f.write_str(PLACEHOLDER),
            Expr::Integer(_) | Expr::String(_) => write!(f, "{}", self.node),
            Expr::Prefix {
                op: PrefixOp::Neg,
                operand,
            } if self.erase && operand.is_integer() => f.write_str(PLACEHOLDER),
            Expr::Prefix { op, operand } => match op {
                PrefixOp::Not => write!(f, "(NOT {})", self.child(&**operand)),
                _ => write!(f, "({}{})", op.as_str(), self.child(&**operand)),
            },
            Expr::Infix {
                left,
                op: BinaryOp::As,
                right,
            } => write!(f, "{} AS {right}", self.child(&**left)),
            Expr::Infix { op, .. } if op.is_logical() => {
                let mut operands = Vec::new();
                collect_chain(self.node, *op, &mut operands);
                let mut rendered: Vec<String> = operands
                    .iter()
                    .map(|operand| self.child(*operand).to_string())
                    .collect();
                rendered.sort_by(|a, b| b.cmp(a));
                let sep = format!(" {} ", op.as_str());
                write!(f, "({})", rendered.join(sep.as_str()))
            }
            Expr::Infix { left, op, right } => write!(
                f,
                "({} {} {})",
                self.child(&**left),
                op.as_str(),
                self.child(&**right)
            ),
            Expr::Call { function, args } => {
                write!(f, "{}(", self.child(&**function))?;
                self.write_all(f, args, ", ")?;
                f.write_str(")")
            }
            Expr::Index { left, index } => {
                write!(f, "({}[{}])", self.child(&**left), self.child(&**index))
            }
            Expr::Condition(inner) => write!(f, "{}", self.child(&**inner)),
            Expr::In {
                column,
                list,
                negated,
            } => {
                write!(f, "{} {}IN (", self.child(&**column), not_prefix(*negated))?;
                match list {
                    InList::Values(_) if self.erase => f.write_str(PLACEHOLDER)?,
                    InList::Values(values) => self.write_all(f, values, ", ")?,
                    InList::Query(query) => write!(f, "{}", self.child(&**query))?,
                }
                f.write_str(")")
            }
            Expr::Between {
                column, negated, ..
            } if self.erase => write!(
                f,
                "{} {}BETWEEN {PLACEHOLDER} AND {PLACEHOLDER}",
                self.child(&**column),
                not_prefix(*negated)
            ),
            Expr::Between {
                column,
                low,
                high,
                negated,
            } => write!(
                f,
                "{} {}BETWEEN {} AND {}",
                self.child(&**column),
                not_prefix(*negated),
                self.child(&**low),
                self.child(&**high)
            ),
            Expr::Join(join) => write!(f, "{}", self.child(&**join)),
            Expr::Source(source) => write!(f, "{}", self.child(&**source)),
            Expr::Order(item) => write!(f, "{}", self.child(&**item)),
            Expr::SubSelect(query) => write!(f, "({})", self.child(&**query)),
        }
    }
}

impl fmt::Display for Structure<'_, Source> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.child(&self.node.value))?;
        if let Some(alias) = &self.node.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Structure<'_, OrderItem> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.child(&self.node.value))?;
        if let Some(direction) = self.node.direction {
            write!(f, " {direction}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Structure<'_, JoinClause> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = self.node;
        if join.join_type != JoinType::Plain {
            write!(f, "{} ", join.join_type.as_str())?;
        }
        if join.outer {
            f.write_str("OUTER ")?;
        }
        write!(f, "JOIN {}", self.child(&join.table))?;
        if !join.on.is_empty() {
            f.write_str(" ON ")?;
            self.write_all(f, &join.on, " ")?;
        }
        Ok(())
    }
}

impl fmt::Display for Structure<'_, SelectStatement> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stmt = self.node;
        f.write_str("SELECT")?;
        if !stmt.columns.is_empty() {
            f.write_str(" ")?;
            self.write_all(f, &stmt.columns, ", ")?;
        }
        if !stmt.from.is_empty() {
            f.write_str(" FROM ")?;
            self.write_all(f, &stmt.from, ", ")?;
        }
        for join in &stmt.joins {
            write!(f, " {}", self.child(join))?;
        }
        if !stmt.where_clause.is_empty() {
            f.write_str(" WHERE ")?;
            self.write_all(f, &stmt.where_clause, " ")?;
        }
        if !stmt.group_by.is_empty() {
            f.write_str(" GROUP BY ")?;
            self.write_all(f, &stmt.group_by, ", ")?;
        }
        if !stmt.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            self.write_all(f, &stmt.order_by, ", ")?;
        }
        match (&stmt.limit, &stmt.offset) {
            (None, _) => {}
            (Some(_), Some(_)) if self.erase => write!(f, " LIMIT {PLACEHOLDER}, {PLACEHOLDER}")?,
            (Some(_), None) if self.erase => write!(f, " LIMIT {PLACEHOLDER}")?,
            (Some(limit), Some(offset)) => write!(f, " LIMIT {offset}, {limit}")?,
            (Some(limit), None) => write!(f, " LIMIT {limit}")?,
        }
        Ok(())
    }
}

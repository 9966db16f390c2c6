//! Abstract Syntax Tree (AST) types for SQL statements.

mod expression;
mod statement;
mod structure;

pub use expression::{
    BinaryOp, Expr, Identifier, InList, IntegerLiteral, PrefixOp, StringLiteral,
};
pub use statement::{
    JoinClause, JoinType, OrderDirection, OrderItem, Program, SelectStatement, Source,
};
pub use structure::{Structure, PLACEHOLDER};

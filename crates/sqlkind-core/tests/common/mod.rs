#![allow(dead_code)]

use sqlkind_core::ast::SelectStatement;
use sqlkind_core::{Expr, ParseError, Parser};

pub fn parse(sql: &str) -> SelectStatement {
    sqlkind_core::parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

/// Returns every diagnostic for `sql`, asserting there is at least one.
pub fn parse_errors(sql: &str) -> Vec<ParseError> {
    let errors = sqlkind_core::parse(sql)
        .expect_err(&format!("Expected parse error for: {sql}"))
        .0;
    assert!(!errors.is_empty());
    errors
}

/// Runs the statement parser directly, keeping both the best-effort tree
/// and the diagnostics.
pub fn parse_lenient(sql: &str) -> (Option<SelectStatement>, Vec<ParseError>) {
    let mut parser = Parser::new(sql);
    let stmt = parser.parse_select_statement();
    (stmt, parser.into_errors())
}

/// Parses a standalone condition.
pub fn condition(sql: &str) -> Expr {
    let mut parser = Parser::new(sql);
    let expr = parser
        .parse_condition()
        .unwrap_or_else(|| panic!("Failed to parse condition: {sql}\n{:?}", parser.errors()));
    assert!(
        parser.errors().is_empty(),
        "Unexpected errors for {sql}: {:?}",
        parser.errors()
    );
    expr
}

/// Asserts the literal rendering of `sql`.
pub fn assert_renders(sql: &str, expected: &str) {
    assert_eq!(parse(sql).to_string(), expected, "Input: {sql}");
}

/// Verifies that `to_string()` produces a fixed point:
/// parse(sql).to_string() can be re-parsed and yields the same
/// string again.
pub fn round_trip(sql: &str) {
    let ast1 = parse(sql);
    let rendered1 = ast1.to_string();
    let ast2 = parse(&rendered1);
    let rendered2 = ast2.to_string();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}

//! Tests for conditions and expressions: precedence, prefix operators,
//! calls, index access, IN, BETWEEN and the NOT forms.

mod common;
use common::*;

use sqlkind_core::ast::{BinaryOp, InList, PrefixOp};
use sqlkind_core::Expr;

#[test]
fn comparison_binds_tighter_than_and() {
    assert_eq!(
        condition("a = 1 and b = 2").to_string(),
        "((a = 1) AND (b = 2))"
    );
}

#[test]
fn and_binds_tighter_than_or() {
    assert_eq!(
        condition("a = 1 or b = 2 and c = 3").to_string(),
        "((a = 1) OR ((b = 2) AND (c = 3)))"
    );
}

#[test]
fn arithmetic_precedence() {
    assert_eq!(condition("a + b * c").to_string(), "(a + (b * c))");
    assert_eq!(condition("a * b - c / d").to_string(), "((a * b) - (c / d))");
    assert_eq!(condition("a - b - c").to_string(), "((a - b) - c)");
}

#[test]
fn comparison_operators() {
    for (sql, rendered) in [
        ("a == 1", "(a == 1)"),
        ("a != 1", "(a != 1)"),
        ("a <> 1", "(a != 1)"),
        ("a < 1", "(a < 1)"),
        ("a <= 1", "(a <= 1)"),
        ("a > 1", "(a > 1)"),
        ("a >= 1", "(a >= 1)"),
        ("a | 1", "(a | 1)"),
        ("a & 1", "(a & 1)"),
    ] {
        assert_eq!(condition(sql).to_string(), rendered, "Input: {sql}");
    }
}

#[test]
fn and_or_produce_condition_nodes() {
    let expr = condition("a = 1 and b = 2");
    let Expr::Condition(outer) = &expr else {
        panic!("Expected condition, got {expr:?}");
    };
    assert!(matches!(
        &**outer,
        Expr::Condition(inner) if matches!(&**inner, Expr::Infix { op: BinaryOp::And, .. })
    ));
}

#[test]
fn prefix_operators() {
    assert_eq!(condition("-5").to_string(), "(-5)");
    assert_eq!(condition("!active").to_string(), "(!active)");
    assert_eq!(condition("not active").to_string(), "(NOT active)");
    assert!(matches!(
        condition("-a").unwrap_condition(),
        Expr::Prefix { op: PrefixOp::Neg, .. }
    ));
}

#[test]
fn grouping_overrides_precedence() {
    assert_eq!(condition("(a + b) * c").to_string(), "((a + b) * c)");
    assert_eq!(
        condition("(a = 1 or b = 2) and c = 3").to_string(),
        "(((a = 1) OR (b = 2)) AND (c = 3))"
    );
}

#[test]
fn booleans() {
    assert_eq!(condition("active = true").to_string(), "(active = TRUE)");
    assert_eq!(condition("FALSE").unwrap_condition(), &Expr::Boolean(false));
}

#[test]
fn dotted_identifiers() {
    assert_eq!(condition("u.id").unwrap_condition(), &Expr::identifier("u.id"));
    assert_eq!(condition("db.t.col").to_string(), "db.t.col");
    assert_eq!(condition("t.*").to_string(), "t.*");
    // Keywords are names after a dot.
    assert_eq!(condition("t.order").to_string(), "t.order");
}

#[test]
fn function_calls() {
    assert_eq!(condition("count(*)").to_string(), "count(*)");
    assert_eq!(condition("now()").to_string(), "now()");
    assert_eq!(
        condition("coalesce(a, 'x', 1 + 2)").to_string(),
        "coalesce(a, 'x', (1 + 2))"
    );
    assert!(matches!(
        condition("max(id)").unwrap_condition(),
        Expr::Call { args, .. } if args.len() == 1
    ));
}

#[test]
fn call_only_follows_a_name() {
    // A parenthesized group is never called; the second group is left for
    // the caller.
    let mut parser = sqlkind_core::Parser::new("(a = 1) (b = 2)");
    let first = parser.parse_condition().unwrap();
    assert_eq!(first.to_string(), "(a = 1)");
    assert!(parser.errors().is_empty());
}

#[test]
fn index_access() {
    assert_eq!(condition("tags[0]").to_string(), "(tags[0])");
    assert_eq!(condition("tags[i + 1]").to_string(), "(tags[(i + 1)])");
}

#[test]
fn in_list() {
    let expr = condition("id in (1, 2, 3)");
    match expr.unwrap_condition() {
        Expr::In {
            list: InList::Values(values),
            negated: false,
            ..
        } => assert_eq!(values.len(), 3),
        other => panic!("Expected IN, got {other:?}"),
    }
    assert_eq!(expr.to_string(), "id IN (1, 2, 3)");
}

#[test]
fn in_sub_select() {
    let expr = condition("id in (select user_id from orders where total > 10)");
    assert!(matches!(
        expr.unwrap_condition(),
        Expr::In { list: InList::Query(_), .. }
    ));
    assert_eq!(
        expr.to_string(),
        "id IN (SELECT user_id FROM orders WHERE (total > 10))"
    );
}

#[test]
fn not_forms() {
    assert_eq!(condition("a not in (1, 2)").to_string(), "a NOT IN (1, 2)");
    assert_eq!(
        condition("a not between 1 and 5").to_string(),
        "a NOT BETWEEN 1 AND 5"
    );
    assert_eq!(
        condition("name not like 'a%'").to_string(),
        "(name NOT LIKE 'a%')"
    );
}

#[test]
fn between_leaves_following_and_alone() {
    let expr = condition("x between 1 and 5 and y = 2");
    assert_eq!(expr.to_string(), "(x BETWEEN 1 AND 5 AND (y = 2))");
    assert!(matches!(
        expr.unwrap_condition(),
        Expr::Infix { op: BinaryOp::And, .. }
    ));
}

#[test]
fn between_bounds_may_be_sums() {
    assert_eq!(
        condition("x between a + 1 and b - 1").to_string(),
        "x BETWEEN (a + 1) AND (b - 1)"
    );
}

#[test]
fn like() {
    assert_eq!(
        condition("name like \"%bob%\"").to_string(),
        "(name LIKE \"%bob%\")"
    );
}

#[test]
fn sub_select_as_expression() {
    assert_eq!(
        condition("(SELECT name from t join t2 ON (a=b))").to_string(),
        "(SELECT name FROM t JOIN t2 ON (a = b))"
    );
    assert!(matches!(
        condition("(select 1)").unwrap_condition(),
        Expr::SubSelect(_)
    ));
}

#[test]
fn sub_select_compared() {
    assert_eq!(
        condition("total > (select avg(total) from orders)").to_string(),
        "(total > (SELECT avg(total) FROM orders))"
    );
}

//! SQL Parser implementation.
//!
//! The parser keeps a two-token window (`current`, `peek`). Every item
//! parser starts with `current` on the item's first token and returns with
//! `current` on its last token; clause loops advance past it. Diagnostics
//! are accumulated instead of returned, so a failed parse still reports
//! everything it found.

use tracing::trace;

use super::error::ParseError;
use super::pratt::{InfixRule, Precedence, PrefixRule};
use crate::ast::{
    BinaryOp, Expr, InList, IntegerLiteral, JoinClause, JoinType, OrderDirection, OrderItem,
    Program, SelectStatement, Source, StringLiteral,
};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};

const fn kw(keyword: Keyword) -> TokenKind {
    TokenKind::Keyword(keyword)
}

/// Keywords that can open a join clause.
const JOIN_START: &[TokenKind] = &[
    kw(Keyword::Inner),
    kw(Keyword::Left),
    kw(Keyword::Right),
    kw(Keyword::Cross),
    kw(Keyword::Outer),
    kw(Keyword::Join),
];

// Clause terminators, on top of `;`, EOF and `)` inside a sub-select.
const COLUMN_STOPS: &[TokenKind] = &[
    kw(Keyword::From),
    kw(Keyword::Where),
    kw(Keyword::Group),
    kw(Keyword::Order),
    kw(Keyword::Limit),
];
const SOURCE_STOPS: &[TokenKind] = &[
    kw(Keyword::Where),
    kw(Keyword::Group),
    kw(Keyword::Order),
    kw(Keyword::Limit),
    kw(Keyword::Inner),
    kw(Keyword::Left),
    kw(Keyword::Right),
    kw(Keyword::Cross),
    kw(Keyword::Outer),
    kw(Keyword::Join),
];
const WHERE_STOPS: &[TokenKind] = &[
    kw(Keyword::Group),
    kw(Keyword::Order),
    kw(Keyword::Limit),
];
/// Deepest recursion into nested expressions.
pub const MAX_NESTING: usize = 64;
/// Most levels an expression tree may span, counting operators that
/// chain to the left.
pub const MAX_HEIGHT: usize = 512;

const GROUP_STOPS: &[TokenKind] = &[kw(Keyword::Order), kw(Keyword::Limit)];
const ORDER_STOPS: &[TokenKind] = &[kw(Keyword::Limit)];

/// SQL Parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
    errors: Vec<ParseError>,
    /// Sub-select nesting depth; `)` closes clauses when non-zero.
    depth: usize,
    /// Expression recursion depth.
    nesting: usize,
    /// Deepest tree level reached by the expression being built.
    level: usize,
    /// Number of tokens consumed so far.
    position: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
            depth: 0,
            nesting: 0,
            level: 0,
            position: 0,
        }
    }

    /// Returns the diagnostics recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Consumes the parser and returns its diagnostics.
    #[must_use]
    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Parses every `;`-separated statement in the input.
    ///
    /// Statements that fail to parse, or that do not start with `SELECT`,
    /// are skipped up to the next `;` after recording a diagnostic.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while !self.check(TokenKind::Eof) {
            if self.check(TokenKind::Semicolon) {
                self.advance();
                continue;
            }
            match self.parse_select_statement() {
                Some(stmt) => program.statements.push(stmt),
                None => self.skip_statement(),
            }
            if self.check(TokenKind::Semicolon) {
                self.advance();
            }
        }
        program
    }

    /// Parses one SELECT statement starting at the current token.
    ///
    /// Returns `None` when the statement had to be abandoned; the reason is
    /// in [`Parser::errors`]. A returned statement may still come with
    /// (soft) diagnostics.
    pub fn parse_select_statement(&mut self) -> Option<SelectStatement> {
        if !self.check_keyword(Keyword::Select) {
            self.error_unexpected("SELECT");
            return None;
        }
        trace!(depth = self.depth, "parse_select_statement");
        self.advance();

        let mut stmt = SelectStatement {
            columns: self.parse_list(COLUMN_STOPS, false, Self::parse_column)?,
            ..SelectStatement::default()
        };

        if self.check_keyword(Keyword::From) {
            self.advance();
            stmt.from = self.parse_list(SOURCE_STOPS, true, Self::parse_source)?;
            if stmt.from.is_empty() {
                self.error_unexpected("source after FROM");
                return None;
            }
        }

        while self.check_any(JOIN_START) {
            let join = self.parse_join()?;
            stmt.joins.push(join);
        }

        if self.check_keyword(Keyword::Where) {
            self.advance();
            stmt.where_clause = self.parse_conditions(WHERE_STOPS);
            if stmt.where_clause.is_empty() {
                self.error_unexpected("condition after WHERE");
                return None;
            }
        }

        if self.check_keyword(Keyword::Group) {
            if !self.expect_peek(kw(Keyword::By), "BY") {
                return None;
            }
            self.advance();
            stmt.group_by = self.parse_list(GROUP_STOPS, true, Self::parse_source)?;
            if stmt.group_by.is_empty() {
                self.error_unexpected("expression after GROUP BY");
                return None;
            }
        }

        if self.check_keyword(Keyword::Order) {
            if !self.expect_peek(kw(Keyword::By), "BY") {
                return None;
            }
            self.advance();
            stmt.order_by = self.parse_list(ORDER_STOPS, true, Self::parse_order_item)?;
            if stmt.order_by.is_empty() {
                self.error_unexpected("expression after ORDER BY");
                return None;
            }
        }

        if self.check_keyword(Keyword::Limit) {
            let (offset, limit) = self.parse_limit()?;
            stmt.offset = offset;
            stmt.limit = Some(limit);
        }

        let terminated = if self.depth > 0 {
            self.check(TokenKind::RightParen)
        } else {
            self.check(TokenKind::Semicolon) || self.check(TokenKind::Eof)
        };
        if !terminated {
            let expected = if self.depth > 0 { ")" } else { "; or end of input" };
            self.error_unexpected(expected);
            return None;
        }

        Some(stmt)
    }

    /// Parses a parenthesized sub-select; `current` must be the `(`.
    pub fn parse_sub_select(&mut self) -> Option<Expr> {
        if !self.check(TokenKind::LeftParen) {
            self.error_unexpected("(");
            return None;
        }
        if !self.expect_peek(kw(Keyword::Select), "SELECT") {
            return None;
        }
        let query = self.parse_nested_select()?;
        Some(Expr::SubSelect(Box::new(query)))
    }

    /// Parses a condition: an expression wrapped in a condition node.
    pub fn parse_condition(&mut self) -> Option<Expr> {
        self.parse_expression(Precedence::Lowest)
            .map(Expr::condition)
    }

    /// Parses one selected column.
    ///
    /// An infix column whose right side is an integer is reported, but kept.
    pub fn parse_column(&mut self) -> Option<Expr> {
        trace!(token = %self.current.kind, "parse_column");
        let expr = self.parse_expression(Precedence::Lowest)?;
        if let Expr::Infix { right, .. } = &expr {
            if right.is_integer() {
                self.error_here("right node is integer");
            }
        }
        Some(expr)
    }

    /// Parses a FROM, JOIN or GROUP BY source with its optional alias.
    pub fn parse_source(&mut self) -> Option<Expr> {
        self.parse_source_item()
            .map(|source| Expr::Source(Box::new(source)))
    }

    /// Parses an ORDER BY item with its optional direction.
    pub fn parse_order_item(&mut self) -> Option<Expr> {
        trace!(token = %self.current.kind, "parse_order_item");
        let value = self.parse_expression(Precedence::Lowest)?;
        let direction = match self.peek.kind {
            TokenKind::Keyword(Keyword::Asc) => Some(OrderDirection::Asc),
            TokenKind::Keyword(Keyword::Desc) => Some(OrderDirection::Desc),
            _ => None,
        };
        if direction.is_some() {
            self.advance();
        }
        Some(Expr::Order(Box::new(OrderItem { value, direction })))
    }

    // Clause machinery

    /// Parses comma-separated items until a clause terminator.
    ///
    /// With `abandon` set, a failed item abandons the whole statement.
    fn parse_list(
        &mut self,
        stops: &[TokenKind],
        abandon: bool,
        mut item: impl FnMut(&mut Self) -> Option<Expr>,
    ) -> Option<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.at_clause_end(stops) {
            match item(self) {
                Some(expr) => items.push(expr),
                None if abandon => return None,
                None => {}
            }
            self.advance();

            if self.check(TokenKind::Comma) {
                self.advance();
                if self.at_clause_end(stops) {
                    self.error_unexpected("expression after ,");
                }
            } else if !self.at_clause_end(stops) {
                self.error_unexpected(",");
            }
        }
        Some(items)
    }

    /// Parses conditions until a clause terminator. Conditions have no
    /// separator.
    fn parse_conditions(&mut self, stops: &[TokenKind]) -> Vec<Expr> {
        let mut conditions = Vec::new();
        while !self.at_clause_end(stops) {
            if let Some(condition) = self.parse_condition() {
                conditions.push(condition);
            }
            self.advance();
        }
        conditions
    }

    fn parse_source_item(&mut self) -> Option<Source> {
        trace!(token = %self.current.kind, "parse_source");
        let value = self.parse_expression(Precedence::Equals)?;
        match &value {
            Expr::Integer(_) => self.error_here("source is integer"),
            Expr::Infix { left, right, .. } => {
                if left.is_integer() {
                    self.error_here("left node is integer");
                } else if right.is_integer() {
                    self.error_here("right node is integer");
                }
            }
            _ => {}
        }

        let mut source = Source::new(value);
        if self.peek_is(kw(Keyword::As)) {
            self.advance();
            self.advance();
            source.alias = Some(self.parse_alias()?);
        } else if matches!(
            self.peek.kind,
            TokenKind::Identifier | TokenKind::String(_)
        ) {
            self.advance();
            source.alias = Some(self.parse_alias()?);
        }
        Some(source)
    }

    fn parse_alias(&mut self) -> Option<Expr> {
        match self.current.kind {
            TokenKind::Identifier => Some(Expr::identifier(self.current.literal.clone())),
            TokenKind::String(quote) => Some(Expr::String(StringLiteral::new(
                self.current.literal.clone(),
                quote,
            ))),
            _ => {
                self.error_unexpected("alias");
                None
            }
        }
    }

    /// Parses `[modifiers] JOIN source [ON conditions]`.
    fn parse_join(&mut self) -> Option<Expr> {
        trace!(token = %self.current.kind, "parse_join");
        let mut join_type = JoinType::Plain;
        let mut outer = false;
        while !self.check_keyword(Keyword::Join) {
            match self.current.kind {
                TokenKind::Keyword(Keyword::Inner) => join_type = JoinType::Inner,
                TokenKind::Keyword(Keyword::Left) => join_type = JoinType::Left,
                TokenKind::Keyword(Keyword::Right) => join_type = JoinType::Right,
                TokenKind::Keyword(Keyword::Cross) => join_type = JoinType::Cross,
                TokenKind::Keyword(Keyword::Outer) => outer = true,
                _ => {
                    self.error_unexpected("JOIN");
                    return None;
                }
            }
            self.advance();
        }
        self.advance();

        let table = self.parse_source_item()?;
        self.advance();

        let mut on = Vec::new();
        if self.check_keyword(Keyword::On) {
            self.advance();
            on = self.parse_conditions(SOURCE_STOPS);
            if on.is_empty() {
                self.error_unexpected("condition after ON");
                return None;
            }
        }

        Some(Expr::Join(Box::new(JoinClause {
            join_type,
            outer,
            table,
            on,
        })))
    }

    /// Parses `LIMIT n` or `LIMIT offset, n`. Leaves `current` past it.
    fn parse_limit(&mut self) -> Option<(Option<IntegerLiteral>, IntegerLiteral)> {
        if !self.expect_peek(TokenKind::Integer, "integer") {
            return None;
        }
        let first = self.parse_integer_literal()?;
        self.advance();

        if !self.check(TokenKind::Comma) {
            return Some((None, first));
        }
        if !self.expect_peek(TokenKind::Integer, "integer") {
            return None;
        }
        let limit = self.parse_integer_literal()?;
        self.advance();
        Some((Some(first), limit))
    }

    /// Parses a SELECT nested in parentheses; `current` is the SELECT.
    /// Returns with `current` on the closing `)`.
    fn parse_nested_select(&mut self) -> Option<SelectStatement> {
        self.depth += 1;
        let stmt = self.parse_select_statement();
        self.depth -= 1;
        stmt
    }

    fn skip_statement(&mut self) {
        while !self.check(TokenKind::Semicolon) && !self.check(TokenKind::Eof) {
            self.advance();
        }
    }

    // Expressions

    /// Parses an expression whose root sits one level below the caller's.
    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        if self.nesting == MAX_NESTING {
            self.error_here("expression nested too deeply");
            return None;
        }
        let outer_level = self.level;
        self.nesting += 1;
        self.level = self.nesting;
        let expr = self.parse_expression_at(precedence);
        self.nesting -= 1;
        self.level = self.level.max(outer_level);
        expr
    }

    fn parse_expression_at(&mut self, precedence: Precedence) -> Option<Expr> {
        trace!(token = %self.current.kind, ?precedence, "parse_expression");
        let mut left = self.parse_prefix()?;

        while precedence < Precedence::of(&self.peek.kind) {
            let Some(rule) = InfixRule::of(&self.peek.kind) else {
                break;
            };
            // Only a name can be called.
            if rule == InfixRule::Call && !matches!(left, Expr::Identifier(_)) {
                break;
            }
            // The new node pushes everything parsed so far one level down.
            if self.level == MAX_HEIGHT {
                self.errors.push(ParseError::new(
                    "expression nested too deeply",
                    self.peek.span,
                ));
                return None;
            }
            self.level += 1;
            self.advance();
            left = self.parse_infix(rule, left)?;
        }

        Some(left)
    }

    /// Tries the prefix rules of the current token in order. A rule that
    /// declines without consuming a token lets the next one run.
    fn parse_prefix(&mut self) -> Option<Expr> {
        let candidates = PrefixRule::candidates(&self.current.kind);
        if candidates.is_empty() {
            let message = if self.check(TokenKind::Illegal) {
                format!(
                    "no prefix parse function for {} `{}`",
                    self.current.kind, self.current.literal
                )
            } else {
                format!("no prefix parse function for {}", self.current.kind)
            };
            self.error_here(message);
            return None;
        }

        for &rule in candidates {
            let start = self.position;
            trace!(?rule, "prefix");
            if let Some(expr) = self.apply_prefix(rule) {
                return Some(expr);
            }
            if self.position != start {
                return None;
            }
        }
        None
    }

    fn apply_prefix(&mut self, rule: PrefixRule) -> Option<Expr> {
        match rule {
            PrefixRule::Identifier => self.parse_identifier(),
            PrefixRule::Integer => self.parse_integer_literal().map(Expr::Integer),
            PrefixRule::String => match self.current.kind {
                TokenKind::String(quote) => Some(Expr::String(StringLiteral::new(
                    self.current.literal.clone(),
                    quote,
                ))),
                _ => None,
            },
            PrefixRule::Boolean => Some(Expr::Boolean(self.check_keyword(Keyword::True))),
            PrefixRule::Operator(op) => {
                self.advance();
                let operand = self.parse_expression(Precedence::Prefix)?;
                Some(Expr::Prefix {
                    op,
                    operand: Box::new(operand),
                })
            }
            PrefixRule::Wildcard => Some(Expr::identifier("*")),
            PrefixRule::SubSelect => {
                if !self.peek_is(kw(Keyword::Select)) {
                    return None;
                }
                self.advance();
                let query = self.parse_nested_select()?;
                Some(Expr::SubSelect(Box::new(query)))
            }
            PrefixRule::Grouped => {
                self.advance();
                let condition = self.parse_condition()?;
                if !self.expect_peek(TokenKind::RightParen, ")") {
                    return None;
                }
                Some(condition)
            }
        }
    }

    /// Parses a possibly dotted name: `a`, `a.b.c`, `t.*`.
    fn parse_identifier(&mut self) -> Option<Expr> {
        let mut value = self.current.literal.clone();
        while self.peek_is(TokenKind::Dot) {
            self.advance();
            match self.peek.kind {
                TokenKind::Identifier | TokenKind::Keyword(_) => {
                    self.advance();
                    value.push('.');
                    value.push_str(&self.current.literal);
                }
                TokenKind::Star => {
                    self.advance();
                    value.push_str(".*");
                    break;
                }
                _ => {
                    self.error_peek("identifier after .");
                    return None;
                }
            }
        }
        Some(Expr::identifier(value))
    }

    fn parse_integer_literal(&mut self) -> Option<IntegerLiteral> {
        if let Ok(value) = self.current.literal.parse::<i64>() {
            Some(IntegerLiteral {
                value,
                text: self.current.literal.clone(),
            })
        } else {
            let message = format!("could not parse {:?} as integer", self.current.literal);
            self.error_here(message);
            None
        }
    }

    /// Applies an infix rule; `current` is the operator token.
    fn parse_infix(&mut self, rule: InfixRule, left: Expr) -> Option<Expr> {
        trace!(?rule, token = %self.current.kind, "infix");
        match rule {
            InfixRule::Binary(op) => self.parse_binary(op, left),
            InfixRule::Condition(op) => self.parse_binary(op, left).map(Expr::condition),
            InfixRule::Alias => self.parse_binary(BinaryOp::As, left),
            InfixRule::Call => {
                let args = self.parse_expression_list(TokenKind::RightParen, ")")?;
                Some(Expr::Call {
                    function: Box::new(left),
                    args,
                })
            }
            InfixRule::Index => {
                self.advance();
                let index = self.parse_expression(Precedence::Lowest)?;
                if !self.expect_peek(TokenKind::RightBracket, "]") {
                    return None;
                }
                Some(Expr::Index {
                    left: Box::new(left),
                    index: Box::new(index),
                })
            }
            InfixRule::In => self.parse_in(left, false),
            InfixRule::Between => self.parse_between(left, false),
            InfixRule::Not => match self.peek.kind {
                TokenKind::Keyword(Keyword::In) => {
                    self.advance();
                    self.parse_in(left, true)
                }
                TokenKind::Keyword(Keyword::Between) => {
                    self.advance();
                    self.parse_between(left, true)
                }
                TokenKind::Keyword(Keyword::Like) => {
                    self.advance();
                    self.parse_binary(BinaryOp::NotLike, left)
                }
                _ => {
                    self.error_peek("IN, BETWEEN or LIKE after NOT");
                    None
                }
            },
        }
    }

    fn parse_binary(&mut self, op: BinaryOp, left: Expr) -> Option<Expr> {
        let precedence = Precedence::of(&self.current.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(left.binary(op, right))
    }

    /// `column [NOT] IN (values)` or `column [NOT] IN (SELECT ...)`.
    fn parse_in(&mut self, column: Expr, negated: bool) -> Option<Expr> {
        if !self.expect_peek(TokenKind::LeftParen, "(") {
            return None;
        }
        let list = if self.peek_is(kw(Keyword::Select)) {
            self.advance();
            InList::Query(Box::new(self.parse_nested_select()?))
        } else {
            InList::Values(self.parse_expression_list(TokenKind::RightParen, ")")?)
        };
        Some(Expr::In {
            column: Box::new(column),
            list,
            negated,
        })
    }

    /// Bounds bind at comparison level so the separating AND is left alone.
    fn parse_between(&mut self, column: Expr, negated: bool) -> Option<Expr> {
        self.advance();
        let low = self.parse_expression(Precedence::LessGreater)?;
        if !self.expect_peek(kw(Keyword::And), "AND") {
            return None;
        }
        self.advance();
        let high = self.parse_expression(Precedence::LessGreater)?;
        Some(Expr::Between {
            column: Box::new(column),
            low: Box::new(low),
            high: Box::new(high),
            negated,
        })
    }

    /// Parses a comma-separated list; `current` is the opening delimiter.
    fn parse_expression_list(&mut self, end: TokenKind, label: &str) -> Option<Vec<Expr>> {
        let mut list = Vec::new();
        if self.peek_is(end) {
            self.advance();
            return Some(list);
        }

        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end, label) {
            return None;
        }
        Some(list)
    }

    // Helper methods

    fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.current = core::mem::replace(&mut self.peek, next);
        self.position += 1;
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind.is_keyword(keyword)
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current.kind)
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Advances if the next token is `kind`; records an error otherwise.
    fn expect_peek(&mut self, kind: TokenKind, expected: &str) -> bool {
        if self.peek_is(kind) {
            self.advance();
            true
        } else {
            self.error_peek(expected);
            false
        }
    }

    fn at_clause_end(&self, stops: &[TokenKind]) -> bool {
        matches!(self.current.kind, TokenKind::Semicolon | TokenKind::Eof)
            || (self.depth > 0 && self.check(TokenKind::RightParen))
            || self.check_any(stops)
    }

    fn error_here(&mut self, message: impl Into<String>) {
        self.errors
            .push(ParseError::new(message, self.current.span));
    }

    fn error_unexpected(&mut self, expected: &str) {
        self.errors.push(ParseError::unexpected(
            expected,
            self.current.kind,
            self.current.span,
        ));
    }

    fn error_peek(&mut self, expected: &str) {
        self.errors
            .push(ParseError::unexpected(expected, self.peek.kind, self.peek.span));
    }
}

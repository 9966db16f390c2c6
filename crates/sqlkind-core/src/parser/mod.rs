//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.

mod error;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;

pub use error::{ParseError, ParseErrors};
pub use parser::{Parser, MAX_HEIGHT, MAX_NESTING};
pub use pratt::{InfixRule, Precedence, PrefixRule};

use crate::ast::SelectStatement;
use crate::lexer::Span;

/// Parses a single SELECT statement.
///
/// # Errors
///
/// Returns every recorded diagnostic if there was at least one, even when
/// a best-effort tree was built.
pub fn parse(input: &str) -> Result<SelectStatement, ParseErrors> {
    let mut parser = Parser::new(input);
    let statement = parser.parse_select_statement();
    let mut errors = parser.into_errors();

    match statement {
        Some(statement) if errors.is_empty() => Ok(statement),
        _ => {
            if errors.is_empty() {
                errors.push(ParseError::new("could not parse statement", Span::at(0)));
            }
            Err(ParseErrors(errors))
        }
    }
}

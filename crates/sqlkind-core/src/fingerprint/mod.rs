//! Query-shape fingerprints.
//!
//! A fingerprint is the SHA-256 of a canonical text built from the selected
//! clauses of a statement. Each clause contributes its items rendered to
//! text with sorted `AND`/`OR` chains (value-erased with
//! [`SegmentMask::SKIP_VALUES`]), sorted in
//! descending order, every item followed by `|`, and one more `|` to close
//! the clause. Absent clauses contribute nothing and LIMIT never does.

mod segment;

pub use segment::SegmentMask;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::ast::{Expr, SelectStatement};
use crate::error::{FingerprintError, Result};
use crate::parser::parse;

/// Terminates every fragment and every non-empty clause.
pub const DELIMITER: char = '|';

/// Computes the fingerprint of a query.
///
/// Whitespace-only input hashes the empty text.
///
/// # Errors
///
/// Returns [`FingerprintError::Parse`] if the query produced any parse
/// diagnostic.
pub fn fingerprint(text: &str, mask: SegmentMask) -> Result<String> {
    canonical_text(text, mask).map(|canonical| digest(&canonical))
}

/// Returns the text that [`fingerprint`] hashes.
///
/// # Errors
///
/// Returns [`FingerprintError::Parse`] if the query produced any parse
/// diagnostic.
pub fn canonical_text(text: &str, mask: SegmentMask) -> Result<String> {
    if text.trim().is_empty() {
        return Ok(String::new());
    }
    let statement = parse(text).map_err(|errors| {
        debug!(errors = errors.len(), "query did not parse");
        FingerprintError::Parse(errors)
    })?;
    Ok(canonical_statement(&statement, mask))
}

/// Fingerprints an already parsed statement.
#[must_use]
pub fn fingerprint_statement(statement: &SelectStatement, mask: SegmentMask) -> String {
    digest(&canonical_statement(statement, mask))
}

/// Builds the canonical text of a parsed statement.
#[must_use]
pub fn canonical_statement(statement: &SelectStatement, mask: SegmentMask) -> String {
    let clauses: [(SegmentMask, &[Expr]); 6] = [
        (SegmentMask::COLUMNS, statement.columns.as_slice()),
        (SegmentMask::FROM, statement.from.as_slice()),
        (SegmentMask::JOIN, statement.joins.as_slice()),
        (SegmentMask::WHERE, statement.where_clause.as_slice()),
        (SegmentMask::GROUP, statement.group_by.as_slice()),
        (SegmentMask::ORDER, statement.order_by.as_slice()),
    ];
    let skip_values = mask.contains(SegmentMask::SKIP_VALUES);

    let mut buffer = String::new();
    let mut fragments = 0;
    for (segment, exprs) in clauses {
        if mask.contains(segment) {
            fragments += write_segment(&mut buffer, exprs, skip_values);
        }
    }
    debug!(%mask, fragments, len = buffer.len(), "canonical text built");
    buffer
}

/// Appends one clause; returns the number of fragments written.
fn write_segment(buffer: &mut String, exprs: &[Expr], skip_values: bool) -> usize {
    if exprs.is_empty() {
        return 0;
    }
    let mut fragments: Vec<String> = exprs
        .iter()
        .map(|expr| {
            if skip_values {
                expr.structure().to_string()
            } else {
                expr.canonical().to_string()
            }
        })
        .collect();
    fragments.sort_by(|a, b| b.cmp(a));

    for fragment in &fragments {
        buffer.push_str(fragment);
        buffer.push(DELIMITER);
    }
    buffer.push(DELIMITER);
    fragments.len()
}

fn digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

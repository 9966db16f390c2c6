//! Groups a stream of queries into query kinds.
//!
//! Every non-blank line is one query. Queries that share a fingerprint
//! belong to the same kind; the first query seen stands in as its example.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use sqlkind_core::{fingerprint_statement, FingerprintError, SegmentMask};
use tracing::{debug, warn};

use crate::error::{CliError, Result};

/// One group of queries sharing a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryKind {
    /// Hex SHA-256 fingerprint.
    pub fingerprint: String,
    /// The first query seen with this fingerprint.
    pub example: String,
    /// Number of queries with this fingerprint.
    pub count: usize,
}

/// The result of grouping a query stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Kinds, most frequent first; ties keep first-appearance order.
    pub kinds: Vec<QueryKind>,
    /// Lines that failed to decode or parse.
    pub skipped: usize,
    /// Non-blank lines read.
    pub total: usize,
}

/// Accumulates query kinds line by line.
#[derive(Debug)]
pub struct Aggregator {
    mask: SegmentMask,
    strict: bool,
    kinds: Vec<QueryKind>,
    by_fingerprint: HashMap<String, usize>,
    skipped: usize,
    total: usize,
    line: usize,
}

impl Aggregator {
    /// Creates an aggregator that fingerprints with `mask`.
    ///
    /// In strict mode the first unparseable query is an error; otherwise it
    /// is logged and counted as skipped.
    #[must_use]
    pub fn new(mask: SegmentMask, strict: bool) -> Self {
        Self {
            mask,
            strict,
            kinds: Vec::new(),
            by_fingerprint: HashMap::new(),
            skipped: 0,
            total: 0,
            line: 0,
        }
    }

    /// Adds one input line. Blank lines are ignored but still counted for
    /// line numbers.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Query`] in strict mode if the query does not
    /// parse.
    pub fn push(&mut self, line: &str) -> Result<()> {
        self.line += 1;
        let query = line.trim();
        if query.is_empty() {
            return Ok(());
        }
        self.total += 1;

        let statement = match sqlkind_core::parse(query) {
            Ok(statement) => statement,
            Err(errors) => {
                let source = FingerprintError::from(errors);
                if self.strict {
                    return Err(CliError::Query {
                        line: self.line,
                        source,
                    });
                }
                warn!(line = self.line, error = %source, "skipping query");
                self.skipped += 1;
                return Ok(());
            }
        };

        let fingerprint = fingerprint_statement(&statement, self.mask);
        if let Some(&index) = self.by_fingerprint.get(&fingerprint) {
            self.kinds[index].count += 1;
        } else {
            debug!(line = self.line, %fingerprint, "new query kind");
            self.by_fingerprint
                .insert(fingerprint.clone(), self.kinds.len());
            self.kinds.push(QueryKind {
                fingerprint,
                example: query.to_string(),
                count: 1,
            });
        }
        Ok(())
    }

    /// Adds one raw input line that may not be valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Encoding`] in strict mode for an undecodable
    /// line, otherwise what [`Aggregator::push`] returns.
    pub fn push_bytes(&mut self, line: &[u8]) -> Result<()> {
        if let Ok(line) = std::str::from_utf8(line) {
            return self.push(line);
        }
        self.line += 1;
        self.total += 1;
        if self.strict {
            return Err(CliError::Encoding { line: self.line });
        }
        warn!(line = self.line, "skipping line with invalid UTF-8");
        self.skipped += 1;
        Ok(())
    }

    /// Returns the kinds seen so far, most frequent first.
    #[must_use]
    pub fn finish(self) -> Report {
        let mut kinds = self.kinds;
        // Stable, so equal counts stay in first-appearance order.
        kinds.sort_by(|a, b| b.count.cmp(&a.count));
        Report {
            kinds,
            skipped: self.skipped,
            total: self.total,
        }
    }
}

/// Groups every line of `reader`.
///
/// # Errors
///
/// Returns an error if reading fails, or on the first unparseable query in
/// strict mode.
pub fn aggregate_reader(
    mut reader: impl BufRead,
    mask: SegmentMask,
    strict: bool,
) -> Result<Report> {
    let mut aggregator = Aggregator::new(mask, strict);
    let mut buffer = Vec::new();
    while reader.read_until(b'\n', &mut buffer)? > 0 {
        aggregator.push_bytes(&buffer)?;
        buffer.clear();
    }
    Ok(aggregator.finish())
}

/// Groups every line of the file at `path`.
///
/// # Errors
///
/// See [`aggregate_reader`]; also fails if the file cannot be opened.
pub fn aggregate_file(path: &Path, mask: SegmentMask, strict: bool) -> Result<Report> {
    let file = File::open(path)?;
    aggregate_reader(BufReader::new(file), mask, strict)
}

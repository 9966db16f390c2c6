//! Report and query rendering for the terminal.

use core::fmt;
use std::io::Write;

use clap::ValueEnum;
use sqlkind_core::{ParseError, Parser};

use crate::aggregate::Report;
use crate::error::Result;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One tab-separated line per kind, then a summary.
    #[default]
    Text,
    /// The whole report as a JSON document.
    Json,
}

/// Writes `report` to `out` in the given format.
///
/// # Errors
///
/// Returns an error if writing or serialization fails.
pub fn write_report(out: &mut impl Write, report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for kind in &report.kinds {
                writeln!(out, "{}\t{}\t{}", kind.count, kind.fingerprint, kind.example)?;
            }
            writeln!(
                out,
                "{} kinds, {} queries, {} skipped",
                report.kinds.len(),
                report.total,
                report.skipped
            )?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// What the parser made of a single query.
#[derive(Debug, Clone)]
pub struct Description {
    /// Canonical rendering, if a statement was built.
    pub rendered: Option<String>,
    /// Every diagnostic.
    pub errors: Vec<ParseError>,
    /// Expression kind and rendering of each selected column.
    pub columns: Vec<(&'static str, String)>,
}

impl Description {
    /// Parses `query`, keeping the best-effort tree even when there are
    /// diagnostics.
    #[must_use]
    pub fn of(query: &str) -> Self {
        let mut parser = Parser::new(query);
        let statement = parser.parse_select_statement();
        let errors = parser.into_errors();
        let columns = statement
            .as_ref()
            .map(|stmt| {
                stmt.columns
                    .iter()
                    .map(|column| (column.kind_name(), column.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            rendered: statement.map(|stmt| stmt.to_string()),
            errors,
            columns,
        }
    }

    /// Returns true if the query parsed without diagnostics.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rendered.is_some() && self.errors.is_empty()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rendered {
            Some(rendered) => writeln!(f, "{rendered}")?,
            None => writeln!(f, "(no statement)")?,
        }
        for error in &self.errors {
            writeln!(f, "error: {error}")?;
        }
        for (i, (kind, column)) in self.columns.iter().enumerate() {
            writeln!(f, "column {i}: {kind} {column}")?;
        }
        Ok(())
    }
}

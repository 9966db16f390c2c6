//! Error types for the command-line front end.

use sqlkind_core::FingerprintError;

/// Errors that can occur while reading and grouping queries.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// IO error (reading the query log, writing the report).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A query could not be fingerprinted in strict mode.
    #[error("Line {line}: {source}")]
    Query {
        /// One-based line number in the input.
        line: usize,
        /// Why the query was rejected.
        #[source]
        source: FingerprintError,
    },

    /// A line is not valid UTF-8 in strict mode.
    #[error("Line {line}: invalid UTF-8")]
    Encoding {
        /// One-based line number in the input.
        line: usize,
    },

    /// Failed to serialize the report.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

//! Error types for fingerprinting.

use crate::parser::ParseErrors;

/// Errors returned by the fingerprint engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FingerprintError {
    /// The query produced parse diagnostics. No partial fingerprint is
    /// computed for an invalid query.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseErrors),

    /// A segment name was not recognized.
    #[error("Unknown segment '{0}'")]
    UnknownSegment(String),
}

/// Result type for fingerprint operations.
pub type Result<T> = std::result::Result<T, FingerprintError>;

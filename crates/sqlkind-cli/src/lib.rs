//! Groups logged SQL queries into query kinds.
//!
//! `sqlkind-cli` is a thin consumer of [`sqlkind_core`]: it reads one query
//! per line, fingerprints each one and tallies the fingerprints. The
//! `sqlkind` binary wraps this with parse and hash front ends.
//!
//! # Example
//!
//! ```rust
//! use sqlkind_cli::aggregate::aggregate_reader;
//! use sqlkind_core::SegmentMask;
//!
//! let log = "select * from users where id = 1\nselect * from users where id = 2\n";
//! let report = aggregate_reader(log.as_bytes(), SegmentMask::default(), false)?;
//! assert_eq!(report.kinds.len(), 1);
//! assert_eq!(report.kinds[0].count, 2);
//! # Ok::<(), sqlkind_cli::CliError>(())
//! ```

pub mod aggregate;
mod error;
pub mod output;

pub use aggregate::{aggregate_file, aggregate_reader, Aggregator, QueryKind, Report};
pub use error::{CliError, Result};
pub use output::{write_report, Description, OutputFormat};

//! # sqlkind-core
//!
//! Parses a restricted SQL `SELECT` dialect and derives value-erased
//! fingerprints of query shapes.
//!
//! This crate provides:
//! - A hand-written lexer and a recursive descent parser with Pratt
//!   expression parsing
//! - An owned AST with literal and structural (value-erased) rendering
//! - A SHA-256 fingerprint over selected clauses, used to group logged
//!   queries into query kinds
//!
//! ## Fingerprints
//!
//! Queries that differ only in literal values, or in the order of the
//! items of a clause, share a fingerprint when values are skipped:
//!
//! ```rust
//! use sqlkind_core::{fingerprint, SegmentMask};
//!
//! let mask = SegmentMask::ALL | SegmentMask::SKIP_VALUES;
//! let a = fingerprint("select id, name from users where id = 1", mask)?;
//! let b = fingerprint("SELECT name, id FROM users WHERE id = 42", mask)?;
//! assert_eq!(a, b);
//!
//! let c = fingerprint("select id from orders where id = 1", mask)?;
//! assert_ne!(a, c);
//! # Ok::<(), sqlkind_core::FingerprintError>(())
//! ```
//!
//! ## Parsing
//!
//! ```rust
//! use sqlkind_core::parse;
//!
//! let stmt = parse("select * from users u where id=1 and name like 'a%'").unwrap();
//! assert_eq!(
//!     stmt.to_string(),
//!     "SELECT * FROM users AS u WHERE ((id = 1) AND (name LIKE 'a%'));"
//! );
//! ```

pub mod ast;
mod error;
pub mod fingerprint;
pub mod lexer;
pub mod parser;

pub use ast::{Expr, SelectStatement};
pub use error::{FingerprintError, Result};
pub use fingerprint::{
    canonical_statement, canonical_text, fingerprint, fingerprint_statement, SegmentMask,
};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse, ParseError, ParseErrors, Parser};

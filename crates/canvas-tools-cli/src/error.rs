//! Contains various error types.

use thiserror::Error;

/// A row of an input file that looks like data but cannot be used.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Line {line}: expected at least {expected} columns, found {found}")]
    MissingColumns {
        line: u64,
        found: usize,
        expected: usize,
    },
    #[error("Line {line}: invalid {column} '{value}'")]
    InvalidId {
        line: u64,
        column: &'static str,
        value: String,
    },
}

#![deny(clippy::print_stdout, clippy::print_stderr, clippy::unwrap_used)]

//! Contains helpful utilities shared by the canvas-tools crates.

pub mod deserialize;
pub mod error;
pub mod file_util;

pub use error::FileError;

pub type JsonError = serde_path_to_error::Error<serde_json::Error>;

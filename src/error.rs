//! Error types for termgram operations.

use std::io;
use thiserror::Error;

use crate::capability::ColorLevel;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in termgram operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from writing to the output surface.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No finite samples and no explicit range to bin over.
    #[error("empty domain: no finite samples and no explicit range")]
    EmptyDomain,

    /// Non-positive bin count/size, bad bandwidth, or similar configuration error.
    #[error("invalid bin spec: {0}")]
    InvalidBinSpec(String),

    /// Supplied grid dimensions inconsistent with the expected cell count.
    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch {
        /// Expected number of values.
        expected: usize,
        /// Number of values actually supplied.
        actual: usize,
    },

    /// Explicit capability override requests a level the terminal cannot honor.
    #[error("unsupported capability: {requested:?} requested, terminal supports {detected:?}")]
    UnsupportedCapability {
        /// The level the caller asked for.
        requested: ColorLevel,
        /// The richest level the terminal supports.
        detected: ColorLevel,
    },
}

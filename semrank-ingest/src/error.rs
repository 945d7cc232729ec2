//! Error types for the `semrank-ingest` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a corpus.
///
/// Per-unit failures (an unreadable file, a malformed row) are absorbed by
/// the loaders with a logged warning; these variants cover the failures that
/// make the whole source unusable.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The corpus root is missing or not a directory.
    #[error("invalid corpus root: {0}")]
    InvalidRoot(PathBuf),

    /// An I/O error on the source as a whole.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tabular source could not be opened or parsed at all.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column named in the mapping does not exist in the header row.
    #[error("column '{column}' not found in {path}")]
    MissingColumn {
        /// The missing column name.
        column: String,
        /// The file it was expected in.
        path: PathBuf,
    },
}

/// A convenience result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

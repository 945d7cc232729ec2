//! Error types for the `semrank-reason` crate.

use thiserror::Error;

/// Errors that can occur in reasoning operations.
#[derive(Debug, Error)]
pub enum ReasonError {
    /// The model backend returned an error or could not be reached.
    #[error("Model error ({provider}): {message}")]
    Model {
        /// The model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The model's output could not be parsed into the expected structure.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A convenience result type for reasoning operations.
pub type Result<T> = std::result::Result<T, ReasonError>;

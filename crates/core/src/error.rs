//! Error types for Stratus

use thiserror::Error;

/// Main error type for Stratus operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Size mismatch for {what}: expected {expected}, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: String,
        actual: String,
    },

    #[error("Index out of bounds: ({row}, {col}) in field of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Internal index error: {0}")]
    InternalIndex(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidParameter`] with a displayable value.
    pub fn invalid_parameter<V: std::fmt::Display>(
        name: &'static str,
        value: V,
        reason: &'static str,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Result type alias for Stratus operations
pub type Result<T> = std::result::Result<T, Error>;

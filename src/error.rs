//! Error types for kdtable.

use std::io;
use thiserror::Error;

/// Errors produced by the index, the sample file codec and the query translator.
#[derive(Debug, Error)]
pub enum KdTableError {
    /// Malformed input: sample file, insert arguments, query text or config.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A sample already exists at these exact coordinates.
    #[error("Duplicate sample at ({x:?}, {y:?})")]
    Duplicate { x: f64, y: f64 },

    /// The operation needs a non-empty index.
    #[error("Invalid state: {0}")]
    State(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl KdTableError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Validation error pinned to a 1-based line of a sample file.
    pub(crate) fn at_line(line: usize, message: impl std::fmt::Display) -> Self {
        Self::Validation(format!("line {}: {}", line, message))
    }
}

pub type Result<T> = std::result::Result<T, KdTableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = KdTableError::Duplicate { x: 4.0, y: 176.33 };
        assert_eq!(err.to_string(), "Duplicate sample at (4.0, 176.33)");

        let err = KdTableError::at_line(3, "missing criterion name");
        assert_eq!(
            err.to_string(),
            "Validation error: line 3: missing criterion name"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err: KdTableError = io_err.into();
        assert!(matches!(err, KdTableError::Io(_)));
    }
}

//! Error types for the Waylog engine.

use thiserror::Error;

/// All possible errors from the Waylog engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("missing or non-finite coordinate: {0}")]
    MissingCoordinate(&'static str),

    #[error("description too long: {words} words (max {max})")]
    DescriptionTooLong { words: usize, max: usize },

    // State errors
    #[error("invalid queue snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::MissingCoordinate("latitude");
        assert_eq!(err.to_string(), "missing or non-finite coordinate: latitude");

        let err = Error::DescriptionTooLong { words: 12, max: 10 };
        assert_eq!(err.to_string(), "description too long: 12 words (max 10)");
    }
}

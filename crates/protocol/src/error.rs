//! Error types for the hireboard-protocol crate.
//!
//! This module defines the validation errors raised when constructing or
//! editing protocol values such as stages and ratings.

use thiserror::Error;

/// Errors that can occur when validating protocol values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A stage label was empty or only whitespace.
    #[error("invalid stage label: label cannot be empty")]
    EmptyLabel,

    /// A stage key was empty or contained characters outside `[a-z0-9_-]`.
    #[error("invalid stage key: {0:?}")]
    InvalidStageKey(String),

    /// A color was not a `#RRGGBB` hex string.
    #[error("invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    /// A rating was outside `0..=5`.
    #[error("invalid rating {0}: must be between 0 and 5")]
    InvalidRating(u8),
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ProtocolError::EmptyLabel;
        assert_eq!(err.to_string(), "invalid stage label: label cannot be empty");

        let err = ProtocolError::InvalidRating(9);
        assert!(err.to_string().contains("between 0 and 5"));

        let err = ProtocolError::InvalidColor("blue".to_string());
        assert!(err.to_string().contains("#RRGGBB"));
    }
}

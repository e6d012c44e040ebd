//! Error types for flatname operations.
//!
//! This module provides the main error type [`FlatnameError`] which wraps
//! the conditions that can occur while loading and decoding element names.

use std::{io, ops::Range};

use thiserror::Error;

use flatname_core::error::DecodeError;

/// The main error type for flatname operations.
///
/// # Diagnostic Variants
///
/// The `Input` variant keeps the offending source text and, when known, the
/// byte range of the problem so front ends can render a snippet.
#[derive(Debug, Error)]
pub enum FlatnameError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {message}")]
    Input {
        message: String,
        src: String,
        span: Option<Range<usize>>,
    },
}

impl FlatnameError {
    /// Create a new `Input` error with the associated source text.
    pub fn new_input_error(
        message: impl Into<String>,
        src: impl Into<String>,
        span: Option<Range<usize>>,
    ) -> Self {
        Self::Input {
            message: message.into(),
            src: src.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use flatname_core::error::ErrorCode;

    use super::*;

    #[test]
    fn test_decode_error_is_transparent() {
        let err = FlatnameError::from(DecodeError::NotFound {
            name: "missing".to_string(),
        });

        assert_eq!(err.to_string(), "element `missing` was never added");
        assert!(matches!(err, FlatnameError::Decode(ref e) if e.code() == ErrorCode::E301));
    }

    #[test]
    fn test_input_error_message() {
        let err = FlatnameError::new_input_error("missing field `kind`", "[[element]]", Some(0..11));

        assert_eq!(err.to_string(), "Invalid input: missing field `kind`");
    }
}

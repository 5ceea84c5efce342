//! Conversion error model.

use thiserror::Error;

/// Result type used across the converter.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Conversion-level error.
///
/// Structural and missing-context errors abort the whole conversion.
/// Validation errors are fatal only in strict mode; in lenient mode the
/// violation is recorded and processing continues.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Malformed document nesting (duplicate open, unexpected close).
    #[error("malformed catalog structure: {0}")]
    Structure(String),

    /// An operation required an ancestor context that is absent.
    #[error("missing parse context: {0}")]
    MissingContext(String),

    /// A field-level business rule was violated.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Invalid converter configuration, raised before any parsing begins.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The underlying tokenizer failed to deliver events.
    #[error("catalog document could not be read: {0}")]
    Read(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }

    pub fn missing_context(msg: impl Into<String>) -> Self {
        Self::MissingContext(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }
}

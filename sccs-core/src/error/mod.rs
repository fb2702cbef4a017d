//! Core error types for SCCS

use thiserror::Error;

/// Main error type for SCCS operations
#[derive(Error, Debug)]
pub enum SccsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid word size {word_size} for sequence of length {length}")]
    InvalidWordSize { word_size: usize, length: usize },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Missing annotation: {0}")]
    MissingAnnotation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl SccsError {
    /// True for the parameter-validation family (bad word size, alphabet, bounds)
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            SccsError::InvalidParameter(_) | SccsError::InvalidWordSize { .. }
        )
    }
}

/// Result type alias for SCCS operations
pub type SccsResult<T> = Result<T, SccsError>;

impl From<serde_json::Error> for SccsError {
    fn from(err: serde_json::Error) -> Self {
        SccsError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for SccsError {
    fn from(err: anyhow::Error) -> Self {
        SccsError::Other(err.to_string())
    }
}

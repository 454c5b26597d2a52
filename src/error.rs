use thiserror::Error;

use crate::parameters::{ParameterError, SerializationError};

/// Error types for the classparams-rs library.
#[derive(Error, Debug)]
pub enum ClassParamsError {
    /// Error raised by parameter resolution, binding or lookup.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

impl From<SerializationError> for ClassParamsError {
    fn from(err: SerializationError) -> Self {
        match err {
            SerializationError::IoError(e) => ClassParamsError::IoError(e),
            SerializationError::JsonError(e) => ClassParamsError::JsonError(e),
        }
    }
}

/// Result type alias for classparams-rs operations.
pub type Result<T> = std::result::Result<T, ClassParamsError>;

/// Extensions for converting from other error types.
impl From<String> for ClassParamsError {
    fn from(s: String) -> Self {
        ClassParamsError::Other(s)
    }
}

impl From<&str> for ClassParamsError {
    fn from(s: &str) -> Self {
        ClassParamsError::Other(s.to_string())
    }
}

//! Error types for the drift-bagging crate

use thiserror::Error;

/// Result type alias for drift-bagging operations
pub type Result<T> = std::result::Result<T, DriftBaggingError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum DriftBaggingError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    /// Failure raised by a base learner; passed through untouched
    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for DriftBaggingError {
    fn from(err: polars::error::PolarsError) -> Self {
        DriftBaggingError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for DriftBaggingError {
    fn from(err: serde_json::Error) -> Self {
        DriftBaggingError::SerializationError(err.to_string())
    }
}

//! Error types and result aliases for the vision-qa library.
//!
//! Every fallible operation below the analyzer and answerer returns
//! [`Result<T>`]. The analyzer and answerer themselves never fail; they fold
//! these errors into user-facing values.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionQaError {
    #[error("LLM gateway error: {0}")]
    GatewayError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Timeout error: {0}")]
    TimeoutError(String),
}

impl VisionQaError {
    /// Whether the failure was the request running past its time bound.
    pub fn is_timeout(&self) -> bool {
        match self {
            VisionQaError::TimeoutError(_) => true,
            VisionQaError::HttpError(e) => e.is_timeout(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, VisionQaError>;

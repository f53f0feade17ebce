//! Model error types.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by the pure pipeline stages.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Malformed upload: {0}")]
    MalformedUpload(String),

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Label source unavailable: {0}")]
    LabelSource(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    pub fn malformed_upload(msg: impl Into<String>) -> Self {
        Self::MalformedUpload(msg.into())
    }

    pub fn unknown_label(label: impl Into<String>) -> Self {
        Self::UnknownLabel(label.into())
    }

    pub fn label_source(msg: impl Into<String>) -> Self {
        Self::LabelSource(msg.into())
    }
}

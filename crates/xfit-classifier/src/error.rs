//! Classifier client error types.

use thiserror::Error;
use xfit_models::{ModelError, PresentableError};

pub type ClassifierResult<T> = Result<T, ClassifierError>;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier credentials missing or rejected: {0}")]
    Credentials(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invocation failed: {0}")]
    Invocation(String),

    #[error("Function error ({kind}): {message}")]
    FunctionError { kind: String, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Encoding error: {0}")]
    Encoding(#[from] ModelError),
}

impl ClassifierError {
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    pub fn invocation(msg: impl Into<String>) -> Self {
        Self::Invocation(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn function_error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FunctionError {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Only transport-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClassifierError::Network(_))
    }

    pub fn is_credentials(&self) -> bool {
        matches!(self, ClassifierError::Credentials(_))
    }
}

impl PresentableError for ClassifierError {
    fn kind(&self) -> &'static str {
        match self {
            ClassifierError::Credentials(_) => "credentials",
            ClassifierError::Timeout(_) => "timeout",
            ClassifierError::Network(_) => "network",
            ClassifierError::Invocation(_) => "invocation",
            ClassifierError::FunctionError { .. } => "function_error",
            ClassifierError::InvalidResponse(_) => "invalid_response",
            ClassifierError::Encoding(_) => "internal",
        }
    }

    fn user_message(&self) -> String {
        match self {
            ClassifierError::Credentials(_) => {
                "The classifier service is not reachable with the configured credentials".to_string()
            }
            ClassifierError::Timeout(secs) => {
                format!("The classifier did not answer within {} seconds", secs)
            }
            ClassifierError::Network(_) | ClassifierError::Invocation(_) => {
                "The classifier service could not be reached".to_string()
            }
            ClassifierError::FunctionError { .. } => {
                "The classifier failed to process this clip".to_string()
            }
            ClassifierError::InvalidResponse(_) => {
                "The classifier returned an unexpected response".to_string()
            }
            ClassifierError::Encoding(e) => e.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(ClassifierError::Network("reset".into()).is_retryable());
        assert!(!ClassifierError::Timeout(60).is_retryable());
        assert!(!ClassifierError::credentials("none").is_retryable());
        assert!(!ClassifierError::invocation("not found").is_retryable());
    }

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            ClassifierError::credentials("x"),
            ClassifierError::Timeout(1),
            ClassifierError::Network("x".into()),
            ClassifierError::invocation("x"),
            ClassifierError::function_error("Unhandled", "x"),
            ClassifierError::invalid_response("x"),
        ];
        let mut kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }
}

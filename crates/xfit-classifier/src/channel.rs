//! Invocation channel abstraction.

use async_trait::async_trait;

use crate::error::ClassifierResult;

/// Raw result of a synchronous function invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutput {
    /// HTTP-level status code reported by the channel.
    pub status_code: i32,
    /// Set when the function ran but reported an error (e.g. `Unhandled`).
    pub function_error: Option<String>,
    /// Response body bytes.
    pub payload: Vec<u8>,
}

impl InvocationOutput {
    /// Successful invocation with the given body.
    pub fn ok(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code: 200,
            function_error: None,
            payload: payload.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code) && self.function_error.is_none()
    }
}

/// A managed, request/response channel to a named remote function.
///
/// Implementations map credential failures to
/// [`ClassifierError::Credentials`](crate::ClassifierError::Credentials) and
/// transport failures to
/// [`ClassifierError::Network`](crate::ClassifierError::Network).
#[async_trait]
pub trait InvocationChannel: Send + Sync {
    async fn invoke(&self, function_name: &str, payload: Vec<u8>) -> ClassifierResult<InvocationOutput>;
}

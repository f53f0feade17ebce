//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use xfit_models::{ModelError, PresentableError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Detail sent in place of internal errors in production.
const REDACTED_DETAIL: &str = "An internal error occurred";

impl ApiError {
    /// Replace internal error details with a generic message when running in
    /// production.
    pub fn redact(self, production: bool) -> Self {
        match self {
            ApiError::Internal(_) if production => ApiError::Internal(REDACTED_DETAIL.to_string()),
            other => other,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidFile(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::InvalidFile(_) => Some("invalid_file"),
            ApiError::NotFound(_) => Some("not_found"),
            ApiError::RateLimited => Some("rate_limited"),
            _ => None,
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::MalformedUpload(_) => ApiError::InvalidFile(err.user_message()),
            ModelError::UnknownLabel(_) => ApiError::NotFound(err.user_message()),
            ModelError::LabelSource(_) | ModelError::Json(_) => ApiError::Internal(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Already user-facing, or redacted by the handler.
        let detail = match &self {
            ApiError::InvalidFile(msg) | ApiError::NotFound(msg) | ApiError::Internal(msg) => msg.clone(),
            ApiError::RateLimited => self.to_string(),
        };

        let body = ErrorResponse {
            detail,
            code: self.code().map(str::to_string),
        };

        (status, Json(body)).into_response()
    }
}

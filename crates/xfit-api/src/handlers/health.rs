//! Health check handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub labels: CheckStatus,
    pub classifier: CheckStatus,
    pub assets: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckStatus {
    fn ok(detail: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            detail: Some(detail.into()),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            detail: None,
            error: Some(msg.into()),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Readiness check endpoint (readiness probe).
///
/// Does not call the classifier: an invocation costs a cold start.
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let labels_check = CheckStatus::ok(format!("{} labels", state.labels.len()));

    let classifier_config = state.classifier.config();
    let classifier_check = if classifier_config.function_name.trim().is_empty() {
        CheckStatus::error("no classifier function configured")
    } else {
        CheckStatus::ok(format!(
            "{} ({})",
            classifier_config.function_name, classifier_config.region
        ))
    };

    let assets_check = if state.config.assets_dir.is_dir() {
        CheckStatus::ok(state.config.assets_dir.display().to_string())
    } else {
        CheckStatus::error(format!(
            "asset directory {} not found",
            state.config.assets_dir.display()
        ))
    };

    let all_ok = labels_check.is_ok() && classifier_check.is_ok() && assets_check.is_ok();

    let response = ReadinessResponse {
        status: if all_ok { "ready" } else { "degraded" }.to_string(),
        checks: ReadinessChecks {
            labels: labels_check,
            classifier: classifier_check,
            assets: assets_check,
        },
    };

    if all_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

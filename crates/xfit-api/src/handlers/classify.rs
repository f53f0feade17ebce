//! Clip classification handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use xfit_models::PredictionView;

use crate::error::ApiResult;
use crate::html::view_fragment;
use crate::pipeline::classify_upload;
use crate::state::AppState;

/// Classification request: the uploaded clip as a data URI.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub contents: String,
}

/// Classify a clip and return the prediction view as JSON.
pub async fn classify_clip(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> ApiResult<(StatusCode, Json<PredictionView>)> {
    let outcome = classify_upload(&state.classifier, &request.contents)
        .await
        .map_err(|e| e.redact(state.config.is_production()))?;
    Ok((outcome.status, Json(outcome.view)))
}

/// Classify a clip and return the table (or error block) as HTML.
pub async fn classify_clip_table(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> ApiResult<(StatusCode, Html<String>)> {
    let outcome = classify_upload(&state.classifier, &request.contents)
        .await
        .map_err(|e| e.redact(state.config.is_production()))?;
    Ok((outcome.status, Html(view_fragment(&outcome.view))))
}

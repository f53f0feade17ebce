//! Example clip handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::debug;
use xfit_models::AssetReference;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Labels for the example dropdown.
#[derive(Serialize)]
pub struct LabelsResponse {
    pub labels: Vec<String>,
    /// Initially selected label
    pub default: String,
}

/// List movement labels.
pub async fn list_labels(State(state): State<AppState>) -> Json<LabelsResponse> {
    Json(LabelsResponse {
        labels: state.labels.as_slice().to_vec(),
        default: state.labels.default_label().to_string(),
    })
}

/// Resolve the example clip for a label.
pub async fn get_example(
    State(state): State<AppState>,
    Path(label): Path<String>,
) -> ApiResult<Json<AssetReference>> {
    let result = state.examples.lookup(&label);
    metrics::record_example_lookup(result.is_ok());
    if result.is_err() {
        debug!("No example clip for label '{}'", label);
    }
    let asset = result.map_err(|e| ApiError::from(e).redact(state.config.is_production()))?;
    Ok(Json(asset))
}

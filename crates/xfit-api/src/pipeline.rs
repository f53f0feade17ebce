//! Upload → classifier → table pipeline.

use std::time::Instant;

use axum::http::StatusCode;
use tracing::info;
use xfit_classifier::{ClassifierClient, ClassifierError, ClassifierResult};
use xfit_models::{encode_data_uri, present, Prediction, PredictionView, PresentableError};

use crate::error::ApiResult;
use crate::metrics;

/// Result of one pipeline run, ready to be sent to the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyOutcome {
    pub status: StatusCode,
    pub view: PredictionView,
}

/// Run the pipeline for one uploaded data URI.
///
/// A malformed upload is returned as an error. Classifier failures become an
/// error view with a non-2xx status.
pub async fn classify_upload(classifier: &ClassifierClient, contents: &str) -> ApiResult<ClassifyOutcome> {
    let message = encode_data_uri(contents)?;

    let start = Instant::now();
    let result = classifier.classify_with_policy(&message).await;
    let elapsed = start.elapsed();

    let outcome = match &result {
        Ok(prediction) if prediction.is_error_sentinel() => "sentinel",
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::record_classification(outcome, elapsed.as_secs_f64());
    info!(
        outcome,
        duration_ms = %elapsed.as_millis(),
        "Classification finished"
    );

    Ok(ClassifyOutcome {
        status: status_for(&result),
        view: present(&result),
    })
}

fn status_for(result: &ClassifierResult<Prediction>) -> StatusCode {
    match result {
        Ok(_) => StatusCode::OK,
        Err(ClassifierError::Credentials(_)) => StatusCode::SERVICE_UNAVAILABLE,
        Err(ClassifierError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
        Err(ClassifierError::Encoding(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        Err(_) => StatusCode::BAD_GATEWAY,
    }
}

//! Classifier response parsing.

use serde::Deserialize;
use serde_json::Value;
use xfit_models::Prediction;

use crate::error::{ClassifierError, ClassifierResult};

/// Error document a Lambda function returns when it raises.
#[derive(Debug, Deserialize)]
struct FunctionErrorBody {
    #[serde(rename = "errorType", default)]
    error_type: Option<String>,
    #[serde(rename = "errorMessage", default)]
    error_message: Option<String>,
}

/// Extract the `prediction` field from a response body.
///
/// Accepted shapes:
/// - `{"body": {"prediction": [...]}}`
/// - `{"statusCode": 200, "body": "{\"prediction\": [...]}"}`
/// - `{"prediction": [...]}`
///
/// A non-2xx `statusCode` inside the document is reported as a function error.
pub fn parse_prediction(payload: &[u8]) -> ClassifierResult<Prediction> {
    let document: Value = serde_json::from_slice(payload)
        .map_err(|e| ClassifierError::invalid_response(format!("body is not JSON: {}", e)))?;

    if let Some(status) = document.get("statusCode").and_then(Value::as_i64) {
        if !(200..300).contains(&status) {
            return Err(ClassifierError::function_error(
                format!("status {}", status),
                document
                    .get("body")
                    .map(body_text)
                    .unwrap_or_default(),
            ));
        }
    }

    let body = match document.get("body") {
        Some(Value::String(text)) => Some(serde_json::from_str::<Value>(text).map_err(|e| {
            ClassifierError::invalid_response(format!("body string is not JSON: {}", e))
        })?),
        Some(body) => Some(body.clone()),
        None => None,
    }
    .unwrap_or(document);

    let prediction = body
        .get("prediction")
        .ok_or_else(|| ClassifierError::invalid_response("missing 'prediction' field"))?;

    serde_json::from_value(prediction.clone())
        .map_err(|e| ClassifierError::invalid_response(format!("malformed prediction: {}", e)))
}

/// Build a function error from the error document the runtime returned.
pub fn function_error(kind: &str, payload: &[u8]) -> ClassifierError {
    match serde_json::from_slice::<FunctionErrorBody>(payload) {
        Ok(FunctionErrorBody {
            error_type,
            error_message,
        }) if error_type.is_some() || error_message.is_some() => ClassifierError::function_error(
            error_type.unwrap_or_else(|| kind.to_string()),
            error_message.unwrap_or_default(),
        ),
        _ => ClassifierError::function_error(kind, String::from_utf8_lossy(payload).into_owned()),
    }
}

fn body_text(body: &Value) -> String {
    match body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

//! Display-ready prediction table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::prediction::{format_probability, Prediction};

/// First header cell.
pub const MOVEMENT_HEADER: &str = "Movement";
/// Second header cell.
pub const PROBABILITY_HEADER: &str = "Probability";

/// One body row of the prediction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableRow {
    pub movement: String,
    pub probability: String,
}

/// Two-column table: header plus one row per prediction entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableModel {
    pub header: (String, String),
    pub rows: Vec<TableRow>,
}

impl TableModel {
    /// Row cells as tuples, in display order.
    pub fn cells(&self) -> Vec<(&str, &str)> {
        self.rows
            .iter()
            .map(|r| (r.movement.as_str(), r.probability.as_str()))
            .collect()
    }
}

/// Build the table for a prediction. Order and values are kept as received.
pub fn render(prediction: &Prediction) -> TableModel {
    TableModel {
        header: (MOVEMENT_HEADER.to_string(), PROBABILITY_HEADER.to_string()),
        rows: prediction
            .iter()
            .map(|entry| TableRow {
                movement: entry.label.clone(),
                probability: format_probability(entry.probability),
            })
            .collect(),
    }
}

/// An error that can be shown to the user in place of a result.
pub trait PresentableError {
    /// Stable machine-readable kind, e.g. `"credentials"`.
    fn kind(&self) -> &'static str;

    /// Short message for the page.
    fn user_message(&self) -> String;
}

impl PresentableError for ModelError {
    fn kind(&self) -> &'static str {
        match self {
            ModelError::MalformedUpload(_) => "invalid_file",
            ModelError::UnknownLabel(_) => "no_example",
            ModelError::LabelSource(_) | ModelError::Json(_) => "internal",
        }
    }

    fn user_message(&self) -> String {
        match self {
            ModelError::MalformedUpload(_) => "Invalid file: upload a video clip".to_string(),
            ModelError::UnknownLabel(label) => format!("No example available for '{}'", label),
            ModelError::LabelSource(_) | ModelError::Json(_) => {
                "Something went wrong while preparing the result".to_string()
            }
        }
    }
}

/// Visible failure state shown instead of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorState {
    pub kind: String,
    pub message: String,
}

impl<E: PresentableError> From<&E> for ErrorState {
    fn from(err: &E) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.user_message(),
        }
    }
}

/// Presentation result: a table or an explicit error state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionView {
    Table { table: TableModel },
    Error { error: ErrorState },
}

impl PredictionView {
    pub fn is_error(&self) -> bool {
        matches!(self, PredictionView::Error { .. })
    }
}

/// Turn a classification result into something the page can show.
pub fn present<E: PresentableError>(result: &Result<Prediction, E>) -> PredictionView {
    match result {
        Ok(prediction) => PredictionView::Table {
            table: render(prediction),
        },
        Err(err) => PredictionView::Error {
            error: ErrorState::from(err),
        },
    }
}

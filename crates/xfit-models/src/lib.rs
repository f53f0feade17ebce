//! Shared data models for the movement classifier.
//!
//! This crate provides the pure stages of the classification pipeline:
//! - Upload parsing and transport encoding
//! - Prediction types
//! - Table presentation
//! - Example clip lookup and the startup label list

pub mod error;
pub mod examples;
pub mod labels;
pub mod prediction;
pub mod table;
pub mod transport;
pub mod upload;

// Re-export common types
pub use error::{ModelError, ModelResult};
pub use examples::{AssetReference, ExampleCatalog};
pub use labels::LabelSet;
pub use prediction::{format_probability, LabelProbability, Prediction};
pub use table::{present, render, ErrorState, PredictionView, PresentableError, TableModel, TableRow};
pub use transport::{encode, encode_data_uri, TransportMessage};
pub use upload::UploadPayload;

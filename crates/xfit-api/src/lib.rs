//! Axum HTTP server for the movement classifier.
//!
//! This crate provides:
//! - The single-page UI (clip prediction and example tabs)
//! - JSON and HTML classification endpoints
//! - Example clip lookup and static asset serving
//! - Rate limiting, security headers and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod html;
pub mod metrics;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use pipeline::{classify_upload, ClassifyOutcome};
pub use routes::create_router;
pub use state::AppState;

//! API routes.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::handlers::{classify_clip, classify_clip_table, get_example, health, index, list_labels, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, rate_limit_middleware, request_id, request_logging, security_headers, RateLimiterCache};
use crate::state::AppState;

/// Headroom left after a worst-case classifier call.
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Request timeout that never cuts off a classifier call mid-retry.
fn request_timeout_for(configured: Duration, classifier_budget: Duration) -> Duration {
    configured.max(classifier_budget.saturating_add(REQUEST_TIMEOUT_MARGIN))
}

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Each submit costs a remote invocation, so only these are rate limited
    let rate_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let classify_routes = Router::new()
        .route("/classify", post(classify_clip))
        .route("/classify/table", post(classify_clip_table))
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit_middleware));

    let api_routes = Router::new()
        // Dropdown labels
        .route("/labels", get(list_labels))
        // Example clip for a movement
        .route("/examples/:label", get(get_example))
        .merge(classify_routes);

    // Page and example clips
    let page_routes = Router::new()
        .route("/", get(index))
        .nest_service("/assets", ServeDir::new(&state.config.assets_dir));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let request_timeout = request_timeout_for(
        state.config.request_timeout,
        state.classifier.config().invocation_budget(),
    );
    if request_timeout > state.config.request_timeout {
        info!(
            "REQUEST_TIMEOUT raised to {:?} to cover classifier timeouts and retries",
            request_timeout
        );
    }

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        // Json extractors default to 2 MB
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

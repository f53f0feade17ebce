//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "xfit_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "xfit_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "xfit_http_requests_in_flight";

    // Classifier metrics
    pub const CLASSIFICATIONS_TOTAL: &str = "xfit_classifications_total";
    pub const CLASSIFICATION_DURATION_SECONDS: &str = "xfit_classification_duration_seconds";

    // Example playback
    pub const EXAMPLE_LOOKUPS_TOTAL: &str = "xfit_example_lookups_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "xfit_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record one classifier call and its outcome kind.
pub fn record_classification(outcome: &str, duration_secs: f64) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::CLASSIFICATIONS_TOTAL, &labels).increment(1);
    histogram!(names::CLASSIFICATION_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record an example clip lookup.
pub fn record_example_lookup(found: bool) {
    let labels = [("found", found.to_string())];
    counter!(names::EXAMPLE_LOOKUPS_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels (collapse labels and asset names).
fn sanitize_path(path: &str) -> String {
    static EXAMPLE: OnceLock<regex_lite::Regex> = OnceLock::new();
    static ASSET: OnceLock<regex_lite::Regex> = OnceLock::new();

    let example = EXAMPLE.get_or_init(|| {
        regex_lite::Regex::new(r"^/api/examples/[^/]+$").expect("valid example route regex")
    });
    let asset = ASSET.get_or_init(|| {
        regex_lite::Regex::new(r"^/assets/.+$").expect("valid asset route regex")
    });

    if example.is_match(path) {
        "/api/examples/:label".to_string()
    } else if asset.is_match(path) {
        "/assets/:file".to_string()
    } else {
        path.to_string()
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // Increment in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    // Decrement in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

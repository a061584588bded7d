//! Prometheus metrics for the API server.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Install the Prometheus recorder and return a handle used to render `/metrics`.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "shorts_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "shorts_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "shorts_http_requests_in_flight";
    pub const JOBS_REJECTED_TOTAL: &str = "shorts_jobs_rejected_total";
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

/// Record a submission refused before a job was created.
pub fn record_job_rejected(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!(names::JOBS_REJECTED_TOTAL, &labels).increment(1);
}

fn job_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").ok()
        })
        .as_ref()
}

/// Sanitize path for metrics labels (collapse job IDs).
fn sanitize_path(path: &str) -> String {
    match job_id_pattern() {
        Some(re) => re.replace_all(path, ":id").into_owned(),
        None => path.to_string(),
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    record_http_request(&method, &path, status, start.elapsed().as_secs_f64());

    response
}

//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

/// Register all custom metrics
fn register_metrics() {
    metrics::describe_counter!(
        "lectern_requests_total",
        "Total number of relay requests processed"
    );
    metrics::describe_histogram!(
        "lectern_request_duration_seconds",
        "Relay request duration in seconds"
    );
    metrics::describe_counter!(
        "lectern_stream_failures_total",
        "Streams that failed after response headers were sent"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a relay request
pub fn record_request(status: &str, branch: &str, duration_secs: f64) {
    metrics::counter!("lectern_requests_total", "status" => status.to_string(), "branch" => branch.to_string())
        .increment(1);
    metrics::histogram!("lectern_request_duration_seconds", "branch" => branch.to_string())
        .record(duration_secs);
}

/// Record a mid-stream failure
pub fn record_stream_failure(branch: &str) {
    metrics::counter!("lectern_stream_failures_total", "branch" => branch.to_string()).increment(1);
}

//! Prometheus metrics endpoint
//!
//! Exposes request counters and latencies in Prometheus format.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use tracing::warn;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    if metrics::set_global_recorder(recorder).is_err() {
        warn!("A metrics recorder was already installed; /metrics will be empty");
    }
    handle
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
        "canopy_requests_total",
        "Total number of requests processed"
    );
    metrics::describe_histogram!(
        "canopy_request_duration_seconds",
        "Request duration in seconds"
    );
    metrics::describe_counter!(
        "canopy_stream_chunks_total",
        "Chunks piped from provider event streams"
    );
}

/// Prometheus metrics endpoint handler
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a request
pub fn record_request(route: &str, status: u16, duration_secs: f64) {
    metrics::counter!(
        "canopy_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("canopy_request_duration_seconds", "route" => route.to_string())
        .record(duration_secs);
}

/// Record a finished provider stream
pub fn record_stream(provider: &str, chunks: usize) {
    metrics::counter!("canopy_stream_chunks_total", "provider" => provider.to_string())
        .increment(chunks as u64);
}

/// Route-level middleware recording every matched request.
///
/// For streamed responses the duration covers time to first byte only.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    record_request(&route, response.status().as_u16(), start.elapsed().as_secs_f64());
    response
}

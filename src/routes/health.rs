//! Health check endpoint
//!
//! `/health` is a static liveness signal; it does not probe upstreams.

use axum::http::StatusCode;

/// Liveness probe endpoint
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

//! Liveness probe.

use axum::http::StatusCode;

/// GET /health
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

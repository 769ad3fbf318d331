//! HTTP handlers for strategy-relay.

pub mod relay;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness check. Does not contact the upstream model.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "strategy-relay",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Model listing handlers.
pub mod models;
/// Chat session handlers.
pub mod sessions;

use axum::Json;

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up")
    ),
    tag = "health"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

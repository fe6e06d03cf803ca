// In crates/web-server/src/handlers/mod.rs

pub mod reports;
pub mod trades;

use axum::response::Json;
use chrono::Utc;

use crate::types::HealthResponse;

/// A simple health check handler.
pub async fn health_check_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
    })
}

use axum::response::Json;
use chrono::Utc;
use tracing::info;

use crate::error::AppResult;
use crate::models::HealthResponse;

/// Health check endpoint
pub async fn health_handler() -> AppResult<Json<HealthResponse>> {
    info!("Health check requested");

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().timestamp().max(0) as u64,
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
    }))
}


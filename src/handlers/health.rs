use axum::response::Json;
use tracing::instrument;
use crate::schemas::{ErrorResponse, HealthResponse};

fn healthy() -> HealthResponse {
    HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[instrument]
pub async fn health_check() -> Json<HealthResponse> {
    Json(healthy())
}

/// Health check endpoint under the API prefix, kept for older deployments
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 429, description = "Client exceeded its request budget", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn api_health_check() -> Json<HealthResponse> {
    Json(healthy())
}

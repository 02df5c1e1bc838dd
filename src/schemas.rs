use crate::config::Settings;
use crate::metrics::{MetricsSnapshot, PathSnapshot, RequestMetrics};
use crate::middleware::RateLimiter;
use chrono::{DateTime, Utc};
use common::{DayForecast, ForecastMeta, ForecastPayload, ForecastRequest, SeriesPoint};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Settings the server was started with
    pub settings: Arc<Settings>,
    /// Per-path request counters and latencies
    pub metrics: Arc<RequestMetrics>,
    /// Per-client token buckets
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let rate_limiter = RateLimiter::from_settings(&settings);
        Self {
            settings: Arc::new(settings),
            metrics: Arc::new(RequestMetrics::new()),
            rate_limiter,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Server time the check was answered at
    pub timestamp: DateTime<Utc>,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::health::api_health_check,
        crate::handlers::predict::predict_get,
        crate::handlers::predict::predict_post,
        crate::handlers::metrics::metrics_lite,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ForecastRequest,
            ForecastPayload,
            ForecastMeta,
            DayForecast,
            SeriesPoint,
            MetricsSnapshot,
            PathSnapshot,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "forecast", description = "Mock day-ahead forecast endpoints"),
        (name = "metrics", description = "In-process request metrics"),
    ),
    info(
        title = "Forecast Mock API",
        description = "Deterministic stand-in for the weather prediction backend",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

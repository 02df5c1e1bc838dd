use axum::{extract::State, response::Json};
use tracing::{debug, instrument};
use crate::metrics::MetricsSnapshot;
use crate::schemas::{AppState, ErrorResponse};

/// Lightweight request metrics, overall and per path
#[utoipa::path(
    get,
    path = "/api/metrics-lite",
    tag = "metrics",
    responses(
        (status = 200, description = "Metrics snapshot", body = MetricsSnapshot),
        (status = 429, description = "Client exceeded its request budget", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn metrics_lite(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    let snapshot = state.metrics.snapshot();
    debug!("Metrics snapshot covers {} paths", snapshot.by_path.len());
    Json(snapshot)
}

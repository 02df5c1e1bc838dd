use crate::metrics::UNMATCHED_PATH;
use crate::schemas::AppState;
use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::{net::SocketAddr, time::Instant};
use tracing::{info, warn};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
pub const SERVER_TIMING: HeaderName = HeaderName::from_static("server-timing");

/// Tags each request with an id, times it, records it into the request metrics
/// and emits a single summary event per request.
pub async fn observe(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    // route template, unmatched requests share one key
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_PATH.to_string(), |matched| matched.as_str().to_string());
    let query = request.uri().query().unwrap_or_default().to_string();
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    let started = Instant::now();
    let mut response = next.run(request).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let status = response.status();
    let ok = (200..400).contains(&status.as_u16());
    state.metrics.record(&route, latency_ms, ok);

    let headers = response.headers_mut();
    match HeaderValue::from_str(&request_id) {
        Ok(value) => {
            headers.insert(X_REQUEST_ID, value);
        }
        Err(e) => warn!("Could not encode request id {}: {}", request_id, e),
    }
    headers.insert(
        SERVER_TIMING,
        HeaderValue::from_str(&format!("app;dur={latency_ms}"))
            .unwrap_or_else(|_| HeaderValue::from_static("app")),
    );

    info!(
        kind = "request_summary",
        request_id = %request_id,
        method = %method,
        path = %path,
        query = %query,
        client = client.as_deref().unwrap_or("-"),
        status = status.as_u16(),
        latency_ms,
        "{} {} -> {}",
        method,
        path,
        status.as_u16()
    );

    response
}

use crate::config::Settings;
use crate::schemas::{AppState, ErrorResponse};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use moka::future::Cache;
use parking_lot::Mutex;
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, warn};

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

const MAX_TRACKED_CLIENTS: u64 = 10_000;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last: Instant,
}

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after_secs: u64 },
}

/// Per-client token bucket limiter.
///
/// Buckets are evicted once idle long enough to have refilled completely, so
/// eviction never changes a decision.
#[derive(Clone)]
pub struct RateLimiter {
    buckets: Cache<String, Arc<Mutex<Bucket>>>,
    enabled: bool,
    per_min: u32,
    burst: f64,
    path_prefix: String,
    behind_proxy: bool,
}

impl RateLimiter {
    pub fn from_settings(settings: &Settings) -> Self {
        let per_min = settings.rate_limit_per_min.max(1);
        let burst = settings.effective_burst().max(1);
        let refill_secs = (u64::from(burst) * 60).div_ceil(u64::from(per_min));

        let buckets = Cache::builder()
            .max_capacity(MAX_TRACKED_CLIENTS)
            .time_to_idle(Duration::from_secs(refill_secs.max(1)))
            .build();

        Self {
            buckets,
            enabled: settings.rate_limit_enabled,
            per_min,
            burst: f64::from(burst),
            path_prefix: settings.rate_limit_path_prefix.clone(),
            behind_proxy: settings.rate_limit_behind_proxy,
        }
    }

    pub fn limit(&self) -> u32 {
        self.per_min
    }

    /// Whether a request with this method and path is subject to limiting.
    pub fn applies_to(&self, method: &Method, path: &str) -> bool {
        self.enabled && method != Method::OPTIONS && path.starts_with(&self.path_prefix)
    }

    /// Resolves the client key of a request.
    pub fn client_key(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        if self.behind_proxy {
            let forwarded = headers
                .get("x-forwarded-for")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|ip| !ip.is_empty());
            if let Some(ip) = forwarded {
                return ip.to_string();
            }
        }
        peer.map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Takes one token from the client's bucket.
    pub async fn check(&self, client: &str) -> Decision {
        self.check_at(client, Instant::now()).await
    }

    pub(crate) async fn check_at(&self, client: &str, now: Instant) -> Decision {
        let burst = self.burst;
        let bucket = self
            .buckets
            .get_with(client.to_string(), async move {
                Arc::new(Mutex::new(Bucket {
                    tokens: burst,
                    last: now,
                }))
            })
            .await;

        let refill_per_sec = f64::from(self.per_min) / 60.0;
        let mut bucket = bucket.lock();

        let elapsed = now.saturating_duration_since(bucket.last).as_secs_f64();
        let tokens = (bucket.tokens + elapsed * refill_per_sec).min(self.burst);

        if tokens < 1.0 {
            // Rejections leave the bucket untouched
            let wait = ((1.0 - tokens) / refill_per_sec).max(1.0);
            return Decision::Limited {
                retry_after_secs: wait as u64,
            };
        }

        bucket.tokens = tokens - 1.0;
        bucket.last = now;
        Decision::Allowed {
            remaining: bucket.tokens as u32,
        }
    }
}

/// Rejects clients that exceed their request budget with `429 Too Many Requests`.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let limiter = &state.rate_limiter;
    if !limiter.applies_to(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = limiter.client_key(request.headers(), peer);
    let limit = HeaderValue::from(limiter.limit());

    match limiter.check(&client).await {
        Decision::Allowed { remaining } => {
            debug!("Client {} allowed, {} requests remaining", client, remaining);
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(X_RATELIMIT_LIMIT, limit);
            headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(remaining));
            response
        }
        Decision::Limited { retry_after_secs } => {
            warn!(
                "Rate limit exceeded for client {} on {}, retry after {}s",
                client,
                request.uri().path(),
                retry_after_secs
            );
            let body = ErrorResponse {
                error: "Too Many Requests (per-IP rate limit)".to_string(),
                code: "RATE_LIMITED".to_string(),
                success: false,
            };
            (
                StatusCode::TOO_MANY_REQUESTS,
                [
                    (header::RETRY_AFTER, HeaderValue::from(retry_after_secs)),
                    (X_RATELIMIT_LIMIT, limit),
                    (X_RATELIMIT_REMAINING, HeaderValue::from(0u32)),
                ],
                Json(body),
            )
                .into_response()
        }
    }
}

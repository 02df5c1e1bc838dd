use crate::config::Settings;
use crate::handlers::{
    health::{api_health_check, health_check},
    metrics::metrics_lite,
    predict::{predict_get, predict_post},
};
use crate::middleware::{observe, rate_limit};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::{openapi::PathItemType, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let settings = state.settings.clone();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/api/health", get(api_health_check))
        // Forecast
        .route("/predict", get(predict_get).post(predict_post))
        // Metrics
        .route("/api/metrics-lite", get(metrics_lite))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Rate limiting runs inside observability so rejected requests are still counted
        .layer(from_fn_with_state(state.clone(), rate_limit))
        .layer(from_fn_with_state(state.clone(), observe))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&settings))
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(settings.request_timeout_secs))),
        )
        .with_state(state)
}

/// CORS for the configured origins, with credentials.
///
/// Methods and headers mirror the preflight request since a wildcard cannot be
/// combined with credentials.
fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<&str> = settings
        .allow_origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .collect();

    let allow_origin = if origins.contains(&"*") {
        AllowOrigin::mirror_request()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// `(METHOD, path)` of every documented route.
pub fn documented_routes() -> Vec<(String, String)> {
    let openapi = ApiDoc::openapi();
    let mut routes = Vec::new();
    for (path, item) in &openapi.paths.paths {
        for method in item.operations.keys() {
            routes.push((method_name(method), path.clone()));
        }
    }
    routes
}

/// Upper-case HTTP method name of an OpenAPI operation.
fn method_name(method: &PathItemType) -> String {
    match serde_json::to_value(method) {
        Ok(serde_json::Value::String(name)) => name.to_uppercase(),
        _ => "UNKNOWN".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_name_is_upper_case() {
        assert_eq!(method_name(&PathItemType::Get), "GET");
        assert_eq!(method_name(&PathItemType::Post), "POST");
        assert_eq!(method_name(&PathItemType::Options), "OPTIONS");
    }
}

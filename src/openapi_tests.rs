#[cfg(test)]
mod tests {
    use crate::router::documented_routes;
    use crate::schemas::ApiDoc;
    use utoipa::openapi::{schema::Schema, PathItemType, RefOr};
    use utoipa::OpenApi;

    fn object_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        match components.schemas.get(name).unwrap() {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("{name} should be an object schema"),
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();
        for name in [
            "ErrorResponse",
            "HealthResponse",
            "ForecastPayload",
            "ForecastRequest",
            "DayForecast",
            "ForecastMeta",
            "MetricsSnapshot",
        ] {
            assert!(components.schemas.contains_key(name), "missing schema {name}");
        }

        let json_result = serde_json::to_string(&openapi);
        assert!(json_result.is_ok());
    }

    #[test]
    fn test_forecast_payload_schema_uses_wire_names() {
        let properties = object_properties("ForecastPayload");

        assert!(properties.contains(&"d0".to_string()));
        assert!(properties.contains(&"d1".to_string()));
        assert!(properties.contains(&"forecast_series".to_string()));
        assert!(properties.contains(&"recent_actuals".to_string()));
        assert!(properties.contains(&"_meta".to_string()));
        assert!(!properties.contains(&"meta".to_string()));
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = object_properties("ErrorResponse");

        assert!(properties.contains(&"error".to_string()));
        assert!(properties.contains(&"code".to_string()));
        assert!(properties.contains(&"success".to_string()));
    }

    #[test]
    fn test_openapi_paths_contain_predict_endpoint() {
        let openapi = ApiDoc::openapi();

        let predict = openapi.paths.paths.get("/predict").unwrap();
        assert!(predict.operations.contains_key(&PathItemType::Get));
        let post = predict.operations.get(&PathItemType::Post).unwrap();

        assert!(post.responses.responses.contains_key("200"));
        assert!(post.responses.responses.contains_key("422"));
    }

    #[test]
    fn test_documented_routes_list_every_endpoint() {
        let routes = documented_routes();

        for expected in [
            ("GET", "/health"),
            ("GET", "/api/health"),
            ("GET", "/predict"),
            ("POST", "/predict"),
            ("GET", "/api/metrics-lite"),
        ] {
            assert!(
                routes
                    .iter()
                    .any(|(method, path)| method == expected.0 && path == expected.1),
                "missing route {expected:?}"
            );
        }
    }

    #[test]
    fn test_all_error_responses_reference_correct_schema() {
        let openapi_json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(!openapi_json.contains("crate.schemas.ErrorResponse"));
        assert!(!openapi_json.contains("crate::schemas::ErrorResponse"));
        assert!(openapi_json.contains("ErrorResponse"));
    }
}

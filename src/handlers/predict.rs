use crate::schemas::ErrorResponse;
use axum::{
    extract::{rejection::JsonRejection, Query},
    http::StatusCode,
    response::Json,
};
use common::{ForecastPayload, ForecastRequest, DEFAULT_TIMEZONE};
use compute::coerce_number;
use tracing::{debug, instrument, warn};

/// Raw `/predict` query values, first occurrence of each key.
#[derive(Debug, Default, PartialEq)]
pub struct PredictQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub tz: Option<String>,
}

impl PredictQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "lat" => &mut query.lat,
                "lon" => &mut query.lon,
                "tz" => &mut query.tz,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// Coordinates and timezone with defaults applied.
    ///
    /// Missing coordinates read as `"0"`; values that are not numbers become NaN.
    pub fn resolve(self) -> (f64, f64, String) {
        let lat = coerce_number(self.lat.as_deref().unwrap_or("0"));
        let lon = coerce_number(self.lon.as_deref().unwrap_or("0"));
        let tz = self.tz.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        (lat, lon, tz)
    }
}

/// Generate a mock forecast from query parameters
#[utoipa::path(
    get,
    path = "/predict",
    tag = "forecast",
    params(
        ("lat" = Option<String>, Query, description = "Latitude in degrees, defaults to 0"),
        ("lon" = Option<String>, Query, description = "Longitude in degrees, defaults to 0"),
        ("tz" = Option<String>, Query, description = "Timezone identifier, defaults to Asia/Tokyo"),
    ),
    responses(
        (status = 200, description = "Forecast generated", body = ForecastPayload)
    )
)]
#[instrument(skip(pairs))]
pub async fn predict_get(Query(pairs): Query<Vec<(String, String)>>) -> Json<ForecastPayload> {
    let (lat, lon, tz) = PredictQuery::from_pairs(pairs).resolve();
    if !lat.is_finite() || !lon.is_finite() {
        warn!("Non-finite coordinates lat={} lon={}, forecast will not be finite", lat, lon);
    }
    debug!("Generating forecast for lat={} lon={} tz={}", lat, lon, tz);
    Json(compute::generate(lat, lon, tz))
}

/// Generate a mock forecast from a JSON body
#[utoipa::path(
    post,
    path = "/predict",
    tag = "forecast",
    request_body = ForecastRequest,
    responses(
        (status = 200, description = "Forecast generated", body = ForecastPayload),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse),
        (status = 422, description = "Body is missing coordinates", body = ErrorResponse)
    )
)]
#[instrument(skip(payload))]
pub async fn predict_post(
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastPayload>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected forecast request body: {}", rejection.body_text());
        let response = ErrorResponse {
            error: rejection.body_text(),
            code: "INVALID_REQUEST_BODY".to_string(),
            success: false,
        };
        (rejection.status(), Json(response))
    })?;

    debug!(
        "Generating forecast for lat={} lon={} tz={}",
        request.lat, request.lon, request.tz
    );
    Ok(Json(compute::generate(request.lat, request.lon, request.tz)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_parameters_use_defaults() {
        let (lat, lon, tz) = PredictQuery::from_pairs(vec![]).resolve();
        assert_eq!((lat, lon), (0.0, 0.0));
        assert_eq!(tz, "Asia/Tokyo");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let query = PredictQuery::from_pairs(pairs(&[
            ("lat", "35.5"),
            ("lat", "10"),
            ("other", "x"),
            ("tz", "UTC"),
        ]));
        assert_eq!(query.lat.as_deref(), Some("35.5"));
        assert_eq!(query.lon, None);
        assert_eq!(query.tz.as_deref(), Some("UTC"));
    }

    #[test]
    fn test_unparsable_coordinates_become_nan() {
        let (lat, lon, _) = PredictQuery::from_pairs(pairs(&[("lat", "north"), ("lon", "")])).resolve();
        assert!(lat.is_nan());
        assert_eq!(lon, 0.0);
    }

    #[test]
    fn test_empty_timezone_is_kept() {
        let (_, _, tz) = PredictQuery::from_pairs(pairs(&[("tz", "")])).resolve();
        assert_eq!(tz, "");
    }
}

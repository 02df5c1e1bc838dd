use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Timezone assumed when a request does not name one.
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

/// Request body for `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastRequest {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Timezone identifier, echoed back in the response metadata
    #[serde(default = "default_timezone")]
    #[schema(default = "Asia/Tokyo")]
    pub tz: String,
}

/// Forecast for a single day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DayForecast {
    /// High temperature in °C
    pub max: f64,
    /// Low temperature in °C, never above `max`
    pub min: f64,
    /// Probability of precipitation in [0, 1]
    pub precip_prob: f64,
    /// Precipitation amount in millimeters
    pub precip: f64,
}

/// One point of a daily time series.
///
/// The mock backend never fills these, a real model backend does.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SeriesPoint {
    /// Date (YYYY-MM-DD)
    pub date: String,
    pub value: Option<f64>,
}

/// Metadata echoed back with every forecast.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastMeta {
    pub lat: f64,
    pub lon: f64,
    pub tz: String,
    /// Marks the payload as synthetic
    pub mock: bool,
}

/// Response body of `/predict`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastPayload {
    /// Reference day
    pub d0: DayForecast,
    /// Following day
    pub d1: DayForecast,
    pub forecast_series: Vec<SeriesPoint>,
    pub recent_actuals: Vec<SeriesPoint>,
    #[serde(rename = "_meta")]
    pub meta: ForecastMeta,
}

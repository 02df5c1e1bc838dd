//! Common transport-layer types shared between the forecast backend and its clients.
//! These structs mirror the `/predict` request/response payloads so a client can
//! deserialize API responses without duplicating shapes.

mod forecast;

pub use forecast::{
    DEFAULT_TIMEZONE, DayForecast, ForecastMeta, ForecastPayload, ForecastRequest, SeriesPoint,
};

//! Deterministic two-day forecast derived from coordinates alone.
//!
//! Every value in a payload is an affine image of one scalar seed computed from
//! `(lat, lon)`. The draws are intentionally correlated: reproducing stored
//! reference payloads depends on it.

use common::{DayForecast, ForecastMeta, ForecastPayload};
use tracing::{instrument, trace};

use crate::numeric::{clamp, round1, round2};

/// Temperature bounds for daily highs, in °C.
const MAX_TEMP_RANGE: (f64, f64) = (-50.0, 60.0);
/// Lower bound for daily lows, in °C. The upper bound is that day's high.
const MIN_TEMP_FLOOR: f64 = -60.0;
/// Upper bound for next-day precipitation, in mm.
const PRECIP_CEILING: f64 = 20.0;

/// Sine-hash of the coordinates, in [0, 1].
pub fn seed(lat: f64, lon: f64) -> f64 {
    (lat * 12.9898 + lon * 78.233).sin().abs()
}

/// Builds the synthetic forecast payload for the given coordinates.
///
/// `tz` is echoed in the metadata and has no influence on the numbers.
/// Non-finite coordinates propagate into non-finite fields.
#[instrument(level = "debug", skip(tz))]
pub fn generate(lat: f64, lon: f64, tz: impl Into<String>) -> ForecastPayload {
    let tz = tz.into();

    let seed = seed(lat, lon);
    let rnd = |a: f64, b: f64| a + (b - a) * (seed % 1.0);
    trace!(seed, "derived forecast seed");

    let max0 = clamp(round1(rnd(27.0, 33.0)), MAX_TEMP_RANGE.0, MAX_TEMP_RANGE.1);
    let min0 = clamp(round1(max0 - rnd(5.0, 9.0)), MIN_TEMP_FLOOR, max0);
    let d0 = DayForecast {
        max: max0,
        min: min0,
        precip_prob: round2(rnd(0.2, 0.8)),
        precip: round1(rnd(0.0, 10.0)),
    };

    // Both temperatures move by the same amount
    let drift = rnd(-1.5, 1.5);
    let max1 = clamp(round1(max0 + drift), MAX_TEMP_RANGE.0, MAX_TEMP_RANGE.1);
    let min1 = clamp(round1(min0 + drift), MIN_TEMP_FLOOR, max1);
    let d1 = DayForecast {
        max: max1,
        min: min1,
        precip_prob: round2(clamp(d0.precip_prob + rnd(-0.15, 0.15), 0.0, 1.0)),
        precip: round1(clamp(d0.precip + rnd(-3.0, 3.0), 0.0, PRECIP_CEILING)),
    };

    ForecastPayload {
        d0,
        d1,
        forecast_series: Vec::new(),
        recent_actuals: Vec::new(),
        meta: ForecastMeta {
            lat,
            lon,
            tz,
            mock: true,
        },
    }
}

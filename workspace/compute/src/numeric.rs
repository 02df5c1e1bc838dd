//! Fixed-point rounding and clamping with the semantics the forecast consumers expect.

use rust_decimal::prelude::*;

/// Rounds `value` to `digits` decimal places.
///
/// The decision is made on the exact binary value of `value`, with exact ties
/// going away from zero (`0.625` becomes `0.63`, `0.25` becomes `0.3`). The
/// decimal result is then read back as the nearest `f64`. Values a `Decimal`
/// cannot hold (NaN, infinities, magnitudes above ~7.9e28) are returned as-is.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(value) else {
        return value;
    };

    exact
        .round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
        .parse()
        .unwrap_or(value)
}

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Computes `max(lo, min(hi, n))`.
///
/// Unlike [`f64::clamp`] this never panics, and a NaN in any operand yields NaN.
pub fn clamp(n: f64, lo: f64, hi: f64) -> f64 {
    if n.is_nan() || lo.is_nan() || hi.is_nan() {
        return f64::NAN;
    }
    lo.max(hi.min(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_ties_away_from_zero() {
        // Exactly representable midpoints
        assert_eq!(round2(0.625), 0.63);
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round1(-0.25), -0.3);
        assert_eq!(round1(2.5), 2.5);
    }

    #[test]
    fn test_round_uses_exact_binary_value() {
        // stored slightly below the midpoint
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round1(0.15), 0.1);
        // stored slightly above the midpoint
        assert_eq!(round1(0.45), 0.5);
        assert_eq!(round1(28.150_526_105_263), 28.2);
    }

    #[test]
    fn test_round_passes_non_finite_through() {
        assert!(round1(f64::NAN).is_nan());
        assert_eq!(round1(f64::INFINITY), f64::INFINITY);
        assert_eq!(round2(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(70.0, -50.0, 60.0), 60.0);
        assert_eq!(clamp(-70.0, -50.0, 60.0), -50.0);
        assert_eq!(clamp(12.3, -50.0, 60.0), 12.3);
    }

    #[test]
    fn test_clamp_propagates_nan_without_panicking() {
        assert!(clamp(f64::NAN, 0.0, 1.0).is_nan());
        assert!(clamp(5.0, -60.0, f64::NAN).is_nan());
    }
}

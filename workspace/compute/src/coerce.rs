//! Coercion of raw query-string values into numbers.
//!
//! Query parameters are never rejected. A value that is not a number literal
//! becomes NaN, and an empty value becomes zero.

/// Whitespace trimmed around a numeric string.
fn is_numeric_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

/// Coerces a raw query value into a number.
///
/// Accepted forms, after trimming surrounding whitespace:
/// - the empty string (zero)
/// - decimal literals with optional sign, fraction and exponent (`-1.5`, `.5`, `1.`, `2e-3`)
/// - `Infinity` with an optional sign
/// - unsigned `0x`, `0o` and `0b` integer literals
///
/// Everything else coerces to NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim_matches(is_numeric_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }

    let (negative, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if unsigned == "Infinity" {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    if !is_decimal_literal(unsigned) {
        return f64::NAN;
    }

    trimmed.parse().unwrap_or(f64::NAN)
}

fn parse_radix_literal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' {
        return None;
    }

    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    let digits = &s[2..];
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(f64::NAN);
    }

    let value = match u128::from_str_radix(digits, radix) {
        Ok(v) => v as f64,
        // Too wide for u128, accumulate in floating point instead
        Err(_) => digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d)),
    };
    Some(value)
}

/// Matches `digits [. digits] [e [sign] digits]` where the mantissa has at least one digit.
fn is_decimal_literal(s: &str) -> bool {
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let (integral, fraction) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if integral.is_empty() && fraction.is_empty() {
        return false;
    }
    if !all_digits(integral) || !all_digits(fraction) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && all_digits(exp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank_are_zero() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("   "), 0.0);
        assert_eq!(coerce_number("\t\n"), 0.0);
    }

    #[test]
    fn test_decimal_literals() {
        assert_eq!(coerce_number("35.6812"), 35.6812);
        assert_eq!(coerce_number(" 139.7671 "), 139.7671);
        assert_eq!(coerce_number("+12"), 12.0);
        assert_eq!(coerce_number("-0.5"), -0.5);
        assert_eq!(coerce_number(".5"), 0.5);
        assert_eq!(coerce_number("1."), 1.0);
        assert_eq!(coerce_number("1.e5"), 100000.0);
        assert_eq!(coerce_number("2E-3"), 0.002);
    }

    #[test]
    fn test_infinity_is_case_sensitive() {
        assert_eq!(coerce_number("Infinity"), f64::INFINITY);
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
        assert!(coerce_number("infinity").is_nan());
        assert!(coerce_number("inf").is_nan());
        assert!(coerce_number("NaN").is_nan());
    }

    #[test]
    fn test_radix_literals() {
        assert_eq!(coerce_number("0x10"), 16.0);
        assert_eq!(coerce_number("0B101"), 5.0);
        assert_eq!(coerce_number("0o17"), 15.0);
        assert!(coerce_number("-0x10").is_nan());
        assert!(coerce_number("0x").is_nan());
        assert!(coerce_number("0x+1").is_nan());
        assert!(coerce_number("0b102").is_nan());
    }

    #[test]
    fn test_garbage_is_nan() {
        for raw in ["abc", "12abc", "1_000", ".", "-", "1e", "1e+", "1..2", "--1", "1,5"] {
            assert!(coerce_number(raw).is_nan(), "{raw:?} should coerce to NaN");
        }
    }
}

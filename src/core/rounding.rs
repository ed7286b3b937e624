//! Two-decimal rounding for published GPA values

/// Round to two decimal places, ties away from zero.
///
/// Rounding looks at the exact decimal expansion of the binary value, the same
/// way `Number.prototype.toFixed(2)` does, so `3.125` becomes `3.13` while
/// `1.005` (stored as `1.00499999...`) becomes `1.00`. Rounding via
/// `(x * 100.0).round()` does not agree with that on values near a tie.
#[must_use]
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // 30 fractional digits is far below f64 resolution for GPA-sized values,
    // so the third digit is never the product of the formatter's own rounding.
    let expanded = format!("{:.30}", value.abs());
    let Some((whole, fraction)) = expanded.split_once('.') else {
        return value;
    };

    let digits = fraction.as_bytes();
    let whole: f64 = whole.parse().unwrap_or(0.0);
    let mut cents = whole * 100.0 + f64::from(digits[0] - b'0') * 10.0 + f64::from(digits[1] - b'0');
    if digits[2] >= b'5' {
        cents += 1.0;
    }

    (cents / 100.0).copysign(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_plain_values() {
        assert_eq!(round2(3.833_333_333), 3.83);
        assert_eq!(round2(3.666_666_666), 3.67);
        assert_eq!(round2(4.0), 4.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_round2_exact_tie_rounds_up() {
        // 3.125 and 3.6875 are exactly representable
        assert_eq!(round2(3.125), 3.13);
        assert_eq!(round2(29.5 / 8.0), 3.69);
    }

    #[test]
    fn test_round2_binary_below_tie_rounds_down() {
        assert_eq!(round2(1.005), 1.0);
    }

    #[test]
    fn test_round2_negative_mirrors_positive() {
        assert_eq!(round2(-3.125), -3.13);
    }

    #[test]
    fn test_round2_passes_through_non_finite() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }
}

//! Fixed-point truncation used for every exchange-facing quantity and price.

use rust_decimal::{Decimal, RoundingStrategy};

/// Largest scale a `Decimal` can carry.
pub const MAX_DIGITS: u32 = 28;

/// Truncate `value` toward zero to `digits` fractional digits.
///
/// The result always carries exactly `digits` fractional digits, so
/// `quantize(dec!(0.004), 6)` renders as `0.004000`. Never rounds up, so the
/// result is never larger in magnitude than the input. `digits` above
/// [`MAX_DIGITS`] is clamped.
pub fn quantize(value: Decimal, digits: u32) -> Decimal {
    let digits = digits.min(MAX_DIGITS);
    let mut truncated = value.round_dp_with_strategy(digits, RoundingStrategy::ToZero);
    // Only ever pads here; truncation above already dropped the excess digits.
    truncated.rescale(digits);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_truncates_never_rounds() {
        assert_eq!(quantize(dec!(1.23456789), 4), dec!(1.2345));
        assert_eq!(quantize(dec!(0.0049999), 3), dec!(0.004));
        assert_eq!(quantize(dec!(47500.999), 2), dec!(47500.99));
    }

    #[test]
    fn test_zero_digits_truncates_to_integer() {
        assert_eq!(quantize(dec!(12.99), 0), dec!(12));
        assert_eq!(quantize(dec!(0.5), 0), dec!(0));
    }

    #[test]
    fn test_pads_to_requested_scale() {
        let q = quantize(dec!(0.004), 6);
        assert_eq!(q.scale(), 6);
        assert_eq!(q.to_string(), "0.004000");

        assert_eq!(quantize(dec!(50000), 2).to_string(), "50000.00");
    }

    #[test]
    fn test_idempotent() {
        let values = [dec!(0), dec!(1.5), dec!(0.123456789), dec!(98765.4321), dec!(0.000001)];
        for v in values {
            for d in [0, 1, 2, 4, 6, 8] {
                let once = quantize(v, d);
                assert_eq!(quantize(once, d), once, "value {v} digits {d}");
            }
        }
    }

    #[test]
    fn test_never_increases_magnitude() {
        let values = [dec!(0.99999999), dec!(3.14159), dec!(1000000.5), dec!(0.0000009)];
        for v in values {
            for d in 0..=8 {
                assert!(quantize(v, d).abs() <= v.abs(), "value {v} digits {d}");
            }
        }
    }

    #[test]
    fn test_exact_at_minimum() {
        // 0.1 + 0.2 is exactly 0.3 in decimal arithmetic
        let sum = dec!(0.1) + dec!(0.2);
        assert_eq!(quantize(sum, 1), dec!(0.3));
    }

    #[test]
    fn test_excessive_digits_clamped() {
        assert_eq!(quantize(dec!(1.5), 40).scale(), MAX_DIGITS);
    }
}

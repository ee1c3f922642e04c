//! Display rounding: two decimal places, round-half-to-even.
//!
//! Values are rounded from their shortest decimal representation, so a float
//! printed as `2.015` is a tie and rounds to `2.02`, and `2.005` rounds to
//! `2.00`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

pub const DISPLAY_DP: u32 = 2;

/// Round to `dp` places with banker's rounding. `None` for NaN, infinities and
/// magnitudes outside the decimal range.
pub fn round_half_even(value: f64, dp: u32) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    let decimal = Decimal::from_str(&value.to_string()).ok()?;
    let mut rounded = decimal.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(dp);
    Some(rounded)
}

/// The rounded value as a float, for positioning labels.
pub fn rounded_value(value: f64) -> f64 {
    round_half_even(value, DISPLAY_DP)
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Two-decimal text for titles and labels.
pub fn format_rounded(value: f64) -> String {
    match round_half_even(value, DISPLAY_DP) {
        Some(d) => d.to_string(),
        None => format!("{value:.2}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn ties_round_to_even() {
        assert_eq!(format_rounded(2.005), "2.00");
        assert_eq!(format_rounded(2.015), "2.02");
        assert_eq!(format_rounded(2.025), "2.02");
        assert_eq!(format_rounded(0.125), "0.12");
        assert_eq!(format_rounded(0.135), "0.14");
    }

    #[test]
    fn non_ties_round_to_nearest() {
        assert_eq!(format_rounded(3.16227766), "3.16");
        assert_eq!(format_rounded(17.16227766), "17.16");
        assert_eq!(format_rounded(2.0051), "2.01");
    }

    #[test]
    fn pads_to_two_places() {
        assert_eq!(format_rounded(14.0), "14.00");
        assert_eq!(format_rounded(14.7), "14.70");
        assert_eq!(format_rounded(53_212_345.0), "53212345.00");
    }

    #[test]
    fn negative_values() {
        assert_eq!(format_rounded(-2.015), "-2.02");
        assert_eq!(format_rounded(-1.234), "-1.23");
    }

    #[test]
    fn non_finite_falls_back() {
        assert_eq!(round_half_even(f64::NAN, 2), None);
        assert_eq!(round_half_even(f64::INFINITY, 2), None);
        assert_eq!(format_rounded(f64::NAN), "NaN");
    }

    #[test]
    fn rounded_value_matches_text() {
        assert_abs_diff_eq!(rounded_value(13.299999999), 13.3, epsilon = 1e-9);
        assert_abs_diff_eq!(rounded_value(2.015), 2.02, epsilon = 1e-9);
    }

    proptest! {
        #[test]
        fn rounding_is_idempotent(cents in -10_000_000i64..10_000_000i64) {
            let value = cents as f64 / 100.0;
            let once = format_rounded(value);
            let twice = format_rounded(once.parse::<f64>().unwrap());
            prop_assert_eq!(once, twice);
        }
    }
}

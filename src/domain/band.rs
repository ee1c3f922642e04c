//! Horizontal reference bands derived from a series summary.

use std::fmt;

use crate::domain::stats::Summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);
    pub const DARK_BLUE: Color = Color::rgb(0x00, 0x00, 0xDD);
    pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const DARK_RED: Color = Color::rgb(0xDD, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// `#RRGGBB`
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceBand {
    pub label: &'static str,
    pub value: f64,
    pub color: Color,
}

pub const PERCENT_BAND: f64 = 0.05;

/// The seven reference bands, in drawing order: mean, +1SD, +2SD, -1SD, -2SD,
/// -5%, +5%.
pub fn reference_bands(summary: &Summary) -> Vec<ReferenceBand> {
    let mean = summary.mean;
    let sd = summary.std_dev;

    vec![
        ReferenceBand {
            label: "mean",
            value: mean,
            color: Color::BLACK,
        },
        ReferenceBand {
            label: "+1SD",
            value: mean + sd,
            color: Color::DARK_BLUE,
        },
        ReferenceBand {
            label: "+2SD",
            value: mean + 2.0 * sd,
            color: Color::BLUE,
        },
        ReferenceBand {
            label: "-1SD",
            value: mean - sd,
            color: Color::DARK_RED,
        },
        ReferenceBand {
            label: "-2SD",
            value: mean - 2.0 * sd,
            color: Color::RED,
        },
        ReferenceBand {
            label: "-5%",
            value: mean * (1.0 - PERCENT_BAND),
            color: Color::RED,
        },
        ReferenceBand {
            label: "+5%",
            value: mean * (1.0 + PERCENT_BAND),
            color: Color::BLUE,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rounding::format_rounded;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn band<'a>(bands: &'a [ReferenceBand], label: &str) -> &'a ReferenceBand {
        bands.iter().find(|b| b.label == label).unwrap()
    }

    #[test]
    fn known_series_bands() {
        let summary = Summary::compute(&[10.0, 12.0, 14.0, 16.0, 18.0]).unwrap();
        let bands = reference_bands(&summary);

        assert_eq!(bands.len(), 7);
        assert_eq!(format_rounded(band(&bands, "mean").value), "14.00");
        assert_eq!(format_rounded(band(&bands, "+1SD").value), "17.16");
        assert_eq!(format_rounded(band(&bands, "-1SD").value), "10.84");
        assert_eq!(format_rounded(band(&bands, "+2SD").value), "20.32");
        assert_eq!(format_rounded(band(&bands, "-2SD").value), "7.68");
        assert_eq!(format_rounded(band(&bands, "+5%").value), "14.70");
        assert_eq!(format_rounded(band(&bands, "-5%").value), "13.30");
    }

    #[test]
    fn drawing_order_and_colors() {
        let summary = Summary::compute(&[1.0, 2.0, 3.0]).unwrap();
        let bands = reference_bands(&summary);
        let labels: Vec<_> = bands.iter().map(|b| b.label).collect();
        let colors: Vec<_> = bands.iter().map(|b| b.color.to_string()).collect();

        assert_eq!(labels, ["mean", "+1SD", "+2SD", "-1SD", "-2SD", "-5%", "+5%"]);
        assert_eq!(
            colors,
            ["#000000", "#0000DD", "#0000FF", "#DD0000", "#FF0000", "#FF0000", "#0000FF"]
        );
    }

    #[test]
    fn single_value_collapses_sd_bands() {
        let summary = Summary::compute(&[50.0]).unwrap();
        let bands = reference_bands(&summary);
        for label in ["mean", "+1SD", "+2SD", "-1SD", "-2SD"] {
            assert_abs_diff_eq!(band(&bands, label).value, 50.0);
        }
        assert_abs_diff_eq!(band(&bands, "+5%").value, 52.5, epsilon = 1e-9);
        assert_abs_diff_eq!(band(&bands, "-5%").value, 47.5, epsilon = 1e-9);
    }

    #[test]
    fn negative_mean_inverts_percent_bands() {
        let summary = Summary::compute(&[-10.0, -20.0, -30.0]).unwrap();
        let bands = reference_bands(&summary);
        assert!(band(&bands, "+5%").value < summary.mean);
        assert!(band(&bands, "-5%").value > summary.mean);
    }

    proptest! {
        #[test]
        fn sd_bands_are_ordered(values in proptest::collection::vec(1i32..100_000, 2..60)) {
            let values: Vec<f64> = values.into_iter().map(|v| v as f64 / 10.0).collect();
            let summary = Summary::compute(&values).unwrap();
            prop_assume!(summary.std_dev > 1e-6);

            let bands = reference_bands(&summary);
            let m2 = band(&bands, "-2SD").value;
            let m1 = band(&bands, "-1SD").value;
            let p1 = band(&bands, "+1SD").value;
            let p2 = band(&bands, "+2SD").value;

            prop_assert!(m2 < m1);
            prop_assert!(m1 < summary.mean);
            prop_assert!(summary.mean < p1);
            prop_assert!(p1 < p2);
        }

        #[test]
        fn percent_bands_bracket_positive_mean(values in proptest::collection::vec(1i32..100_000, 1..60)) {
            let values: Vec<f64> = values.into_iter().map(|v| v as f64 / 10.0).collect();
            let summary = Summary::compute(&values).unwrap();
            let bands = reference_bands(&summary);

            prop_assert!(band(&bands, "-5%").value < summary.mean);
            prop_assert!(summary.mean < band(&bands, "+5%").value);
        }
    }
}

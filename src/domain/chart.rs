//! Renderer-independent description of one figure.
//!
//! Band lines sit at the raw band value; label text and label position use the
//! rounded value. Title and labels are formatted here so every renderer shows
//! identical text.

use chrono::NaiveDate;

use crate::domain::band::{Color, ReferenceBand};
use crate::domain::period::directory_name;
use crate::domain::rounding::{format_rounded, rounded_value};
use crate::domain::series::{PriceSeries, SeriesPoint};
use crate::domain::stats::Summary;

pub const CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq)]
pub struct BandLine {
    pub value: f64,
    pub color: Color,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub date: NaiveDate,
    pub value: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub points: Vec<SeriesPoint>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub lines: Vec<BandLine>,
    pub annotations: Vec<Annotation>,
}

impl ChartSpec {
    /// `None` when the series has no points to span.
    pub fn build(
        series: &PriceSeries,
        period: &str,
        summary: &Summary,
        bands: &[ReferenceBand],
        date: NaiveDate,
    ) -> Option<Self> {
        let (start, end) = series.date_range()?;

        let lines = bands
            .iter()
            .map(|band| BandLine {
                value: band.value,
                color: band.color,
                label: band.label,
            })
            .collect();

        let annotations = bands
            .iter()
            .map(|band| Annotation {
                date: start,
                value: rounded_value(band.value),
                text: band_label(band),
            })
            .collect();

        Some(Self {
            title: chart_title(period, &series.ticker, &series.metric_name, summary.mean, date),
            points: series.points.clone(),
            start,
            end,
            lines,
            annotations,
        })
    }

    /// Every y value the figure needs to show: finite series values, band
    /// lines and label positions.
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        let values = self
            .points
            .iter()
            .map(|p| p.value)
            .chain(self.lines.iter().map(|l| l.value))
            .chain(self.annotations.iter().map(|a| a.value))
            .filter(|v| v.is_finite());

        values.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// `"1yr AAPL Close Mean Price: 187.32USD 2024-05-01"`
pub fn chart_title(period: &str, ticker: &str, metric: &str, mean: f64, date: NaiveDate) -> String {
    format!(
        "{} {} {} Mean Price: {}{} {}",
        directory_name(period),
        ticker,
        metric,
        format_rounded(mean),
        CURRENCY,
        date.format("%Y-%m-%d")
    )
}

/// `"+1SD: 17.16USD"`
pub fn band_label(band: &ReferenceBand) -> String {
    format!("{}: {}{}", band.label, format_rounded(band.value), CURRENCY)
}

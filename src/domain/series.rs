//! One metric of one ticker as an ordered (date, value) series.

use chrono::NaiveDate;

use crate::domain::error::BandplotError;
use crate::domain::metric::Metric;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub ticker: String,
    pub metric: Metric,
    /// Metric name as configured; used in titles and file names.
    pub metric_name: String,
    pub points: Vec<SeriesPoint>,
}

impl PriceSeries {
    /// Extract `metric_name` from `bars`, sorted ascending by date.
    pub fn from_bars(
        ticker: &str,
        metric_name: &str,
        bars: &[OhlcvBar],
    ) -> Result<Self, BandplotError> {
        let metric: Metric = metric_name
            .parse()
            .map_err(|_| BandplotError::UnknownMetric {
                ticker: ticker.to_string(),
                metric: metric_name.to_string(),
            })?;

        let mut points: Vec<SeriesPoint> = bars
            .iter()
            .map(|bar| SeriesPoint {
                date: bar.date,
                value: bar.value(metric),
            })
            .collect();
        points.sort_by_key(|p| p.date);

        Ok(Self {
            ticker: ticker.to_string(),
            metric,
            metric_name: metric_name.to_string(),
            points,
        })
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// First and last date, if any.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.points.first()?.date;
        let last = self.points.last()?.date;
        Some((first, last))
    }
}

//! Summary statistics over one metric's values.
//!
//! Sample standard deviation (divides by n-1). Non-finite values are missing
//! data and are skipped, matching how the price table treats gaps.

use crate::domain::error::BandplotError;
use crate::domain::series::PriceSeries;

pub const MIN_POINTS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl Summary {
    /// `None` when there are no finite values. A single value has a standard
    /// deviation of zero.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let mean = mean(&finite)?;
        Some(Self {
            count: finite.len(),
            mean,
            std_dev: sample_std_dev(&finite).unwrap_or(0.0),
        })
    }

    pub fn for_series(series: &PriceSeries) -> Result<Self, BandplotError> {
        let values = series.values();
        Self::compute(&values).ok_or_else(|| BandplotError::InsufficientData {
            ticker: series.ticker.clone(),
            metric: series.metric_name.clone(),
            points: 0,
            minimum: MIN_POINTS,
        })
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// `None` for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

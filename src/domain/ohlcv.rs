//! Daily OHLCV bar as returned by a data source.

use chrono::NaiveDate;

use crate::domain::metric::Metric;

/// One trading day. Fields the source did not report are NaN.
#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub dividends: f64,
    pub stock_splits: f64,
}

impl OhlcvBar {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Open => self.open,
            Metric::High => self.high,
            Metric::Low => self.low,
            Metric::Close => self.close,
            Metric::Volume => self.volume,
            Metric::Dividends => self.dividends,
            Metric::StockSplits => self.stock_splits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> OhlcvBar {
        OhlcvBar {
            ticker: "AAPL".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000.0,
            dividends: 0.24,
            stock_splits: 0.0,
        }
    }

    #[test]
    fn value_selects_matching_column() {
        let bar = sample_bar();
        assert_eq!(bar.value(Metric::Open), 100.0);
        assert_eq!(bar.value(Metric::High), 110.0);
        assert_eq!(bar.value(Metric::Low), 90.0);
        assert_eq!(bar.value(Metric::Close), 105.0);
        assert_eq!(bar.value(Metric::Volume), 50_000.0);
        assert_eq!(bar.value(Metric::Dividends), 0.24);
        assert_eq!(bar.value(Metric::StockSplits), 0.0);
    }
}

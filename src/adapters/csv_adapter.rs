//! CSV file data adapter for offline runs.
//!
//! Reads `<base_path>/<TICKER>.csv` with a `Date,Open,High,Low,Close,Volume`
//! header (`Dividends` and `Stock Splits` optional, extra columns ignored).
//! The period window is anchored at the latest date in the file.

use crate::domain::error::BandplotError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::period::Period;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
    dividends: Option<usize>,
    stock_splits: Option<usize>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn columns(headers: &csv::StringRecord) -> Result<Columns, String> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| find(name).ok_or_else(|| format!("missing {} column", name));

        Ok(Columns {
            date: require("Date")?,
            open: require("Open")?,
            high: require("High")?,
            low: require("Low")?,
            close: require("Close")?,
            volume: require("Volume")?,
            dividends: find("Dividends"),
            stock_splits: find("Stock Splits"),
        })
    }

    /// Accepts `YYYY-MM-DD` with an optional time/zone suffix.
    fn parse_date(value: &str) -> Result<NaiveDate, String> {
        let day = value.trim().get(..10).unwrap_or(value);
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|e| format!("invalid date {:?}: {}", value, e))
    }

    /// Empty cells are missing values.
    fn parse_number(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, String> {
        match record.get(index).map(str::trim) {
            None | Some("") => Ok(f64::NAN),
            Some(raw) => raw
                .parse()
                .map_err(|e| format!("invalid {} value {:?}: {}", name, raw, e)),
        }
    }

    fn parse_optional(record: &csv::StringRecord, index: Option<usize>, name: &str) -> Result<f64, String> {
        match index {
            Some(i) => Self::parse_number(record, i, name).map(|v| if v.is_nan() { 0.0 } else { v }),
            None => Ok(0.0),
        }
    }

    fn read_bars(&self, ticker: &str) -> Result<Vec<OhlcvBar>, String> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| format!("CSV header error: {}", e))?
            .clone();
        let cols = Self::columns(&headers)?;
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| format!("CSV parse error: {}", e))?;
            let date_str = record
                .get(cols.date)
                .ok_or_else(|| "missing date value".to_string())?;

            bars.push(OhlcvBar {
                ticker: ticker.to_string(),
                date: Self::parse_date(date_str)?,
                open: Self::parse_number(&record, cols.open, "open")?,
                high: Self::parse_number(&record, cols.high, "high")?,
                low: Self::parse_number(&record, cols.low, "low")?,
                close: Self::parse_number(&record, cols.close, "close")?,
                volume: Self::parse_number(&record, cols.volume, "volume")?,
                dividends: Self::parse_optional(&record, cols.dividends, "dividends")?,
                stock_splits: Self::parse_optional(&record, cols.stock_splits, "stock splits")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_history(&self, ticker: &str, period: &str) -> Result<Vec<OhlcvBar>, BandplotError> {
        let window = Period::parse(period).map_err(|reason| BandplotError::InvalidPeriod {
            period: period.to_string(),
            reason,
        })?;

        let bars = self.read_bars(ticker).map_err(|reason| BandplotError::Fetch {
            ticker: ticker.to_string(),
            period: period.to_string(),
            reason,
        })?;

        let Some(anchor) = bars.last().map(|b| b.date) else {
            return Ok(bars);
        };

        let in_window: Vec<OhlcvBar> = bars
            .into_iter()
            .filter(|b| window.contains(b.date, anchor))
            .collect();
        debug!(ticker, period, bars = in_window.len(), "read csv history");
        Ok(in_window)
    }
}

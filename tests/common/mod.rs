#![allow(dead_code)]

use bandplot::domain::chart::ChartSpec;
use bandplot::domain::error::BandplotError;
pub use bandplot::domain::ohlcv::OhlcvBar;
use bandplot::ports::chart_port::ChartPort;
use bandplot::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub calls: Cell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Cell::new(0),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_history(&self, ticker: &str, period: &str) -> Result<Vec<OhlcvBar>, BandplotError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(reason) = self.errors.get(ticker) {
            return Err(BandplotError::Fetch {
                ticker: ticker.to_string(),
                period: period.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }
}

/// Records every chart it is asked to draw without touching the filesystem.
pub struct RecordingChartPort {
    pub rendered: RefCell<Vec<(PathBuf, ChartSpec)>>,
    pub fail_on: Option<String>,
}

impl RecordingChartPort {
    pub fn new() -> Self {
        Self {
            rendered: RefCell::new(Vec::new()),
            fail_on: None,
        }
    }

    /// Fails any render whose path contains `fragment`.
    pub fn failing_on(fragment: &str) -> Self {
        Self {
            rendered: RefCell::new(Vec::new()),
            fail_on: Some(fragment.to_string()),
        }
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.rendered.borrow().iter().map(|(p, _)| p.clone()).collect()
    }
}

impl ChartPort for RecordingChartPort {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, chart: &ChartSpec, path: &Path) -> Result<(), BandplotError> {
        if let Some(fragment) = &self.fail_on {
            if path.to_string_lossy().contains(fragment.as_str()) {
                return Err(BandplotError::Render {
                    path: path.display().to_string(),
                    reason: "simulated failure".into(),
                });
            }
        }
        self.rendered
            .borrow_mut()
            .push((path.to_path_buf(), chart.clone()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(ticker: &str, date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        ticker: ticker.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
        dividends: 0.0,
        stock_splits: 0.0,
    }
}

pub fn generate_bars(ticker: &str, start_date: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| OhlcvBar {
            ticker: ticker.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1000.0 + (i * 10) as f64,
            dividends: 0.0,
            stock_splits: 0.0,
        })
        .collect()
}

/// CSV text in the layout the offline adapter reads.
pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Volume,Dividends,Stock Splits\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume, b.dividends, b.stock_splits
        ));
    }
    out
}

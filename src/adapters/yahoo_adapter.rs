//! Yahoo Finance chart API adapter.
//!
//! One blocking GET per (ticker, period), no retries. Prices are adjusted for
//! dividends and splits when `auto_adjust` is set: open, high and low are
//! scaled by `adjclose / close` and close is replaced by adjclose.

use chrono::{DateTime, NaiveDate};
use reqwest::{StatusCode, Url};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::domain::config::FetchConfig;
use crate::domain::error::BandplotError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) bandplot/0.1";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    events: Events,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Default, Deserialize)]
struct Events {
    #[serde(default)]
    dividends: HashMap<String, DividendEvent>,
    #[serde(default)]
    splits: HashMap<String, SplitEvent>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct SplitEvent {
    date: i64,
    numerator: f64,
    denominator: f64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

pub struct YahooAdapter {
    client: Client,
    base_url: String,
    interval: String,
    auto_adjust: bool,
}

impl YahooAdapter {
    pub fn new(config: &FetchConfig) -> Result<Self, BandplotError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(std::io::Error::other)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            interval: config.interval.clone(),
            auto_adjust: config.auto_adjust,
        })
    }

    pub fn build_url(&self, ticker: &str, period: &str) -> Result<Url, String> {
        Url::parse_with_params(
            &format!("{}/{}", self.base_url, ticker),
            &[
                ("range", period),
                ("interval", self.interval.as_str()),
                ("events", "div,splits"),
                ("includeAdjustedClose", "true"),
            ],
        )
        .map_err(|e| format!("invalid url: {}", e))
    }
}

impl DataPort for YahooAdapter {
    fn fetch_history(&self, ticker: &str, period: &str) -> Result<Vec<OhlcvBar>, BandplotError> {
        let fetch_err = |reason: String| BandplotError::Fetch {
            ticker: ticker.to_string(),
            period: period.to_string(),
            reason,
        };

        let url = self.build_url(ticker, period).map_err(fetch_err)?;
        debug!(%url, "requesting chart");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_err(e.to_string()))?;
        let status = response.status();
        let body = response.text().map_err(|e| fetch_err(e.to_string()))?;

        parse_response(ticker, period, status, &body, self.auto_adjust)
    }
}

/// Like [`parse_chart`], but a non-2xx status is a fetch error carrying the
/// status, unless the body says the symbol has no data.
pub fn parse_response(
    ticker: &str,
    period: &str,
    status: StatusCode,
    body: &str,
    auto_adjust: bool,
) -> Result<Vec<OhlcvBar>, BandplotError> {
    let parsed = parse_chart(ticker, period, body, auto_adjust);
    if status.is_success() {
        return parsed;
    }

    let reason = match parsed {
        Err(BandplotError::NoData { .. }) => return parsed,
        Err(BandplotError::Fetch { reason, .. }) => format!("HTTP {}: {}", status, reason),
        _ => format!("HTTP {}", status),
    };
    Err(BandplotError::Fetch {
        ticker: ticker.to_string(),
        period: period.to_string(),
        reason,
    })
}

/// Parse a chart API body into bars, ascending by date.
pub fn parse_chart(
    ticker: &str,
    period: &str,
    body: &str,
    auto_adjust: bool,
) -> Result<Vec<OhlcvBar>, BandplotError> {
    let fetch_err = |reason: String| BandplotError::Fetch {
        ticker: ticker.to_string(),
        period: period.to_string(),
        reason,
    };

    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| fetch_err(format!("unexpected response: {}", e)))?;

    if let Some(error) = response.chart.error {
        let lowered = error.description.to_lowercase();
        if error.code == "Not Found" || lowered.contains("no data found") || lowered.contains("delisted") {
            return Err(BandplotError::NoData {
                ticker: ticker.to_string(),
                period: period.to_string(),
            });
        }
        return Err(fetch_err(format!("{}: {}", error.code, error.description)));
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    Ok(build_bars(ticker, data, auto_adjust))
}

fn local_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmtoffset, 0).map(|dt| dt.date_naive())
}

fn build_bars(ticker: &str, data: ChartData, auto_adjust: bool) -> Vec<OhlcvBar> {
    let offset = data.meta.gmtoffset;
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = data
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let mut dividends: HashMap<NaiveDate, f64> = HashMap::new();
    for event in data.events.dividends.values() {
        if let Some(date) = local_date(event.date, offset) {
            *dividends.entry(date).or_insert(0.0) += event.amount;
        }
    }
    let mut splits: HashMap<NaiveDate, f64> = HashMap::new();
    for event in data.events.splits.values() {
        if event.denominator == 0.0 {
            continue;
        }
        if let Some(date) = local_date(event.date, offset) {
            splits.insert(date, event.numerator / event.denominator);
        }
    }

    let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(data.timestamp.len());
    for (i, &ts) in data.timestamp.iter().enumerate() {
        let Some(date) = local_date(ts, offset) else {
            continue;
        };
        let (open, high, low, close) = (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
        );
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
            continue;
        }

        let mut open = open.unwrap_or(f64::NAN);
        let mut high = high.unwrap_or(f64::NAN);
        let mut low = low.unwrap_or(f64::NAN);
        let mut close = close.unwrap_or(f64::NAN);

        if let Some(adj) = at(&adjclose, i).filter(|_| auto_adjust) {
            if close.is_finite() && close != 0.0 {
                let ratio = adj / close;
                open *= ratio;
                high *= ratio;
                low *= ratio;
                close = adj;
            }
        }

        bars.push(OhlcvBar {
            ticker: ticker.to_string(),
            date,
            open,
            high,
            low,
            close,
            volume: at(&quote.volume, i).unwrap_or(f64::NAN),
            dividends: dividends.get(&date).copied().unwrap_or(0.0),
            stock_splits: splits.get(&date).copied().unwrap_or(0.0),
        });
    }

    bars.sort_by_key(|b| b.date);
    bars
}

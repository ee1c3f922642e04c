//! Batch orchestration over every (period, ticker, metric) combination.
//!
//! Fetches once per (period, ticker) and renders once per metric. Failures are
//! recorded per unit of work and never stop the batch.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::domain::band::{ReferenceBand, reference_bands};
use crate::domain::chart::ChartSpec;
use crate::domain::config::AppConfig;
use crate::domain::error::BandplotError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::period::directory_name;
use crate::domain::series::PriceSeries;
use crate::domain::stats::{MIN_POINTS, Summary};
use crate::ports::chart_port::ChartPort;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub period: String,
    pub ticker: String,
    pub metric: String,
}

/// All combinations in processing order: period, then ticker, then metric.
pub fn plan_jobs(config: &AppConfig) -> Vec<Job> {
    let mut jobs = Vec::with_capacity(config.combination_count());
    for period in &config.periods {
        for ticker in &config.tickers {
            for metric in &config.metrics {
                jobs.push(Job {
                    period: period.clone(),
                    ticker: ticker.clone(),
                    metric: metric.clone(),
                });
            }
        }
    }
    jobs
}

/// `<root>/<period>r/<ticker>_<metric>_<YYYY-MM-DD>.<ext>`
pub fn output_path(
    root: &Path,
    period: &str,
    ticker: &str,
    metric: &str,
    date: NaiveDate,
    extension: &str,
) -> PathBuf {
    root.join(directory_name(period)).join(format!(
        "{}_{}_{}.{}",
        ticker,
        metric,
        date.format("%Y-%m-%d"),
        extension
    ))
}

/// Statistics for one metric of one ticker.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub series: PriceSeries,
    pub summary: Summary,
    pub bands: Vec<ReferenceBand>,
}

pub fn analyze(ticker: &str, metric: &str, bars: &[OhlcvBar]) -> Result<Analysis, BandplotError> {
    let series = PriceSeries::from_bars(ticker, metric, bars)?;
    let summary = Summary::for_series(&series)?;
    let bands = reference_bands(&summary);
    Ok(Analysis {
        series,
        summary,
        bands,
    })
}

/// Fetch history, treating an empty result as `NoData`.
pub fn fetch_bars(
    data: &dyn DataPort,
    ticker: &str,
    period: &str,
) -> Result<Vec<OhlcvBar>, BandplotError> {
    let bars = data.fetch_history(ticker, period)?;
    if bars.is_empty() {
        return Err(BandplotError::NoData {
            ticker: ticker.to_string(),
            period: period.to_string(),
        });
    }
    Ok(bars)
}

pub fn render_metric(
    charts: &dyn ChartPort,
    bars: &[OhlcvBar],
    job: &Job,
    output_root: &Path,
    today: NaiveDate,
) -> Result<PathBuf, BandplotError> {
    let analysis = analyze(&job.ticker, &job.metric, bars)?;
    let chart = ChartSpec::build(
        &analysis.series,
        &job.period,
        &analysis.summary,
        &analysis.bands,
        today,
    )
    .ok_or_else(|| BandplotError::InsufficientData {
        ticker: job.ticker.clone(),
        metric: job.metric.clone(),
        points: 0,
        minimum: MIN_POINTS,
    })?;

    let path = output_path(
        output_root,
        &job.period,
        &job.ticker,
        &job.metric,
        today,
        charts.extension(),
    );
    charts.render(&chart, &path)?;
    Ok(path)
}

#[derive(Debug)]
pub struct JobOutcome {
    pub period: String,
    pub ticker: String,
    /// `None` when the failure happened before any metric was processed.
    pub metric: Option<String>,
    pub result: Result<PathBuf, BandplotError>,
}

impl JobOutcome {
    pub fn describe(&self) -> String {
        match &self.metric {
            Some(metric) => format!("{} {} {}", self.period, self.ticker, metric),
            None => format!("{} {}", self.period, self.ticker),
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<JobOutcome>,
}

impl RunSummary {
    pub fn written(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(PathBuf::as_path))
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&JobOutcome, &BandplotError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o, e)))
    }

    pub fn first_error(&self) -> Option<&BandplotError> {
        self.failures().map(|(_, e)| e).next()
    }

    pub fn is_success(&self) -> bool {
        self.first_error().is_none()
    }
}

pub fn run_pipeline(
    data: &dyn DataPort,
    charts: &dyn ChartPort,
    config: &AppConfig,
    today: NaiveDate,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let root = &config.output.dir;

    for period in &config.periods {
        for ticker in &config.tickers {
            let bars = match fetch_bars(data, ticker, period) {
                Ok(bars) => bars,
                Err(e) => {
                    summary.outcomes.push(JobOutcome {
                        period: period.clone(),
                        ticker: ticker.clone(),
                        metric: None,
                        result: Err(e),
                    });
                    continue;
                }
            };

            for metric in &config.metrics {
                let job = Job {
                    period: period.clone(),
                    ticker: ticker.clone(),
                    metric: metric.clone(),
                };
                let result = render_metric(charts, &bars, &job, root, today);
                summary.outcomes.push(JobOutcome {
                    period: job.period,
                    ticker: job.ticker,
                    metric: Some(job.metric),
                    result,
                });
            }
        }
    }

    summary
}

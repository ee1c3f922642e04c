//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::fmt::Write as _;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::chart_render::chart_port_for;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::yahoo_adapter::YahooAdapter;
use crate::adapters::yaml_config_adapter::YamlConfigAdapter;
use crate::domain::config::{
    AppConfig, DEFAULT_BASE_URL, DEFAULT_CONFIG_FILE, DEFAULT_HEIGHT, DEFAULT_INTERVAL,
    DEFAULT_QUALITY, DEFAULT_TIMEOUT_SECS, DEFAULT_WIDTH, FetchConfig, ImageFormat, OutputConfig,
};
use crate::domain::error::BandplotError;
use crate::domain::metric::Metric;
use crate::domain::period::Period;
use crate::domain::pipeline::{Analysis, analyze, fetch_bars, output_path, plan_jobs, run_pipeline};
use crate::domain::rounding::format_rounded;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(
    name = "bandplot",
    about = "Chart market data against mean and standard deviation bands"
)]
pub struct Cli {
    /// Defaults to `run` with `config.yaml` from the working directory.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch, analyze and chart every configured combination
    Run(RunArgs),
    /// Check a configuration file and list the charts it would produce
    Validate {
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
    /// Print the summary statistics and bands for one series
    Stats {
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        #[arg(long)]
        ticker: String,
        #[arg(long)]
        period: String,
        #[arg(long)]
        metric: String,
        /// Read `<DIR>/<TICKER>.csv` instead of the remote source
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
    /// Root directory for the `<period>r` folders
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Date stamped into titles and file names (YYYY-MM-DD), default today
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Image format: jpg or svg
    #[arg(long)]
    pub format: Option<ImageFormat>,
    /// Read `<DIR>/<TICKER>.csv` instead of the remote source
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            output: None,
            date: None,
            format: None,
            data_dir: None,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command.unwrap_or_else(|| Command::Run(RunArgs::default())) {
        Command::Run(args) => run_batch(&args),
        Command::Validate { config } => run_validate(&config),
        Command::Stats {
            config,
            ticker,
            period,
            metric,
            data_dir,
        } => run_stats(&config, &ticker, &period, &metric, data_dir),
    }
}

fn fail(err: &BandplotError) -> ExitCode {
    error!("{err}");
    ExitCode::from(err)
}

pub fn load_config(path: &Path) -> Result<YamlConfigAdapter, BandplotError> {
    info!("loading config from {}", path.display());
    YamlConfigAdapter::from_file(path)
}

fn invalid(key: &str, reason: impl Into<String>) -> BandplotError {
    BandplotError::ConfigInvalid {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn required_list(adapter: &dyn ConfigPort, key: &str) -> Result<Vec<String>, BandplotError> {
    if !adapter.contains(key) {
        return Err(BandplotError::ConfigMissing { key: key.into() });
    }
    let items = adapter
        .get_list(key)
        .ok_or_else(|| invalid(key, "expected a list of values"))?;
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

fn int_in_range(
    adapter: &dyn ConfigPort,
    key: &str,
    default: i64,
    range: RangeInclusive<i64>,
) -> Result<i64, BandplotError> {
    let Some(value) = adapter.get_int(key).map_err(|reason| invalid(key, reason))? else {
        return Ok(default);
    };
    if !range.contains(&value) {
        return Err(invalid(
            key,
            format!("must be between {} and {}", range.start(), range.end()),
        ));
    }
    Ok(value)
}

pub fn build_output_config(adapter: &dyn ConfigPort) -> Result<OutputConfig, BandplotError> {
    let format = match adapter.get_string("output.format") {
        Some(raw) => raw
            .parse::<ImageFormat>()
            .map_err(|reason| invalid("output.format", reason))?,
        None => ImageFormat::Jpeg,
    };
    let dimension = 1..=i64::from(u32::MAX);

    Ok(OutputConfig {
        dir: adapter
            .get_string("output.dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
        format,
        width: int_in_range(adapter, "output.width", DEFAULT_WIDTH.into(), dimension.clone())? as u32,
        height: int_in_range(adapter, "output.height", DEFAULT_HEIGHT.into(), dimension)? as u32,
        quality: int_in_range(adapter, "output.quality", DEFAULT_QUALITY.into(), 1..=100)? as u8,
    })
}

pub fn build_fetch_config(adapter: &dyn ConfigPort) -> Result<FetchConfig, BandplotError> {
    let timeout_secs = int_in_range(
        adapter,
        "fetch.timeout_secs",
        DEFAULT_TIMEOUT_SECS as i64,
        1..=i64::from(u32::MAX),
    )?;

    Ok(FetchConfig {
        interval: adapter
            .get_string("fetch.interval")
            .unwrap_or_else(|| DEFAULT_INTERVAL.to_string()),
        timeout_secs: timeout_secs as u64,
        base_url: adapter
            .get_string("fetch.base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        auto_adjust: adapter
            .get_bool("fetch.auto_adjust")
            .map_err(|reason| invalid("fetch.auto_adjust", reason))?
            .unwrap_or(true),
        data_dir: adapter.get_string("fetch.data_dir").map(PathBuf::from),
    })
}

pub fn build_app_config(adapter: &dyn ConfigPort) -> Result<AppConfig, BandplotError> {
    Ok(AppConfig {
        tickers: required_list(adapter, "stocks")?,
        periods: required_list(adapter, "period")?,
        metrics: required_list(adapter, "metrics")?,
        output: build_output_config(adapter)?,
        fetch: build_fetch_config(adapter)?,
    })
}

/// Command-line flags take precedence over the file.
pub fn apply_overrides(config: &mut AppConfig, args: &RunArgs) {
    if let Some(dir) = &args.output {
        config.output.dir = dir.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(dir) = &args.data_dir {
        config.fetch.data_dir = Some(dir.clone());
    }
}

pub fn build_data_port(fetch: &FetchConfig) -> Result<Box<dyn DataPort>, BandplotError> {
    match &fetch.data_dir {
        Some(dir) => {
            info!("reading market data from {}", dir.display());
            Ok(Box::new(CsvAdapter::new(dir.clone())))
        }
        None => Ok(Box::new(YahooAdapter::new(fetch)?)),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn run_batch(args: &RunArgs) -> ExitCode {
    let adapter = match load_config(&args.config) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let mut config = match build_app_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    apply_overrides(&mut config, args);

    let empty = config.empty_lists();
    if !empty.is_empty() {
        warn!("nothing to do: empty {}", empty.join(", "));
        return ExitCode::SUCCESS;
    }

    let data = match build_data_port(&config.fetch) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };
    let charts = chart_port_for(&config.output);
    let date = args.date.unwrap_or_else(today);

    info!(
        charts = config.combination_count(),
        output = %config.output.dir.display(),
        "processing {} periods x {} tickers x {} metrics",
        config.periods.len(),
        config.tickers.len(),
        config.metrics.len()
    );

    let summary = run_pipeline(data.as_ref(), charts.as_ref(), &config, date);

    for outcome in &summary.outcomes {
        match &outcome.result {
            Ok(path) => info!("wrote {}", path.display()),
            Err(err) => error!("{}: {}", outcome.describe(), err),
        }
    }
    let failed = summary.failures().count();
    info!(
        written = summary.written().len(),
        failed, "finished"
    );

    match summary.first_error() {
        Some(err) => ExitCode::from(err),
        None => ExitCode::SUCCESS,
    }
}

/// Problems that would fail every chart of a period or metric.
pub fn check_lists(config: &AppConfig) -> Vec<BandplotError> {
    let periods = config.periods.iter().filter_map(|p| {
        Period::parse(p)
            .err()
            .map(|reason| BandplotError::InvalidPeriod {
                period: p.clone(),
                reason,
            })
    });
    let metrics = config.metrics.iter().filter_map(|m| {
        m.parse::<Metric>()
            .err()
            .map(|_| BandplotError::UnknownMetric {
                ticker: config.tickers.join(", "),
                metric: m.clone(),
            })
    });
    periods.chain(metrics).collect()
}

/// Human-readable run plan printed by `validate`.
pub fn format_plan(config: &AppConfig, date: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "stocks:  {}", config.tickers.join(", "));
    let _ = writeln!(out, "period:  {}", config.periods.join(", "));
    let _ = writeln!(out, "metrics: {}", config.metrics.join(", "));
    let _ = match &config.fetch.data_dir {
        Some(dir) => writeln!(out, "source:  csv files in {}", dir.display()),
        None => writeln!(
            out,
            "source:  {} (interval {}, timeout {}s)",
            config.fetch.base_url, config.fetch.interval, config.fetch.timeout_secs
        ),
    };
    let _ = writeln!(
        out,
        "output:  {} ({} {}x{})",
        config.output.dir.display(),
        config.output.format,
        config.output.width,
        config.output.height
    );
    let _ = writeln!(out, "\n{} charts:", config.combination_count());
    for job in plan_jobs(config) {
        let path = output_path(
            &config.output.dir,
            &job.period,
            &job.ticker,
            &job.metric,
            date,
            config.output.format.extension(),
        );
        let _ = writeln!(out, "  {}", path.display());
    }
    out
}

/// Plan text for `config_path` plus any period or metric that cannot work.
pub fn validate_report(
    config_path: &Path,
    date: NaiveDate,
) -> Result<(String, Vec<BandplotError>), BandplotError> {
    let config = build_app_config(&load_config(config_path)?)?;
    Ok((format_plan(&config, date), check_lists(&config)))
}

fn run_validate(config_path: &Path) -> ExitCode {
    let (plan, problems) = match validate_report(config_path, today()) {
        Ok(report) => report,
        Err(e) => return fail(&e),
    };

    print!("{plan}");
    for problem in &problems {
        error!("{problem}");
    }
    match problems.first() {
        Some(err) => ExitCode::from(err),
        None => ExitCode::SUCCESS,
    }
}

/// Summary and band table printed by `stats`.
pub fn format_stats(period: &str, analysis: &Analysis) -> String {
    let series = &analysis.series;
    let mut out = String::new();
    let _ = write!(
        out,
        "{} {} over {}: {} points",
        series.ticker,
        series.metric_name,
        period,
        analysis.summary.count
    );
    if let Some((start, end)) = series.date_range() {
        let _ = write!(out, " ({} to {})", start, end);
    }
    out.push('\n');
    let _ = writeln!(out, "{:<6} {:>14}", "mean", format_rounded(analysis.summary.mean));
    let _ = writeln!(out, "{:<6} {:>14}", "sd", format_rounded(analysis.summary.std_dev));
    for band in &analysis.bands {
        let _ = writeln!(
            out,
            "{:<6} {:>14}  {}",
            band.label,
            format_rounded(band.value),
            band.color
        );
    }
    out
}

/// Fetch one series and format its statistics. `data_dir` overrides the
/// configured source.
pub fn stats_report(
    config_path: &Path,
    ticker: &str,
    period: &str,
    metric: &str,
    data_dir: Option<PathBuf>,
) -> Result<String, BandplotError> {
    let mut fetch = build_fetch_config(&load_config(config_path)?)?;
    if data_dir.is_some() {
        fetch.data_dir = data_dir;
    }

    let data = build_data_port(&fetch)?;
    let bars = fetch_bars(data.as_ref(), ticker, period)?;
    let analysis = analyze(ticker, metric, &bars)?;
    Ok(format_stats(period, &analysis))
}

fn run_stats(
    config_path: &Path,
    ticker: &str,
    period: &str,
    metric: &str,
    data_dir: Option<PathBuf>,
) -> ExitCode {
    match stats_report(config_path, ticker, period, metric, data_dir) {
        Ok(table) => {
            print!("{table}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

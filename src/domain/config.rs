//! Typed run configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_INTERVAL: &str = "1d";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_QUALITY: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "svg" => Ok(ImageFormat::Svg),
            other => Err(format!("unsupported image format {other:?} (jpg, svg)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    /// Root under which the `<period>r` directories are created.
    pub dir: PathBuf,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    /// JPEG quality, 1..=100.
    pub quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            format: ImageFormat::Jpeg,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            quality: DEFAULT_QUALITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub interval: String,
    pub timeout_secs: u64,
    pub base_url: String,
    /// Adjust open/high/low/close for dividends and splits.
    pub auto_adjust: bool,
    /// Read `<data_dir>/<TICKER>.csv` instead of calling the remote source.
    pub data_dir: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
            auto_adjust: true,
            data_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub tickers: Vec<String>,
    pub periods: Vec<String>,
    pub metrics: Vec<String>,
    pub output: OutputConfig,
    pub fetch: FetchConfig,
}

impl AppConfig {
    pub fn new(tickers: Vec<String>, periods: Vec<String>, metrics: Vec<String>) -> Self {
        Self {
            tickers,
            periods,
            metrics,
            output: OutputConfig::default(),
            fetch: FetchConfig::default(),
        }
    }

    /// Number of figures a fully successful run writes.
    pub fn combination_count(&self) -> usize {
        self.periods.len() * self.tickers.len() * self.metrics.len()
    }

    /// Names of the lists that are empty; any of them means no output.
    pub fn empty_lists(&self) -> Vec<&'static str> {
        let mut empty = Vec::new();
        if self.tickers.is_empty() {
            empty.push("stocks");
        }
        if self.periods.is_empty() {
            empty.push("period");
        }
        if self.metrics.is_empty() {
            empty.push("metrics");
        }
        empty
    }
}

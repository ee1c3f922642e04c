//! Domain error types.

/// Top-level error type for bandplot.
#[derive(Debug, thiserror::Error)]
pub enum BandplotError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key {key}")]
    ConfigMissing { key: String },

    #[error("invalid config value {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    #[error("failed to fetch {ticker} over {period}: {reason}")]
    Fetch {
        ticker: String,
        period: String,
        reason: String,
    },

    #[error("no data for {ticker} over {period}")]
    NoData { ticker: String, period: String },

    #[error("invalid period {period:?}: {reason}")]
    InvalidPeriod { period: String, reason: String },

    #[error("unknown metric {metric:?} for {ticker}")]
    UnknownMetric { ticker: String, metric: String },

    #[error("insufficient data for {ticker} {metric}: have {points} points, need {minimum}")]
    InsufficientData {
        ticker: String,
        metric: String,
        points: usize,
        minimum: usize,
    },

    #[error("failed to render {path}: {reason}")]
    Render { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BandplotError> for std::process::ExitCode {
    fn from(err: &BandplotError) -> Self {
        let code: u8 = match err {
            BandplotError::Io(_) => 1,
            BandplotError::ConfigParse { .. }
            | BandplotError::ConfigMissing { .. }
            | BandplotError::ConfigInvalid { .. } => 2,
            BandplotError::Fetch { .. }
            | BandplotError::NoData { .. }
            | BandplotError::InvalidPeriod { .. } => 3,
            BandplotError::Render { .. } => 4,
            BandplotError::UnknownMetric { .. } | BandplotError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

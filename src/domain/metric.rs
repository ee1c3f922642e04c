//! Metric names: the numeric columns of a price table.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Open,
    High,
    Low,
    Close,
    Volume,
    Dividends,
    StockSplits,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Open,
        Metric::High,
        Metric::Low,
        Metric::Close,
        Metric::Volume,
        Metric::Dividends,
        Metric::StockSplits,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            Metric::Open => "Open",
            Metric::High => "High",
            Metric::Low => "Low",
            Metric::Close => "Close",
            Metric::Volume => "Volume",
            Metric::Dividends => "Dividends",
            Metric::StockSplits => "Stock Splits",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "open" => Ok(Metric::Open),
            "high" => Ok(Metric::High),
            "low" => Ok(Metric::Low),
            "close" => Ok(Metric::Close),
            "volume" => Ok(Metric::Volume),
            "dividends" => Ok(Metric::Dividends),
            "stocksplits" => Ok(Metric::StockSplits),
            _ => Err(format!(
                "expected one of {}",
                Metric::ALL
                    .iter()
                    .map(|m| m.column_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

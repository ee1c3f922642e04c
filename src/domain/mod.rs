//! Core domain types and logic. No I/O beyond the port traits.

pub mod band;
pub mod chart;
pub mod config;
pub mod error;
pub mod metric;
pub mod ohlcv;
pub mod period;
pub mod pipeline;
pub mod rounding;
pub mod series;
pub mod stats;

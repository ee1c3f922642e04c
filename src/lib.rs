//! bandplot: price band charts for a list of tickers.
//!
//! Hexagonal architecture: pure statistics and chart layout in [`domain`],
//! port traits in [`ports`], network/file/image implementations in
//! [`adapters`], and wiring in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;

//! Market data port trait.

use crate::domain::error::BandplotError;
use crate::domain::ohlcv::OhlcvBar;

pub trait DataPort {
    /// Daily bars for `ticker` over `period`, ascending by date. An unknown
    /// ticker may come back as an empty list or as `NoData`.
    fn fetch_history(&self, ticker: &str, period: &str) -> Result<Vec<OhlcvBar>, BandplotError>;
}

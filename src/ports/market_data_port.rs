//! Market data port trait.

use crate::domain::error::GodlifeError;
use crate::domain::fundamentals::Fundamentals;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::period::Period;

pub trait MarketDataPort {
    /// Daily bars for `ticker` covering `period`, oldest first. An unknown
    /// ticker may yield an empty vector rather than an error.
    fn fetch_history(&self, ticker: &str, period: Period) -> Result<Vec<OhlcvBar>, GodlifeError>;

    fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, GodlifeError>;
}

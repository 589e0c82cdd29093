//! OHLCV bars and the non-empty price series built from them.

use crate::domain::error::GodlifeError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Time-ascending, non-empty sequence of bars for one ticker.
///
/// Construction is the only place emptiness is checked, so every indicator
/// computed from a `PriceSeries` has at least one observation to work with.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(ticker: &str, mut bars: Vec<OhlcvBar>) -> Result<Self, GodlifeError> {
        if bars.is_empty() {
            return Err(GodlifeError::NoData {
                ticker: ticker.to_string(),
            });
        }
        bars.sort_by_key(|b| b.date);
        Ok(Self {
            ticker: ticker.to_string(),
            bars,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last(&self) -> &OhlcvBar {
        // Non-empty by construction.
        &self.bars[self.bars.len() - 1]
    }

    pub fn previous(&self) -> Option<&OhlcvBar> {
        self.bars.len().checked_sub(2).map(|i| &self.bars[i])
    }
}

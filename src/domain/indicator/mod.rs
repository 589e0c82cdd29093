//! Technical indicator implementations.
//!
//! - `IndicatorPoint`: a single point in an indicator time series
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator values, aligned with bars
//! - `IndicatorSnapshot`: the scalars the screener and viewer read off the last bar

pub mod rsi;
pub mod sma;

use crate::domain::error::GodlifeError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
}

impl IndicatorType {
    /// Bars needed before the first valid point.
    pub fn min_bars(&self) -> usize {
        match self {
            IndicatorType::Sma(window) => *window,
            IndicatorType::Rsi(window) => window + 1,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(window) => write!(f, "SMA({})", window),
            IndicatorType::Rsi(window) => write!(f, "RSI({})", window),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Value at the last bar, if it is past warmup.
    pub fn latest(&self) -> Option<f64> {
        self.values
            .last()
            .filter(|p| p.valid)
            .map(|p| p.value)
    }
}

/// Indicator values at the last bar of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub close: f64,
    /// `None` while the series is shorter than the SMA window.
    pub sma: Option<f64>,
    pub rsi: f64,
}

/// Compute SMA(`ma_window`) and RSI(`rsi_window`) at the last bar.
///
/// RSI must be defined at the last bar. The SMA only has to be defined when
/// `require_sma` is set; otherwise a short series yields `sma: None`.
/// Fails with `InsufficientData` naming the indicator that is not warmed up.
pub fn compute_snapshot(
    series: &PriceSeries,
    ma_window: usize,
    rsi_window: usize,
    require_sma: bool,
) -> Result<IndicatorSnapshot, GodlifeError> {
    let bars = series.bars();
    let insufficient = |kind: IndicatorType| GodlifeError::InsufficientData {
        ticker: series.ticker().to_string(),
        bars: bars.len(),
        minimum: kind.min_bars(),
    };

    let sma = sma::calculate_sma(bars, ma_window).latest();
    if require_sma && sma.is_none() {
        return Err(insufficient(IndicatorType::Sma(ma_window)));
    }
    let rsi = rsi::calculate_rsi(bars, rsi_window)
        .latest()
        .ok_or_else(|| insufficient(IndicatorType::Rsi(rsi_window)))?;

    Ok(IndicatorSnapshot {
        close: series.last().close,
        sma,
        rsi,
    })
}

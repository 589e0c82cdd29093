//! Per-ticker evaluation: fetch, compute indicators, gate on thresholds.
//!
//! [`evaluate_ticker`] never returns an error. Every way a ticker can end up
//! is a [`TickerOutcome`] variant, so the pipeline can keep going after a bad
//! symbol and still count what happened to it.

use crate::domain::error::GodlifeError;
use crate::domain::fundamentals::Fundamentals;
use crate::domain::indicator::{compute_snapshot, IndicatorSnapshot};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::period::Period;
use crate::ports::market_data_port::MarketDataPort;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// P/E must lie in (0, per_max).
    pub per_max: f64,
    /// ROE (fraction) must exceed this.
    pub roe_min: f64,
    /// RSI must be below this.
    pub rsi_max: f64,
    /// Additionally require close > SMA.
    pub require_above_ma: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            per_max: 30.0,
            roe_min: 0.15,
            rsi_max: 35.0,
            require_above_ma: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationConfig {
    pub period: Period,
    pub ma_window: usize,
    pub rsi_window: usize,
    pub thresholds: Thresholds,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            period: Period::SixMonths,
            ma_window: 20,
            rsi_window: 14,
            thresholds: Thresholds::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    PeInRange,
    RoeAboveFloor,
    RsiBelowMax,
    CloseAboveMa,
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Predicate::PeInRange => "per",
            Predicate::RoeAboveFloor => "roe",
            Predicate::RsiBelowMax => "rsi",
            Predicate::CloseAboveMa => "ma",
        };
        f.write_str(name)
    }
}

/// A ticker that passed every predicate, with the values it passed on.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub ticker: String,
    pub close: f64,
    /// `None` when the history was shorter than the SMA window.
    pub sma: Option<f64>,
    pub rsi: f64,
    pub trailing_pe: f64,
    pub return_on_equity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoData,
    InsufficientBars { bars: usize, minimum: usize },
}

#[derive(Debug)]
pub enum TickerOutcome {
    Matched(MatchRecord),
    Rejected { failed: Vec<Predicate> },
    Skipped(SkipReason),
    Failed(GodlifeError),
}

impl TickerOutcome {
    pub fn into_match(self) -> Option<MatchRecord> {
        match self {
            TickerOutcome::Matched(record) => Some(record),
            _ => None,
        }
    }
}

/// Predicates that fail for this snapshot; empty means a match.
pub fn failed_predicates(
    snapshot: &IndicatorSnapshot,
    fundamentals: &Fundamentals,
    thresholds: &Thresholds,
) -> Vec<Predicate> {
    let per = fundamentals.pe_or_default();
    let roe = fundamentals.roe_or_default();

    let checks = [
        (Predicate::PeInRange, per > 0.0 && per < thresholds.per_max),
        (Predicate::RoeAboveFloor, roe > thresholds.roe_min),
        (Predicate::RsiBelowMax, snapshot.rsi < thresholds.rsi_max),
        (
            Predicate::CloseAboveMa,
            !thresholds.require_above_ma || snapshot.sma.is_some_and(|sma| snapshot.close > sma),
        ),
    ];

    checks
        .into_iter()
        .filter(|(_, passed)| !passed)
        .map(|(predicate, _)| predicate)
        .collect()
}

/// Gate an already-computed snapshot. Pure.
pub fn evaluate_snapshot(
    ticker: &str,
    snapshot: &IndicatorSnapshot,
    fundamentals: &Fundamentals,
    thresholds: &Thresholds,
) -> TickerOutcome {
    let failed = failed_predicates(snapshot, fundamentals, thresholds);
    if !failed.is_empty() {
        return TickerOutcome::Rejected { failed };
    }
    TickerOutcome::Matched(MatchRecord {
        ticker: ticker.to_string(),
        close: snapshot.close,
        sma: snapshot.sma,
        rsi: snapshot.rsi,
        trailing_pe: fundamentals.pe_or_default(),
        return_on_equity: fundamentals.roe_or_default(),
    })
}

pub fn evaluate_ticker(
    port: &dyn MarketDataPort,
    ticker: &str,
    config: &EvaluationConfig,
) -> TickerOutcome {
    let bars = match port.fetch_history(ticker, config.period) {
        Ok(bars) => bars,
        Err(e) => {
            warn!(ticker, error = %e, "skipping ticker, price history unavailable");
            return TickerOutcome::Failed(e);
        }
    };

    let series = match PriceSeries::new(ticker, bars) {
        Ok(series) => series,
        Err(_) => {
            debug!(ticker, "skipping ticker, empty price history");
            return TickerOutcome::Skipped(SkipReason::NoData);
        }
    };

    let snapshot = match compute_snapshot(
        &series,
        config.ma_window,
        config.rsi_window,
        config.thresholds.require_above_ma,
    ) {
        Ok(snapshot) => snapshot,
        Err(GodlifeError::InsufficientData { bars, minimum, .. }) => {
            debug!(ticker, bars, minimum, "skipping ticker, not enough bars");
            return TickerOutcome::Skipped(SkipReason::InsufficientBars { bars, minimum });
        }
        Err(e) => return TickerOutcome::Failed(e),
    };

    let fundamentals = port.fetch_fundamentals(ticker).unwrap_or_else(|e| {
        warn!(ticker, error = %e, "fundamentals unavailable, using conservative defaults");
        Fundamentals::unavailable()
    });

    let outcome = evaluate_snapshot(ticker, &snapshot, &fundamentals, &config.thresholds);
    if let TickerOutcome::Rejected { failed } = &outcome {
        let failed: Vec<String> = failed.iter().map(|p| p.to_string()).collect();
        debug!(ticker, failed = %failed.join(","), "rejected");
    }
    outcome
}

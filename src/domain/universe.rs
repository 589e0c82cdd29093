//! Ticker universe for one screening run.
//!
//! A universe is either the configured watch-list or a constituent list
//! fetched through a [`ConstituentPort`]. A failed or empty fetch degrades to
//! [`FALLBACK_TICKERS`] instead of aborting the run.

use crate::ports::constituent_port::ConstituentPort;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Default watch-list used when the config names no tickers.
pub const DEFAULT_WATCHLIST: [&str; 13] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META", "AMD", "INTC", "QCOM", "KO", "MCD",
    "O",
];

/// Safe list used when a constituent fetch fails.
pub const FALLBACK_TICKERS: [&str; 7] = ["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    pub tickers: Vec<String>,
    pub origin: UniverseOrigin,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.tickers.len()
    }
}

/// Where the tickers of a resolved universe came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniverseOrigin {
    Watchlist,
    Constituents,
    Fallback,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("ticker list is empty")]
    Empty,

    #[error("unknown universe mode '{0}' (expected watchlist or sp500)")]
    UnknownMode(String),
}

/// How the universe is acquired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniverseSource {
    Watchlist(Vec<String>),
    Sp500,
}

impl UniverseSource {
    pub fn label(&self) -> &'static str {
        match self {
            UniverseSource::Watchlist(_) => "watchlist",
            UniverseSource::Sp500 => "sp500",
        }
    }
}

impl fmt::Display for UniverseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniverseSource::Watchlist(tickers) => {
                write!(f, "watchlist ({})", tickers.join(", "))
            }
            UniverseSource::Sp500 => write!(f, "S&P 500 constituents"),
        }
    }
}

/// Mode names accepted in config, without the ticker payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniverseMode {
    Watchlist,
    Sp500,
}

impl FromStr for UniverseMode {
    type Err = UniverseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "watchlist" | "static" => Ok(UniverseMode::Watchlist),
            "sp500" | "s&p500" => Ok(UniverseMode::Sp500),
            other => Err(UniverseError::UnknownMode(other.to_string())),
        }
    }
}

/// Parse a comma-separated ticker list: trimmed, upper-cased, de-duplicated
/// in first-seen order.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if seen.insert(ticker.clone()) {
            tickers.push(ticker);
        }
    }

    Ok(tickers)
}

/// Map a publisher's symbol to the market-data notation (`BRK.B` -> `BRK-B`).
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase().replace('.', "-")
}

fn dedup_in_order(symbols: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    symbols
        .into_iter()
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}

fn fallback() -> Universe {
    Universe {
        tickers: FALLBACK_TICKERS.iter().map(|s| s.to_string()).collect(),
        origin: UniverseOrigin::Fallback,
    }
}

/// Resolve the universe for one run.
///
/// Only an empty watch-list is an error; constituent failures fall back.
pub fn resolve_universe(
    source: &UniverseSource,
    constituents: &dyn ConstituentPort,
) -> Result<Universe, UniverseError> {
    match source {
        UniverseSource::Watchlist(tickers) => {
            let tickers = dedup_in_order(tickers.iter().map(|t| t.trim().to_uppercase()));
            if tickers.is_empty() {
                return Err(UniverseError::Empty);
            }
            Ok(Universe {
                tickers,
                origin: UniverseOrigin::Watchlist,
            })
        }
        UniverseSource::Sp500 => match constituents.fetch_constituents() {
            Ok(raw) => {
                let tickers = dedup_in_order(raw.iter().map(|s| normalize_symbol(s)));
                if tickers.is_empty() {
                    warn!("constituent source returned no symbols, using fallback list");
                    return Ok(fallback());
                }
                info!(count = tickers.len(), "fetched constituent list");
                Ok(Universe {
                    tickers,
                    origin: UniverseOrigin::Constituents,
                })
            }
            Err(e) => {
                warn!(error = %e, "constituent fetch failed, using fallback list");
                Ok(fallback())
            }
        },
    }
}

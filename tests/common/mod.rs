#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use godlife::domain::error::GodlifeError;
use godlife::domain::evaluator::MatchRecord;
use godlife::domain::fundamentals::Fundamentals;
pub use godlife::domain::ohlcv::OhlcvBar;
use godlife::domain::notification::Credentials;
use godlife::domain::period::Period;
use godlife::ports::constituent_port::ConstituentPort;
use godlife::ports::market_data_port::MarketDataPort;
use godlife::ports::notify_port::NotifyPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockMarketData {
    pub bars: HashMap<String, Vec<OhlcvBar>>,
    pub fundamentals: HashMap<String, Fundamentals>,
    pub errors: HashMap<String, String>,
    pub requested: RefCell<Vec<String>>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            fundamentals: HashMap::new(),
            errors: HashMap::new(),
            requested: RefCell::new(vec![]),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.bars.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_fundamentals(mut self, ticker: &str, pe: f64, roe: f64) -> Self {
        self.fundamentals.insert(
            ticker.to_string(),
            Fundamentals::from_raw(Some(pe), Some(roe), None, None),
        );
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    /// A ticker that passes the default thresholds.
    pub fn with_candidate(self, ticker: &str) -> Self {
        self.with_bars(ticker, falling_bars(40, 200.0))
            .with_fundamentals(ticker, 20.0, 0.18)
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_history(&self, ticker: &str, _period: Period) -> Result<Vec<OhlcvBar>, GodlifeError> {
        self.requested.borrow_mut().push(ticker.to_string());
        if let Some(reason) = self.errors.get(ticker) {
            return Err(GodlifeError::Http {
                service: "mock".into(),
                reason: reason.clone(),
            });
        }
        Ok(self.bars.get(ticker).cloned().unwrap_or_default())
    }

    fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, GodlifeError> {
        self.fundamentals
            .get(ticker)
            .cloned()
            .ok_or_else(|| GodlifeError::NoData {
                ticker: ticker.to_string(),
            })
    }
}

pub struct FailingConstituents;

impl ConstituentPort for FailingConstituents {
    fn fetch_constituents(&self) -> Result<Vec<String>, GodlifeError> {
        Err(GodlifeError::Scrape {
            page: "wikipedia".into(),
            reason: "constituents table not found".into(),
        })
    }
}

pub struct FixedConstituents(pub Vec<&'static str>);

impl ConstituentPort for FixedConstituents {
    fn fetch_constituents(&self) -> Result<Vec<String>, GodlifeError> {
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

pub struct RecordingTransport {
    pub sent: RefCell<Vec<String>>,
    pub fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            sent: RefCell::new(vec![]),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: RefCell::new(vec![]),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }
}

impl NotifyPort for RecordingTransport {
    fn send(&self, _credentials: &Credentials, text: &str) -> Result<(), GodlifeError> {
        self.sent.borrow_mut().push(text.to_string());
        if self.fail {
            return Err(GodlifeError::Http {
                service: "telegram".into(),
                reason: "status 502".into(),
            });
        }
        Ok(())
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        bot_token: "123456:TEST".into(),
        chat_id: "4242".into(),
    }
}

/// Daily bars with closes from `closes`, starting 2024-01-01.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000_000,
        })
        .collect()
}

/// Steadily falling closes: RSI 0, close below the SMA.
pub fn falling_bars(count: usize, start: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| start - i as f64).collect();
    bars_from_closes(&closes)
}

/// Steadily rising closes: RSI 100, close above the SMA.
pub fn rising_bars(count: usize, start: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| start + i as f64).collect();
    bars_from_closes(&closes)
}

pub fn match_record(ticker: &str) -> MatchRecord {
    MatchRecord {
        ticker: ticker.to_string(),
        close: 187.65,
        sma: Some(190.12),
        rsi: 28.4,
        trailing_pe: 24.7,
        return_on_equity: 0.31,
    }
}

pub fn write_csv_bars(dir: &std::path::Path, ticker: &str, bars: &[OhlcvBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", ticker)), content).unwrap();
}

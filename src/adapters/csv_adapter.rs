//! CSV directory market-data adapter for offline runs.
//!
//! Layout:
//! - `<TICKER>.csv` with header `date,open,high,low,close,volume`
//! - optional `fundamentals.csv` with header
//!   `ticker,trailing_pe,return_on_equity,price_to_book,fifty_two_week_high`;
//!   empty cells are unavailable metrics.
//! - optional `constituents.csv` with a `symbol` column, used as the
//!   offline index constituent list.

use crate::domain::error::GodlifeError;
use crate::domain::fundamentals::Fundamentals;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::period::Period;
use crate::ports::constituent_port::ConstituentPort;
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const SERVICE: &str = "csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct FundamentalsRow {
    ticker: String,
    trailing_pe: Option<f64>,
    return_on_equity: Option<f64>,
    price_to_book: Option<f64>,
    fifty_two_week_high: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConstituentRow {
    symbol: String,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn parse_field<T: std::str::FromStr>(
        record: &csv::StringRecord,
        index: usize,
        name: &str,
    ) -> Result<T, GodlifeError>
    where
        T::Err: std::fmt::Display,
    {
        let raw = record
            .get(index)
            .ok_or_else(|| GodlifeError::payload(SERVICE, format!("missing {} column", name)))?;
        raw.trim()
            .parse()
            .map_err(|e| GodlifeError::payload(SERVICE, format!("invalid {} value '{}': {}", name, raw, e)))
    }
}

impl MarketDataPort for CsvAdapter {
    fn fetch_history(&self, ticker: &str, period: Period) -> Result<Vec<OhlcvBar>, GodlifeError> {
        let path = self.csv_path(ticker);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result
                .map_err(|e| GodlifeError::payload(SERVICE, format!("{}: {}", path.display(), e)))?;

            let date_str: String = Self::parse_field(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                GodlifeError::payload(SERVICE, format!("invalid date '{}': {}", date_str, e))
            })?;

            bars.push(OhlcvBar {
                date,
                open: Self::parse_field(&record, 1, "open")?,
                high: Self::parse_field(&record, 2, "high")?,
                low: Self::parse_field(&record, 3, "low")?,
                close: Self::parse_field(&record, 4, "close")?,
                volume: Self::parse_field(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        if let Some(start) = bars.last().and_then(|last| period.start_before(last.date)) {
            bars.retain(|b| b.date > start);
        }
        Ok(bars)
    }

    fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, GodlifeError> {
        let path = self.base_path.join("fundamentals.csv");
        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|e| GodlifeError::payload(SERVICE, format!("{}: {}", path.display(), e)))?;

        for row in rdr.deserialize::<FundamentalsRow>() {
            let row =
                row.map_err(|e| GodlifeError::payload(SERVICE, format!("{}: {}", path.display(), e)))?;
            if row.ticker.trim().eq_ignore_ascii_case(ticker) {
                return Ok(Fundamentals::from_raw(
                    row.trailing_pe,
                    row.return_on_equity,
                    row.price_to_book,
                    row.fifty_two_week_high,
                ));
            }
        }

        Err(GodlifeError::NoData {
            ticker: ticker.to_string(),
        })
    }
}

impl ConstituentPort for CsvAdapter {
    fn fetch_constituents(&self) -> Result<Vec<String>, GodlifeError> {
        let path = self.base_path.join("constituents.csv");
        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|e| GodlifeError::payload(SERVICE, format!("{}: {}", path.display(), e)))?;

        rdr.deserialize::<ConstituentRow>()
            .map(|row| {
                row.map(|r| r.symbol.trim().to_string()).map_err(|e| {
                    GodlifeError::payload(SERVICE, format!("{}: {}", path.display(), e))
                })
            })
            .collect()
    }
}

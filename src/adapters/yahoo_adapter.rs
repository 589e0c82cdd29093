//! Yahoo Finance market-data adapter.
//!
//! Bars come from the v8 chart endpoint. Fundamentals come from the v10
//! quoteSummary endpoint, which requires a session cookie and a crumb. The
//! crumb is fetched once per adapter and reused until Yahoo rejects it with a
//! 401, which triggers one refresh and retry. A failed crumb fetch is
//! remembered so later tickers fail fast instead of re-requesting it.

use crate::domain::error::GodlifeError;
use crate::domain::fundamentals::Fundamentals;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::period::Period;
use crate::ports::market_data_port::MarketDataPort;
use chrono::DateTime;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Mutex;
use tracing::{debug, warn};

const SERVICE: &str = "yahoo";
const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SUMMARY_BASE: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const SUMMARY_MODULES: &str = "summaryDetail,financialData,defaultKeyStatistics";

#[derive(Debug, Clone, PartialEq, Eq)]
enum CrumbState {
    Unknown,
    Ready(String),
    Unavailable(String),
}

pub struct YahooAdapter {
    client: Client,
    crumb: Mutex<CrumbState>,
}

impl YahooAdapter {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            crumb: Mutex::new(CrumbState::Unknown),
        }
    }

    fn crumb(&self) -> Result<String, GodlifeError> {
        let mut state = self
            .crumb
            .lock()
            .map_err(|_| GodlifeError::http(SERVICE, "crumb cache poisoned"))?;
        match &*state {
            CrumbState::Ready(crumb) => return Ok(crumb.clone()),
            CrumbState::Unavailable(reason) => {
                return Err(GodlifeError::http(
                    SERVICE,
                    format!("crumb unavailable for this run ({})", reason),
                ));
            }
            CrumbState::Unknown => {}
        }

        match self.fetch_crumb() {
            Ok(crumb) => {
                debug!("obtained yahoo crumb");
                *state = CrumbState::Ready(crumb.clone());
                Ok(crumb)
            }
            Err(e) => {
                warn!(error = %e, "yahoo crumb unavailable, fundamentals will use defaults");
                *state = CrumbState::Unavailable(e.to_string());
                Err(e)
            }
        }
    }

    /// Drop the cached crumb so the next call fetches a fresh one.
    fn invalidate_crumb(&self) {
        if let Ok(mut state) = self.crumb.lock() {
            *state = CrumbState::Unknown;
        }
    }

    fn fetch_crumb(&self) -> Result<String, GodlifeError> {
        // Only the Set-Cookie matters here; the status is usually 404.
        let _ = self.client.get(COOKIE_URL).send();

        let response = self
            .client
            .get(CRUMB_URL)
            .send()
            .map_err(|e| GodlifeError::http(SERVICE, e))?;
        if !response.status().is_success() {
            return Err(GodlifeError::http(
                SERVICE,
                format!("crumb request returned {}", response.status()),
            ));
        }
        let crumb = response
            .text()
            .map_err(|e| GodlifeError::http(SERVICE, e))?
            .trim()
            .to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(GodlifeError::payload(SERVICE, "crumb response was not a crumb"));
        }
        Ok(crumb)
    }

    fn request_summary(&self, ticker: &str) -> Result<Response, GodlifeError> {
        let crumb = self.crumb()?;
        let url = format!("{}/{}", SUMMARY_BASE, ticker);
        self.client
            .get(&url)
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())])
            .send()
            .map_err(|e| GodlifeError::http(SERVICE, e))
    }
}

/// Whether a quoteSummary status means the crumb has gone stale.
fn crumb_rejected(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED
}

impl MarketDataPort for YahooAdapter {
    fn fetch_history(&self, ticker: &str, period: Period) -> Result<Vec<OhlcvBar>, GodlifeError> {
        let url = format!("{}/{}", CHART_BASE, ticker);
        let response = self
            .client
            .get(&url)
            .query(&[("range", period.as_str()), ("interval", "1d")])
            .send()
            .map_err(|e| GodlifeError::http(SERVICE, e))?;

        let status = response.status();
        let body = response.text().map_err(|e| GodlifeError::http(SERVICE, e))?;
        if status == StatusCode::NOT_FOUND {
            debug!(ticker, "yahoo has no chart for ticker");
            return Ok(vec![]);
        }
        if !status.is_success() {
            return Err(GodlifeError::http(SERVICE, format!("chart returned {}", status)));
        }
        parse_chart(&body)
    }

    fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, GodlifeError> {
        let mut response = self.request_summary(ticker)?;
        if crumb_rejected(response.status()) {
            debug!(ticker, "quoteSummary rejected the crumb, refreshing once");
            self.invalidate_crumb();
            response = self.request_summary(ticker)?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(GodlifeError::http(
                SERVICE,
                format!("quoteSummary returned {}", status),
            ));
        }
        let body = response.text().map_err(|e| GodlifeError::http(SERVICE, e))?;
        parse_quote_summary(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<String>,
    description: Option<String>,
}

impl ApiError {
    fn describe(&self) -> String {
        format!(
            "{}: {}",
            self.code.as_deref().unwrap_or("error"),
            self.description.as_deref().unwrap_or("no description")
        )
    }
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Parse a v8 chart payload into ascending bars. Bars without a close are
/// dropped; missing open/high/low fall back to the close.
pub fn parse_chart(json: &str) -> Result<Vec<OhlcvBar>, GodlifeError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(json).map_err(|e| GodlifeError::payload(SERVICE, e))?;

    if let Some(error) = envelope.chart.error {
        return Err(GodlifeError::payload(SERVICE, error.describe()));
    }
    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(vec![]);
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();
    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(close) = at(&quote.close, i).filter(|c| c.is_finite()) else {
            continue;
        };
        let date = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| GodlifeError::payload(SERVICE, format!("bad timestamp {}", ts)))?
            .date_naive();
        bars.push(OhlcvBar {
            date,
            open: at(&quote.open, i).unwrap_or(close),
            high: at(&quote.high, i).unwrap_or(close),
            low: at(&quote.low, i).unwrap_or(close),
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryEnvelope {
    quote_summary: SummaryBody,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    result: Option<Vec<SummaryResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default)]
    summary_detail: SummaryDetail,
    #[serde(default)]
    financial_data: FinancialData,
    #[serde(default)]
    default_key_statistics: KeyStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(default, rename = "trailingPE")]
    trailing_pe: RawValue,
    #[serde(default)]
    fifty_two_week_high: RawValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    #[serde(default)]
    return_on_equity: RawValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    #[serde(default)]
    price_to_book: RawValue,
}

/// `{"raw": 31.2, "fmt": "31.20"}`, or `{}` when Yahoo has no value.
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

pub fn parse_quote_summary(json: &str) -> Result<Fundamentals, GodlifeError> {
    let envelope: SummaryEnvelope =
        serde_json::from_str(json).map_err(|e| GodlifeError::payload(SERVICE, e))?;

    if let Some(error) = envelope.quote_summary.error {
        return Err(GodlifeError::payload(SERVICE, error.describe()));
    }
    let result = envelope
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| GodlifeError::payload(SERVICE, "quoteSummary has no result"))?;

    Ok(Fundamentals::from_raw(
        result.summary_detail.trailing_pe.raw,
        result.financial_data.return_on_equity.raw,
        result.default_key_statistics.price_to_book.raw,
        result.summary_detail.fifty_two_week_high.raw,
    ))
}

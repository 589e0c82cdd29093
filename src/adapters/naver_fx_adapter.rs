//! USD/KRW and THB/KRW quotes scraped from Naver Finance.

use crate::domain::error::GodlifeError;
use crate::domain::exchange_rate::{ExchangeRates, parse_quote};
use crate::ports::exchange_rate_port::ExchangeRatePort;
use reqwest::blocking::Client;
use scraper::{Html, Selector};

pub const MARKET_INDEX_URL: &str = "https://finance.naver.com/marketindex/";
pub const THB_DETAIL_URL: &str =
    "https://finance.naver.com/marketindex/exchangeDetail.naver?marketindexCd=FX_THBKRW";

const USD_PAGE: &str = "naver marketindex";
const THB_PAGE: &str = "naver FX_THBKRW";

pub struct NaverFxAdapter {
    client: Client,
}

impl NaverFxAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn fetch_page(&self, url: &str, page: &str) -> Result<String, GodlifeError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| GodlifeError::http(page, e))?;
        if !response.status().is_success() {
            return Err(GodlifeError::http(page, format!("status {}", response.status())));
        }
        response.text().map_err(|e| GodlifeError::http(page, e))
    }
}

impl ExchangeRatePort for NaverFxAdapter {
    fn fetch_rates(&self) -> Result<ExchangeRates, GodlifeError> {
        let usd_html = self.fetch_page(MARKET_INDEX_URL, USD_PAGE)?;
        let thb_html = self.fetch_page(THB_DETAIL_URL, THB_PAGE)?;
        Ok(ExchangeRates {
            usd_krw: parse_usd_krw(&usd_html)?,
            thb_krw: parse_thb_krw(&thb_html)?,
        })
    }
}

/// The market index page lists USD first, so the first `head_info` block is
/// the dollar quote.
pub fn parse_usd_krw(html: &str) -> Result<f64, GodlifeError> {
    extract_quote(html, "div.head_info span.value", USD_PAGE)
}

pub fn parse_thb_krw(html: &str) -> Result<f64, GodlifeError> {
    extract_quote(html, "div.head_info > span.value", THB_PAGE)
}

fn extract_quote(html: &str, css: &str, page: &str) -> Result<f64, GodlifeError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(css)
        .map_err(|e| GodlifeError::scrape(page, format!("selector {}: {:?}", css, e)))?;
    let text: String = document
        .select(&selector)
        .next()
        .ok_or_else(|| GodlifeError::scrape(page, format!("{} not found", css)))?
        .text()
        .collect();
    parse_quote(&text)
        .ok_or_else(|| GodlifeError::scrape(page, format!("unreadable quote '{}'", text.trim())))
}

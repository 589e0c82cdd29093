//! S&P 500 constituents scraped from Wikipedia.

use crate::domain::error::GodlifeError;
use crate::ports::constituent_port::ConstituentPort;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use tracing::debug;

const PAGE: &str = "wikipedia";
pub const CONSTITUENTS_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

pub struct WikipediaAdapter {
    client: Client,
    url: String,
}

impl WikipediaAdapter {
    pub fn new(client: Client) -> Self {
        Self::with_url(client, CONSTITUENTS_URL)
    }

    pub fn with_url(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl ConstituentPort for WikipediaAdapter {
    fn fetch_constituents(&self) -> Result<Vec<String>, GodlifeError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| GodlifeError::http(PAGE, e))?;
        if !response.status().is_success() {
            return Err(GodlifeError::http(PAGE, format!("status {}", response.status())));
        }
        let html = response.text().map_err(|e| GodlifeError::http(PAGE, e))?;
        let symbols = parse_constituents(&html)?;
        debug!(count = symbols.len(), "parsed constituents table");
        Ok(symbols)
    }
}

fn selector(css: &str) -> Result<Selector, GodlifeError> {
    Selector::parse(css).map_err(|e| GodlifeError::scrape(PAGE, format!("selector {}: {:?}", css, e)))
}

/// First-column symbols of the constituents table, in page order.
///
/// Uses `table#constituents`, or the first `table.wikitable` when the page
/// has no table with that id. Symbols are returned as written on the page.
pub fn parse_constituents(html: &str) -> Result<Vec<String>, GodlifeError> {
    let document = Html::parse_document(html);
    let by_id = selector("table#constituents")?;
    let by_class = selector("table.wikitable")?;
    let rows = selector("tr")?;
    let first_cell = selector("td")?;

    let table = document
        .select(&by_id)
        .next()
        .or_else(|| document.select(&by_class).next())
        .ok_or_else(|| GodlifeError::scrape(PAGE, "constituents table not found"))?;

    let symbols = table
        .select(&rows)
        .filter_map(|row| row.select(&first_cell).next())
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .filter(|symbol| !symbol.is_empty())
        .collect();
    Ok(symbols)
}

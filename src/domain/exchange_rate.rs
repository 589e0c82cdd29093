//! KRW exchange rates for the dashboard's currency lookup.

pub const DEFAULT_BUDGET_KRW: f64 = 1_000_000.0;

/// Won per one unit of each foreign currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRates {
    pub usd_krw: f64,
    pub thb_krw: f64,
}

impl ExchangeRates {
    /// Whole baht a KRW budget buys, rounded to nearest.
    pub fn baht_for_won(&self, won: f64) -> f64 {
        (won / self.thb_krw).round()
    }
}

/// Parse a scraped quote such as `"1,387.50"`.
pub fn parse_quote(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

pub fn render_rates(rates: &ExchangeRates, budget_krw: f64) -> String {
    format!(
        "USD/KRW: {:.2} won\nTHB/KRW: {:.2} won\nBudget {:.0} won -> about {:.0} baht",
        rates.usd_krw,
        rates.thb_krw,
        budget_krw,
        rates.baht_for_won(budget_krw)
    )
}

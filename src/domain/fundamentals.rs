//! Fundamentals snapshot for one ticker.
//!
//! Every metric is optional. Consumers that gate on a metric use the
//! `*_or_default` accessors, whose defaults make threshold predicates fail
//! closed: a missing P/E reads as [`DEFAULT_TRAILING_PE`] and a missing ROE as
//! [`DEFAULT_RETURN_ON_EQUITY`].

pub const DEFAULT_TRAILING_PE: f64 = 999.0;
pub const DEFAULT_RETURN_ON_EQUITY: f64 = 0.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fundamentals {
    pub trailing_pe: Option<f64>,
    /// Return on equity as a fraction (0.18 == 18%).
    pub return_on_equity: Option<f64>,
    pub price_to_book: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
}

impl Fundamentals {
    /// Snapshot with every metric unavailable.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Build from raw collaborator values, discarding NaN and infinities.
    pub fn from_raw(
        trailing_pe: Option<f64>,
        return_on_equity: Option<f64>,
        price_to_book: Option<f64>,
        fifty_two_week_high: Option<f64>,
    ) -> Self {
        Self {
            trailing_pe: finite(trailing_pe),
            return_on_equity: finite(return_on_equity),
            price_to_book: finite(price_to_book),
            fifty_two_week_high: finite(fifty_two_week_high),
        }
    }

    pub fn pe_or_default(&self) -> f64 {
        self.trailing_pe.unwrap_or(DEFAULT_TRAILING_PE)
    }

    pub fn roe_or_default(&self) -> f64 {
        self.return_on_equity.unwrap_or(DEFAULT_RETURN_ON_EQUITY)
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

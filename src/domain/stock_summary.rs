//! Single-ticker summary for the stock viewer.

use crate::domain::fundamentals::Fundamentals;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceChange {
    pub absolute: f64,
    pub percent: f64,
}

#[derive(Debug, Clone)]
pub struct StockSummary {
    pub ticker: String,
    pub current_price: f64,
    /// `None` for a single-bar history.
    pub change: Option<PriceChange>,
    pub trailing_pe: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    /// `None` while the series is shorter than the window.
    pub sma: Option<f64>,
    pub rsi: Option<f64>,
}

impl StockSummary {
    pub fn build(
        series: &PriceSeries,
        fundamentals: &Fundamentals,
        ma_window: usize,
        rsi_window: usize,
    ) -> Self {
        let last = series.last();
        let change = series.previous().and_then(|prev| {
            (prev.close != 0.0).then(|| {
                let absolute = last.close - prev.close;
                PriceChange {
                    absolute,
                    percent: absolute / prev.close * 100.0,
                }
            })
        });

        Self {
            ticker: series.ticker().to_string(),
            current_price: last.close,
            change,
            trailing_pe: fundamentals.trailing_pe,
            fifty_two_week_high: fundamentals.fifty_two_week_high,
            sma: calculate_sma(series.bars(), ma_window).latest(),
            rsi: calculate_rsi(series.bars(), rsi_window).latest(),
        }
    }
}

fn or_na(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    value.map(render).unwrap_or_else(|| "N/A".to_string())
}

/// Human-readable summary block.
pub fn render_summary(summary: &StockSummary, ma_window: usize, rsi_window: usize) -> String {
    let change = match &summary.change {
        Some(c) => format!("{:+.2} ({:+.2}%)", c.absolute, c.percent),
        None => "N/A".to_string(),
    };
    let lines = [
        format!("{} stock summary", summary.ticker),
        format!("Current price:  ${:.2}", summary.current_price),
        format!("Change:         {}", change),
        format!("PER:            {}", or_na(summary.trailing_pe, |v| format!("{:.2}", v))),
        format!(
            "52-week high:   {}",
            or_na(summary.fifty_two_week_high, |v| format!("${:.2}", v))
        ),
        format!(
            "SMA({}):        {}",
            ma_window,
            or_na(summary.sma, |v| format!("${:.2}", v))
        ),
        format!(
            "RSI({}):        {}",
            rsi_window,
            or_na(summary.rsi, |v| format!("{:.2}", v))
        ),
    ];
    lines.join("\n")
}

/// Most-recent-first table of up to `rows` bars.
pub fn render_bar_table(bars: &[OhlcvBar], rows: usize) -> String {
    let mut out = format!(
        "{:<10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>12}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    for bar in bars.iter().rev().take(rows) {
        out.push('\n');
        out.push_str(&format!(
            "{:<10}  {:>10.2}  {:>10.2}  {:>10.2}  {:>10.2}  {:>12}",
            bar.date.to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    out
}

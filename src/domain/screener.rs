//! Screening pipeline: drive the evaluator over a universe, in order.

use crate::domain::evaluator::{evaluate_ticker, EvaluationConfig, MatchRecord, TickerOutcome};
use crate::domain::notification::NotifyPolicy;
use crate::domain::universe::{Universe, UniverseSource};
use crate::ports::market_data_port::MarketDataPort;
use tracing::info;

pub const DEFAULT_PROGRESS_EVERY: usize = 50;

/// Everything one screening run needs, built once at start-up.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    pub universe: UniverseSource,
    pub evaluation: EvaluationConfig,
    /// Log progress every N tickers; 0 disables.
    pub progress_every: usize,
    pub notify: NotifyPolicy,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenReport {
    /// Matches in universe order.
    pub matches: Vec<MatchRecord>,
    pub evaluated: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ScreenReport {
    fn record(&mut self, outcome: TickerOutcome) {
        self.evaluated += 1;
        match outcome {
            TickerOutcome::Matched(record) => self.matches.push(record),
            TickerOutcome::Rejected { .. } => self.rejected += 1,
            TickerOutcome::Skipped(_) => self.skipped += 1,
            TickerOutcome::Failed(_) => self.failed += 1,
        }
    }
}

pub fn run_screen(
    universe: &Universe,
    port: &dyn MarketDataPort,
    config: &EvaluationConfig,
    progress_every: usize,
) -> ScreenReport {
    let total = universe.count();
    info!(
        tickers = total,
        period = %config.period,
        "screening started"
    );

    let mut report = ScreenReport::default();
    for (i, ticker) in universe.tickers.iter().enumerate() {
        if progress_every > 0 && i > 0 && i % progress_every == 0 {
            info!(done = i, total, matches = report.matches.len(), "progress");
        }
        report.record(evaluate_ticker(port, ticker, config));
    }

    info!(
        evaluated = report.evaluated,
        matched = report.matches.len(),
        rejected = report.rejected,
        skipped = report.skipped,
        failed = report.failed,
        "screening finished"
    );
    report
}

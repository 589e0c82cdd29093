//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::http::HttpSettings;
use crate::adapters::naver_fx_adapter::NaverFxAdapter;
use crate::adapters::telegram_adapter::TelegramAdapter;
use crate::adapters::wikipedia_adapter::WikipediaAdapter;
use crate::adapters::yahoo_adapter::YahooAdapter;
use crate::domain::config_validation::validate_screen_config;
use crate::domain::error::GodlifeError;
use crate::domain::evaluator::{EvaluationConfig, Thresholds};
use crate::domain::exchange_rate::{DEFAULT_BUDGET_KRW, render_rates};
use crate::domain::fundamentals::Fundamentals;
use crate::domain::notification::{
    compose_messages, Credentials, DispatchReport, Dispatcher, NotifyPolicy,
};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::period::Period;
use crate::domain::screener::{run_screen, ScreenConfig, ScreenReport, DEFAULT_PROGRESS_EVERY};
use crate::domain::stock_summary::{render_bar_table, render_summary, StockSummary};
use crate::domain::universe::{
    parse_tickers, resolve_universe, Universe, UniverseMode, UniverseSource, DEFAULT_WATCHLIST,
};
use crate::logging::{init_logging, LogFormat};
use crate::ports::config_port::ConfigPort;
use crate::ports::constituent_port::ConstituentPort;
use crate::ports::exchange_rate_port::ExchangeRatePort;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::notify_port::NotifyPort;

#[derive(Parser, Debug)]
#[command(name = "godlife", about = "US stock screener, quote viewer and KRW exchange rates")]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen a ticker universe and send the matches
    Screen {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Read bars and fundamentals from CSV files instead of Yahoo
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Show price, valuation and indicators for one ticker
    Quote {
        ticker: String,
        #[arg(short, long, default_value = "6mo")]
        period: Period,
        /// Bars to list, most recent first
        #[arg(long, default_value_t = 10)]
        rows: usize,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Show USD/KRW and THB/KRW rates
    Fx {
        /// KRW amount to convert to baht
        #[arg(long, default_value_t = DEFAULT_BUDGET_KRW)]
        budget: f64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging(format, cli.verbose);

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!(error = %e, "failed to load .env");
        }
    }

    match cli.command {
        Command::Screen {
            config,
            data_dir,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(config.as_ref())
            } else {
                run_screen_command(config.as_ref(), data_dir.as_ref())
            }
        }
        Command::Quote {
            ticker,
            period,
            rows,
            config,
            data_dir,
        } => run_quote(&ticker, period, rows, config.as_ref(), data_dir.as_ref()),
        Command::Fx { budget, config } => run_fx(budget, config.as_ref()),
    }
}

fn fail(err: GodlifeError) -> ExitCode {
    let code = ExitCode::from(&err);
    error!(error = %err, "command failed");
    eprintln!("error: {err}");
    code
}

/// Load the INI file if one was given; no file means every key defaults.
pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, GodlifeError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

fn load_validated(path: Option<&PathBuf>) -> Result<FileConfigAdapter, GodlifeError> {
    let adapter = load_config(path)?;
    validate_screen_config(&adapter)?;
    Ok(adapter)
}

pub fn resolve_universe_source(config: &dyn ConfigPort) -> Result<UniverseSource, GodlifeError> {
    let mode = match config.get_trimmed("screener", "universe") {
        Some(raw) => raw.parse::<UniverseMode>()?,
        None => UniverseMode::Watchlist,
    };

    match mode {
        UniverseMode::Sp500 => Ok(UniverseSource::Sp500),
        UniverseMode::Watchlist => {
            let tickers = match config.get_string("screener", "tickers") {
                Some(list) => parse_tickers(&list)?,
                None => DEFAULT_WATCHLIST.iter().map(|t| t.to_string()).collect(),
            };
            Ok(UniverseSource::Watchlist(tickers))
        }
    }
}

pub fn build_evaluation_config(config: &dyn ConfigPort) -> Result<EvaluationConfig, GodlifeError> {
    let defaults = EvaluationConfig::default();
    let period = match config.get_trimmed("screener", "period") {
        Some(raw) => raw.parse::<Period>().map_err(|reason| GodlifeError::ConfigInvalid {
            section: "screener".into(),
            key: "period".into(),
            reason,
        })?,
        None => defaults.period,
    };

    Ok(EvaluationConfig {
        period,
        ma_window: config.get_int("screener", "ma_window", defaults.ma_window as i64).max(1) as usize,
        rsi_window: config
            .get_int("screener", "rsi_window", defaults.rsi_window as i64)
            .max(1) as usize,
        thresholds: Thresholds {
            per_max: config.get_double("thresholds", "per_max", defaults.thresholds.per_max),
            roe_min: config.get_double("thresholds", "roe_min", defaults.thresholds.roe_min),
            rsi_max: config.get_double("thresholds", "rsi_max", defaults.thresholds.rsi_max),
            require_above_ma: config.get_bool(
                "thresholds",
                "require_above_ma",
                defaults.thresholds.require_above_ma,
            ),
        },
    })
}

pub fn build_notify_policy(config: &dyn ConfigPort) -> NotifyPolicy {
    let defaults = NotifyPolicy::default();
    NotifyPolicy {
        max_message_len: config
            .get_int("notify", "max_message_len", defaults.max_message_len as i64)
            .max(1) as usize,
        overflow_limit: config
            .get_int("notify", "overflow_limit", defaults.overflow_limit as i64)
            .max(1) as usize,
        notify_on_empty: config.get_bool("notify", "notify_on_empty", defaults.notify_on_empty),
    }
}

pub fn build_screen_config(config: &dyn ConfigPort) -> Result<ScreenConfig, GodlifeError> {
    Ok(ScreenConfig {
        universe: resolve_universe_source(config)?,
        evaluation: build_evaluation_config(config)?,
        progress_every: config
            .get_int("screener", "progress_every", DEFAULT_PROGRESS_EVERY as i64)
            .max(0) as usize,
        notify: build_notify_policy(config),
    })
}

/// Everything one screening run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub universe: Universe,
    pub report: ScreenReport,
    pub messages: Vec<String>,
    pub dispatch: DispatchReport,
}

/// Universe, screen, compose, deliver. Only a universe that cannot be
/// resolved at all is an error; per-ticker and delivery failures are counted.
pub fn run_screen_pipeline(
    config: &ScreenConfig,
    market: &dyn MarketDataPort,
    constituents: &dyn ConstituentPort,
    transport: &dyn NotifyPort,
    credentials: Option<&Credentials>,
) -> Result<PipelineOutcome, GodlifeError> {
    let universe = resolve_universe(&config.universe, constituents)?;
    info!(
        source = config.universe.label(),
        origin = ?universe.origin,
        tickers = universe.count(),
        "universe resolved"
    );

    let report = run_screen(&universe, market, &config.evaluation, config.progress_every);
    let messages = compose_messages(&report.matches, &config.notify);
    let dispatch = Dispatcher::new(transport, credentials).dispatch(&messages);

    Ok(PipelineOutcome {
        universe,
        report,
        messages,
        dispatch,
    })
}

fn run_screen_command(config_path: Option<&PathBuf>, data_dir: Option<&PathBuf>) -> ExitCode {
    let adapter = match load_validated(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    let screen_config = match build_screen_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let client = match HttpSettings::from_config(&adapter).build_client() {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let credentials = Credentials::from_env();
    if credentials.is_none() {
        info!("notification credentials not set, messages will be echoed locally");
    }
    let transport = TelegramAdapter::new(client.clone());

    let result = match data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "using offline CSV data");
            let csv = CsvAdapter::new(dir.clone());
            run_screen_pipeline(&screen_config, &csv, &csv, &transport, credentials.as_ref())
        }
        None => run_screen_pipeline(
            &screen_config,
            &YahooAdapter::new(client.clone()),
            &WikipediaAdapter::new(client),
            &transport,
            credentials.as_ref(),
        ),
    };

    let outcome = match result {
        Ok(o) => o,
        Err(e) => return fail(e),
    };

    for message in &outcome.messages {
        println!("{}\n", message);
    }
    info!(
        evaluated = outcome.report.evaluated,
        matched = outcome.report.matches.len(),
        skipped = outcome.report.skipped,
        failed = outcome.report.failed,
        delivered = outcome.dispatch.delivered,
        delivery_failures = outcome.dispatch.failed,
        "run complete"
    );
    ExitCode::SUCCESS
}

/// Human-readable description of what a screen would do.
pub fn render_dry_run(config: &ScreenConfig) -> String {
    let eval = &config.evaluation;
    let t = &eval.thresholds;
    let mut out = String::new();
    out.push_str(&format!("Universe:   {}\n", config.universe));
    out.push_str(&format!("Period:     {}\n", eval.period));
    out.push_str(&format!(
        "Indicators: SMA({}), RSI({})\n",
        eval.ma_window, eval.rsi_window
    ));
    out.push_str("Thresholds:\n");
    out.push_str(&format!("  0 < PER < {}\n", t.per_max));
    out.push_str(&format!("  ROE > {}\n", t.roe_min));
    out.push_str(&format!("  RSI < {}\n", t.rsi_max));
    if t.require_above_ma {
        out.push_str(&format!("  close > SMA({})\n", eval.ma_window));
    }
    out.push_str(&format!(
        "Notify:     max {} chars, overflow shows first {}, empty run {}\n",
        config.notify.max_message_len,
        config.notify.overflow_limit,
        if config.notify.notify_on_empty {
            "notifies"
        } else {
            "is silent"
        }
    ));
    out
}

pub fn run_dry_run(config_path: Option<&PathBuf>) -> ExitCode {
    let adapter = match load_validated(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    let screen_config = match build_screen_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    print!("{}", render_dry_run(&screen_config));
    eprintln!("Dry run complete: configuration is valid");
    ExitCode::SUCCESS
}

/// Fetch one ticker and render its summary plus the recent bar table.
pub fn run_quote_lookup(
    market: &dyn MarketDataPort,
    ticker: &str,
    period: Period,
    evaluation: &EvaluationConfig,
    rows: usize,
) -> Result<String, GodlifeError> {
    let ticker = ticker.trim().to_uppercase();
    let bars = market.fetch_history(&ticker, period)?;
    let series = PriceSeries::new(&ticker, bars)?;

    let fundamentals = match market.fetch_fundamentals(&ticker) {
        Ok(f) => f,
        Err(e) => {
            warn!(ticker = %ticker, error = %e, "fundamentals unavailable");
            Fundamentals::unavailable()
        }
    };

    let summary = StockSummary::build(
        &series,
        &fundamentals,
        evaluation.ma_window,
        evaluation.rsi_window,
    );
    Ok(format!(
        "{}\n\n{}",
        render_summary(&summary, evaluation.ma_window, evaluation.rsi_window),
        render_bar_table(series.bars(), rows)
    ))
}

fn run_quote(
    ticker: &str,
    period: Period,
    rows: usize,
    config_path: Option<&PathBuf>,
    data_dir: Option<&PathBuf>,
) -> ExitCode {
    let adapter = match load_validated(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    let evaluation = match build_evaluation_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let result = match data_dir {
        Some(dir) => run_quote_lookup(&CsvAdapter::new(dir.clone()), ticker, period, &evaluation, rows),
        None => match HttpSettings::from_config(&adapter).build_client() {
            Ok(client) => run_quote_lookup(&YahooAdapter::new(client), ticker, period, &evaluation, rows),
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

pub fn run_fx_lookup(port: &dyn ExchangeRatePort, budget_krw: f64) -> Result<String, GodlifeError> {
    if !budget_krw.is_finite() || budget_krw <= 0.0 {
        return Err(GodlifeError::ConfigInvalid {
            section: "fx".into(),
            key: "budget".into(),
            reason: "budget must be a positive amount of won".into(),
        });
    }
    let rates = port.fetch_rates()?;
    Ok(render_rates(&rates, budget_krw))
}

fn run_fx(budget: f64, config_path: Option<&PathBuf>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    let client = match HttpSettings::from_config(&adapter).build_client() {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    match run_fx_lookup(&NaverFxAdapter::new(client), budget) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

//! CLI integration tests for the command orchestration.
//!
//! Tests cover:
//! - Config parsing (build_screen_config, resolve_universe_source)
//! - Dry-run mode with real INI files on disk
//! - Offline screens and quotes over a CSV data directory
//! - FX lookup over a stub rate source

mod common;

use common::*;
use godlife::adapters::csv_adapter::CsvAdapter;
use godlife::adapters::file_config_adapter::FileConfigAdapter;
use godlife::cli;
use godlife::domain::error::GodlifeError;
use godlife::domain::evaluator::EvaluationConfig;
use godlife::domain::exchange_rate::ExchangeRates;
use godlife::domain::period::Period;
use godlife::domain::universe::{UniverseSource, DEFAULT_WATCHLIST};
use godlife::ports::exchange_rate_port::ExchangeRatePort;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const WATCHLIST_INI: &str = r#"
[screener]
universe = watchlist
tickers = aapl, MSFT, KO, aapl
period = 1y
ma_window = 50
rsi_window = 10
progress_every = 25

[thresholds]
per_max = 40
roe_min = 0.1
rsi_max = 70
require_above_ma = yes

[notify]
max_message_len = 3500
overflow_limit = 5
notify_on_empty = false
"#;

mod config_loading {
    use super::*;

    #[test]
    fn build_screen_config_full() {
        let adapter = FileConfigAdapter::from_string(WATCHLIST_INI).unwrap();
        let config = cli::build_screen_config(&adapter).unwrap();

        assert_eq!(
            config.universe,
            UniverseSource::Watchlist(vec!["AAPL".into(), "MSFT".into(), "KO".into()])
        );
        assert_eq!(config.evaluation.period, Period::OneYear);
        assert_eq!(config.evaluation.ma_window, 50);
        assert_eq!(config.evaluation.rsi_window, 10);
        assert!((config.evaluation.thresholds.per_max - 40.0).abs() < f64::EPSILON);
        assert!((config.evaluation.thresholds.roe_min - 0.1).abs() < f64::EPSILON);
        assert!((config.evaluation.thresholds.rsi_max - 70.0).abs() < f64::EPSILON);
        assert!(config.evaluation.thresholds.require_above_ma);
        assert_eq!(config.progress_every, 25);
        assert_eq!(config.notify.max_message_len, 3500);
        assert_eq!(config.notify.overflow_limit, 5);
        assert!(!config.notify.notify_on_empty);
    }

    #[test]
    fn build_screen_config_defaults() {
        let config = cli::build_screen_config(&FileConfigAdapter::empty()).unwrap();

        let expected: Vec<String> = DEFAULT_WATCHLIST.iter().map(|t| t.to_string()).collect();
        assert_eq!(config.universe, UniverseSource::Watchlist(expected));
        assert_eq!(config.evaluation.period, Period::SixMonths);
        assert_eq!(config.evaluation.ma_window, 20);
        assert_eq!(config.evaluation.rsi_window, 14);
        assert!((config.evaluation.thresholds.per_max - 30.0).abs() < f64::EPSILON);
        assert!((config.evaluation.thresholds.roe_min - 0.15).abs() < f64::EPSILON);
        assert!((config.evaluation.thresholds.rsi_max - 35.0).abs() < f64::EPSILON);
        assert!(!config.evaluation.thresholds.require_above_ma);
        assert_eq!(config.progress_every, 50);
        assert_eq!(config.notify.max_message_len, 4000);
        assert_eq!(config.notify.overflow_limit, 10);
        assert!(config.notify.notify_on_empty);
    }

    #[test]
    fn sp500_mode_ignores_tickers() {
        let adapter =
            FileConfigAdapter::from_string("[screener]\nuniverse = sp500\ntickers = AAPL\n").unwrap();
        assert_eq!(
            cli::resolve_universe_source(&adapter).unwrap(),
            UniverseSource::Sp500
        );
    }

    #[test]
    fn unknown_universe_mode_is_error() {
        let adapter = FileConfigAdapter::from_string("[screener]\nuniverse = nasdaq\n").unwrap();
        assert!(matches!(
            cli::resolve_universe_source(&adapter),
            Err(GodlifeError::Universe(_))
        ));
    }

    #[test]
    fn bad_period_is_config_invalid() {
        let adapter = FileConfigAdapter::from_string("[screener]\nperiod = 2w\n").unwrap();
        assert!(matches!(
            cli::build_evaluation_config(&adapter),
            Err(GodlifeError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn load_config_without_path_is_empty() {
        let adapter = cli::load_config(None).unwrap();
        assert_eq!(
            cli::build_screen_config(&adapter).unwrap().evaluation,
            EvaluationConfig::default()
        );
    }

    #[test]
    fn load_config_missing_file_is_parse_error() {
        let path = PathBuf::from("/nonexistent/path/godlife.ini");
        assert!(matches!(
            cli::load_config(Some(&path)),
            Err(GodlifeError::ConfigParse { .. })
        ));
    }
}

mod dry_run {
    use super::*;

    #[test]
    fn dry_run_valid_config_succeeds() {
        let file = write_temp_ini(WATCHLIST_INI);
        let path = PathBuf::from(file.path());
        assert_eq!(cli::run_dry_run(Some(&path)), ExitCode::SUCCESS);
    }

    #[test]
    fn dry_run_without_config_succeeds() {
        assert_eq!(cli::run_dry_run(None), ExitCode::SUCCESS);
    }

    #[test]
    fn dry_run_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/path/godlife.ini");
        assert_eq!(cli::run_dry_run(Some(&path)), ExitCode::from(2));
    }

    #[test]
    fn dry_run_invalid_threshold_fails() {
        let file = write_temp_ini("[thresholds]\nrsi_max = 150\n");
        let path = PathBuf::from(file.path());
        assert_eq!(cli::run_dry_run(Some(&path)), ExitCode::from(2));
    }

    #[test]
    fn render_dry_run_lists_thresholds() {
        let adapter = FileConfigAdapter::from_string(WATCHLIST_INI).unwrap();
        let config = cli::build_screen_config(&adapter).unwrap();
        let text = cli::render_dry_run(&config);

        assert!(text.contains("watchlist (AAPL, MSFT, KO)"));
        assert!(text.contains("Period:     1y"));
        assert!(text.contains("SMA(50), RSI(10)"));
        assert!(text.contains("0 < PER < 40"));
        assert!(text.contains("ROE > 0.1"));
        assert!(text.contains("RSI < 70"));
        assert!(text.contains("close > SMA(50)"));
        assert!(text.contains("empty run is silent"));
    }
}

mod offline_csv {
    use super::*;
    use godlife::cli::run_screen_pipeline;

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::TempDir::new().unwrap();
        write_csv_bars(dir.path(), "DIP", &falling_bars(40, 150.0));
        write_csv_bars(dir.path(), "RIP", &rising_bars(40, 150.0));
        std::fs::write(
            dir.path().join("fundamentals.csv"),
            "ticker,trailing_pe,return_on_equity,price_to_book,fifty_two_week_high\n\
             DIP,18.5,0.22,3.1,175.0\n\
             RIP,18.5,0.22,3.1,190.0\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn screen_over_csv_directory() {
        let dir = data_dir();
        let csv = CsvAdapter::new(dir.path().to_path_buf());
        let adapter =
            FileConfigAdapter::from_string("[screener]\ntickers = DIP, RIP, NONE\n").unwrap();
        let config = cli::build_screen_config(&adapter).unwrap();
        let transport = RecordingTransport::new();

        let outcome = run_screen_pipeline(&config, &csv, &csv, &transport, None).unwrap();

        assert_eq!(outcome.report.evaluated, 3);
        assert_eq!(outcome.report.matches.len(), 1);
        assert_eq!(outcome.report.matches[0].ticker, "DIP");
        assert_eq!(outcome.report.rejected, 1);
        assert_eq!(outcome.report.skipped, 1);
        assert!(outcome.messages[0].contains("DIP spotted!"));
        assert!(outcome.messages[0].contains("- PER: 18.50"));
        assert!(outcome.messages[0].contains("- ROE: 22.00%"));
    }

    #[test]
    fn sp500_over_csv_uses_constituents_file() {
        let dir = data_dir();
        std::fs::write(dir.path().join("constituents.csv"), "symbol\nRIP\nDIP\n").unwrap();
        let csv = CsvAdapter::new(dir.path().to_path_buf());
        let adapter = FileConfigAdapter::from_string("[screener]\nuniverse = sp500\n").unwrap();
        let config = cli::build_screen_config(&adapter).unwrap();
        let transport = RecordingTransport::new();

        let outcome = run_screen_pipeline(&config, &csv, &csv, &transport, None).unwrap();

        assert_eq!(outcome.universe.tickers, vec!["RIP", "DIP"]);
        assert_eq!(outcome.report.matches.len(), 1);
    }

    #[test]
    fn quote_over_csv_directory() {
        let dir = data_dir();
        let csv = CsvAdapter::new(dir.path().to_path_buf());

        let text =
            cli::run_quote_lookup(&csv, " dip ", Period::SixMonths, &EvaluationConfig::default(), 3)
                .unwrap();

        assert!(text.starts_with("DIP stock summary"));
        assert!(text.contains("Current price:  $111.00"));
        assert!(text.contains("Change:         -1.00 (-0.89%)"));
        assert!(text.contains("PER:            18.50"));
        assert!(text.contains("52-week high:   $175.00"));
        assert!(text.contains("RSI(14):        0.00"));
        // header plus three bars, newest first
        let table: Vec<&str> = text.lines().skip_while(|l| !l.starts_with("Date")).collect();
        assert_eq!(table.len(), 4);
        assert!(table[1].starts_with("2024-02-09"));
    }

    #[test]
    fn quote_unknown_ticker_is_no_data() {
        let dir = data_dir();
        let csv = CsvAdapter::new(dir.path().to_path_buf());
        let result =
            cli::run_quote_lookup(&csv, "NONE", Period::Max, &EvaluationConfig::default(), 10);
        assert!(matches!(result, Err(GodlifeError::NoData { .. })));
    }

    #[test]
    fn quote_without_fundamentals_shows_na() {
        let dir = data_dir();
        write_csv_bars(dir.path(), "SOLO", &bars_from_closes(&[42.0]));
        let csv = CsvAdapter::new(dir.path().to_path_buf());

        let text =
            cli::run_quote_lookup(&csv, "SOLO", Period::Max, &EvaluationConfig::default(), 10)
                .unwrap();

        assert!(text.contains("Change:         N/A"));
        assert!(text.contains("PER:            N/A"));
        assert!(text.contains("SMA(20):        N/A"));
    }
}

mod fx {
    use super::*;

    struct FixedRates(Option<ExchangeRates>);

    impl ExchangeRatePort for FixedRates {
        fn fetch_rates(&self) -> Result<ExchangeRates, GodlifeError> {
            self.0.ok_or_else(|| GodlifeError::Scrape {
                page: "naver".into(),
                reason: "div.head_info > span.value not found".into(),
            })
        }
    }

    #[test]
    fn renders_rates_and_budget() {
        let port = FixedRates(Some(ExchangeRates {
            usd_krw: 1385.5,
            thb_krw: 37.91,
        }));
        let text = cli::run_fx_lookup(&port, 1_000_000.0).unwrap();
        assert!(text.contains("USD/KRW: 1385.50 won"));
        assert!(text.contains("THB/KRW: 37.91 won"));
        assert!(text.contains("about 26378 baht"));
    }

    #[test]
    fn scrape_failure_is_visible() {
        let result = cli::run_fx_lookup(&FixedRates(None), 1_000_000.0);
        assert!(matches!(result, Err(GodlifeError::Scrape { .. })));
    }

    #[test]
    fn non_positive_budget_is_rejected() {
        let port = FixedRates(Some(ExchangeRates {
            usd_krw: 1385.5,
            thb_krw: 37.91,
        }));
        assert!(matches!(
            cli::run_fx_lookup(&port, 0.0),
            Err(GodlifeError::ConfigInvalid { .. })
        ));
    }
}

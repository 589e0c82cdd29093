//! Core domain types and logic.

pub mod ohlcv;
pub mod period;
pub mod fundamentals;
pub mod indicator;
pub mod universe;
pub mod evaluator;
pub mod screener;
pub mod notification;
pub mod stock_summary;
pub mod exchange_rate;
pub mod config_validation;
pub mod error;

//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod http;
pub mod naver_fx_adapter;
pub mod telegram_adapter;
pub mod wikipedia_adapter;
pub mod yahoo_adapter;

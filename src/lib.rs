//! godlife: US stock screener with Telegram delivery, a console quote
//! viewer and a KRW exchange-rate lookup.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;

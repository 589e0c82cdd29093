//! Port traits for every external collaborator.

pub mod config_port;
pub mod constituent_port;
pub mod exchange_rate_port;
pub mod market_data_port;
pub mod notify_port;

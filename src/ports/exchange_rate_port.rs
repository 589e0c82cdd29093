//! Exchange rate port trait.

use crate::domain::error::GodlifeError;
use crate::domain::exchange_rate::ExchangeRates;

pub trait ExchangeRatePort {
    fn fetch_rates(&self) -> Result<ExchangeRates, GodlifeError>;
}

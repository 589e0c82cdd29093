//! Index constituent list port trait.

use crate::domain::error::GodlifeError;

pub trait ConstituentPort {
    /// Raw symbols in the publisher's notation, in table order.
    fn fetch_constituents(&self) -> Result<Vec<String>, GodlifeError>;
}

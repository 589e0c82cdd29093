//! Notification transport port trait.

use crate::domain::error::GodlifeError;
use crate::domain::notification::Credentials;

pub trait NotifyPort {
    /// Deliver one text message. Best effort: no delivery receipt is read.
    fn send(&self, credentials: &Credentials, text: &str) -> Result<(), GodlifeError>;
}

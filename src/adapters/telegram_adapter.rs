//! Telegram Bot API transport.

use crate::domain::error::GodlifeError;
use crate::domain::notification::Credentials;
use crate::ports::notify_port::NotifyPort;
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::debug;

const SERVICE: &str = "telegram";
pub const API_BASE: &str = "https://api.telegram.org";

pub struct TelegramAdapter {
    client: Client,
    api_base: String,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

impl TelegramAdapter {
    pub fn new(client: Client) -> Self {
        Self::with_base(client, API_BASE)
    }

    pub fn with_base(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    fn send_message_url(&self, bot_token: &str) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            bot_token
        )
    }
}

impl NotifyPort for TelegramAdapter {
    fn send(&self, credentials: &Credentials, text: &str) -> Result<(), GodlifeError> {
        let body = SendMessage {
            chat_id: &credentials.chat_id,
            text,
        };
        // The request URL contains the bot token.
        let response = self
            .client
            .post(self.send_message_url(&credentials.bot_token))
            .form(&body)
            .send()
            .map_err(|e| GodlifeError::http(SERVICE, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(GodlifeError::http(
                SERVICE,
                format!("sendMessage returned {}: {}", status, detail.trim()),
            ));
        }
        debug!(chat_id = %credentials.chat_id, chars = text.chars().count(), "telegram message sent");
        Ok(())
    }
}

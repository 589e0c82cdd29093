//! Shared blocking HTTP client construction.

use crate::domain::error::GodlifeError;
use crate::ports::config_port::ConfigPort;
use reqwest::blocking::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let secs = config.get_int("http", "timeout_secs", DEFAULT_TIMEOUT_SECS as i64);
        Self {
            timeout: Duration::from_secs(secs.max(1) as u64),
            user_agent: config
                .get_trimmed("http", "user_agent")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }

    /// Client with timeout, user agent and a cookie store.
    pub fn build_client(&self) -> Result<Client, GodlifeError> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .cookie_store(true)
            .build()
            .map_err(|e| GodlifeError::http("client", e))
    }
}

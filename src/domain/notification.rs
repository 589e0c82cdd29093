//! Message composition and delivery policy for screening results.
//!
//! Composition is pure ([`compose_messages`]). Delivery goes through a
//! [`Dispatcher`], which echoes to the log instead of calling the transport
//! when no credentials are configured, and swallows transport errors after
//! logging them.

use crate::domain::evaluator::MatchRecord;
use crate::ports::notify_port::NotifyPort;
use std::fmt;
use tracing::{info, warn};

pub const HEADER: &str = "[Today's US stock picks]";
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 4000;
pub const DEFAULT_OVERFLOW_LIMIT: usize = 10;

pub const TOKEN_ENV: &str = "TELEGRAM_TOKEN";
pub const CHAT_ID_ENV: &str = "CHAT_ID";

/// Bot token and recipient. Both are required for delivery.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl Credentials {
    /// Read credentials through `lookup`; `None` unless both are non-blank.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Some(Self {
            bot_token: get(TOKEN_ENV)?,
            chat_id: get(CHAT_ID_ENV)?,
        })
    }

    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyPolicy {
    /// Transport payload ceiling, in characters.
    pub max_message_len: usize,
    /// Match blocks sent when the full message is over the ceiling.
    pub overflow_limit: usize,
    /// Send a "nothing today" message when there are no matches.
    pub notify_on_empty: bool,
}

impl Default for NotifyPolicy {
    fn default() -> Self {
        Self {
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            overflow_limit: DEFAULT_OVERFLOW_LIMIT,
            notify_on_empty: true,
        }
    }
}

pub fn format_match(record: &MatchRecord) -> String {
    format!(
        "🚀 {} spotted!\n- Price: ${:.2}\n- PER: {:.2}\n- RSI: {:.2}\n- ROE: {:.2}%",
        record.ticker,
        record.close,
        record.trailing_pe,
        record.rsi,
        record.return_on_equity * 100.0
    )
}

fn join_blocks(records: &[MatchRecord]) -> String {
    records
        .iter()
        .map(format_match)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Turn matches into the messages to deliver, in order.
///
/// Over-long output becomes a notice followed by at most `overflow_limit`
/// leading blocks, fewer if that many would still exceed the ceiling. There
/// is no pagination past that. When not even one block fits, only the notice
/// is sent.
pub fn compose_messages(matches: &[MatchRecord], policy: &NotifyPolicy) -> Vec<String> {
    if matches.is_empty() {
        if policy.notify_on_empty {
            return vec![format!("{}\nNo candidates today. Relax mode.", HEADER)];
        }
        return vec![];
    }

    let full = format!(
        "{}\nFound {}\n\n{}",
        HEADER,
        matches.len(),
        join_blocks(matches)
    );
    if full.chars().count() <= policy.max_message_len {
        return vec![full];
    }

    let mut shown = policy.overflow_limit.min(matches.len());
    let mut body = join_blocks(&matches[..shown]);
    while shown > 0 && body.chars().count() > policy.max_message_len {
        shown -= 1;
        body = join_blocks(&matches[..shown]);
    }

    let notice = format!(
        "{}\nFound {} (too long for one message, showing the first {})",
        HEADER,
        matches.len(),
        shown
    );
    if shown == 0 {
        return vec![notice];
    }
    vec![notice, body]
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
    /// Messages written to the log because no credentials were configured.
    pub echoed: Vec<String>,
}

pub struct Dispatcher<'a> {
    transport: &'a dyn NotifyPort,
    credentials: Option<&'a Credentials>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(transport: &'a dyn NotifyPort, credentials: Option<&'a Credentials>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub fn dispatch(&self, messages: &[String]) -> DispatchReport {
        let mut report = DispatchReport::default();

        let Some(credentials) = self.credentials else {
            for message in messages {
                info!("no {} / {} set, local echo:\n{}", TOKEN_ENV, CHAT_ID_ENV, message);
                report.echoed.push(message.clone());
            }
            return report;
        };

        for message in messages {
            match self.transport.send(credentials, message) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(error = %e, "notification delivery failed");
                    report.failed += 1;
                }
            }
        }
        report
    }
}

//! Domain error types.

use crate::domain::universe::UniverseError;

/// Top-level error type for godlife.
#[derive(Debug, thiserror::Error)]
pub enum GodlifeError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("http error from {service}: {reason}")]
    Http { service: String, reason: String },

    #[error("unexpected payload from {service}: {reason}")]
    Payload { service: String, reason: String },

    #[error("scrape error on {page}: {reason}")]
    Scrape { page: String, reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientData {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GodlifeError {
    pub(crate) fn http(service: &str, reason: impl ToString) -> Self {
        GodlifeError::Http {
            service: service.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn payload(service: &str, reason: impl ToString) -> Self {
        GodlifeError::Payload {
            service: service.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn scrape(page: &str, reason: impl ToString) -> Self {
        GodlifeError::Scrape {
            page: page.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<&GodlifeError> for std::process::ExitCode {
    fn from(err: &GodlifeError) -> Self {
        let code: u8 = match err {
            GodlifeError::Io(_) => 1,
            GodlifeError::ConfigParse { .. }
            | GodlifeError::ConfigMissing { .. }
            | GodlifeError::ConfigInvalid { .. } => 2,
            GodlifeError::Http { .. }
            | GodlifeError::Payload { .. }
            | GodlifeError::Scrape { .. } => 3,
            GodlifeError::Universe(_) => 4,
            GodlifeError::NoData { .. } | GodlifeError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

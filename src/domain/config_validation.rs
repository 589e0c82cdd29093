//! Configuration validation.
//!
//! Validates config fields before a screen runs. Missing keys are fine
//! everywhere (defaults apply); present keys must hold sane values.

use crate::domain::error::GodlifeError;
use crate::domain::period::Period;
use crate::domain::universe::{parse_tickers, UniverseMode};
use crate::ports::config_port::ConfigPort;

pub fn validate_screen_config(config: &dyn ConfigPort) -> Result<(), GodlifeError> {
    validate_universe(config)?;
    validate_period(config)?;
    validate_windows(config)?;
    validate_thresholds(config)?;
    validate_notify(config)?;
    validate_http(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> GodlifeError {
    GodlifeError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_universe(config: &dyn ConfigPort) -> Result<(), GodlifeError> {
    let mode = match config.get_trimmed("screener", "universe") {
        Some(raw) => raw
            .parse::<UniverseMode>()
            .map_err(|e| invalid("screener", "universe", e.to_string()))?,
        None => UniverseMode::Watchlist,
    };

    if let Some(tickers) = config.get_string("screener", "tickers") {
        parse_tickers(&tickers).map_err(|e| invalid("screener", "tickers", e.to_string()))?;
    } else if mode == UniverseMode::Watchlist && config.get_string("screener", "universe").is_some()
    {
        // Explicit watchlist mode requires its own ticker list.
        return Err(GodlifeError::ConfigMissing {
            section: "screener".to_string(),
            key: "tickers".to_string(),
        });
    }
    Ok(())
}

fn validate_period(config: &dyn ConfigPort) -> Result<(), GodlifeError> {
    if let Some(raw) = config.get_trimmed("screener", "period") {
        raw.parse::<Period>()
            .map_err(|e| invalid("screener", "period", e))?;
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), GodlifeError> {
    for key in ["ma_window", "rsi_window"] {
        if config.get_int("screener", key, 1) < 1 {
            return Err(invalid("screener", key, format!("{} must be at least 1", key)));
        }
    }
    if config.get_int("screener", "progress_every", 0) < 0 {
        return Err(invalid(
            "screener",
            "progress_every",
            "progress_every must be non-negative",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), GodlifeError> {
    for key in ["per_max", "roe_min", "rsi_max"] {
        if !config.get_double("thresholds", key, 1.0).is_finite() {
            return Err(invalid("thresholds", key, "must be a finite number"));
        }
    }
    if config.get_double("thresholds", "per_max", 1.0) <= 0.0 {
        return Err(invalid("thresholds", "per_max", "per_max must be positive"));
    }
    let rsi_max = config.get_double("thresholds", "rsi_max", 50.0);
    if rsi_max <= 0.0 || rsi_max > 100.0 {
        return Err(invalid(
            "thresholds",
            "rsi_max",
            "rsi_max must be in (0, 100]",
        ));
    }
    Ok(())
}

fn validate_notify(config: &dyn ConfigPort) -> Result<(), GodlifeError> {
    if config.get_int("notify", "max_message_len", 4000) < 100 {
        return Err(invalid(
            "notify",
            "max_message_len",
            "max_message_len must be at least 100",
        ));
    }
    if config.get_int("notify", "overflow_limit", 10) < 1 {
        return Err(invalid(
            "notify",
            "overflow_limit",
            "overflow_limit must be at least 1",
        ));
    }
    Ok(())
}

fn validate_http(config: &dyn ConfigPort) -> Result<(), GodlifeError> {
    if config.get_int("http", "timeout_secs", 15) < 1 {
        return Err(invalid("http", "timeout_secs", "timeout_secs must be at least 1"));
    }
    Ok(())
}

//! INI file configuration adapter.

use crate::domain::error::GodlifeError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GodlifeError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| GodlifeError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// Adapter with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[screener]
universe = sp500
tickers = AAPL, MSFT

[thresholds]
per_max = 40
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("screener", "universe"),
            Some("sp500".to_string())
        );
        assert_eq!(
            adapter.get_string("screener", "tickers"),
            Some("AAPL, MSFT".to_string())
        );
        assert_eq!(adapter.get_double("thresholds", "per_max", 0.0), 40.0);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[screener]\nperiod = 6mo\n").unwrap();
        assert_eq!(adapter.get_string("screener", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_trimmed_skips_blank_values() {
        let adapter = FileConfigAdapter::from_string("[screener]\nuniverse =   \n").unwrap();
        assert_eq!(adapter.get_trimmed("screener", "universe"), None);
    }

    #[test]
    fn get_int_falls_back_on_bad_values() {
        let adapter =
            FileConfigAdapter::from_string("[screener]\nma_window = 50\nrsi_window = abc\n")
                .unwrap();
        assert_eq!(adapter.get_int("screener", "ma_window", 20), 50);
        assert_eq!(adapter.get_int("screener", "rsi_window", 14), 14);
        assert_eq!(adapter.get_int("screener", "missing", 7), 7);
    }

    #[test]
    fn get_double_falls_back_on_bad_values() {
        let adapter =
            FileConfigAdapter::from_string("[thresholds]\nroe_min = 0.1\nrsi_max = high\n")
                .unwrap();
        assert_eq!(adapter.get_double("thresholds", "roe_min", 0.15), 0.1);
        assert_eq!(adapter.get_double("thresholds", "rsi_max", 35.0), 35.0);
    }

    #[test]
    fn get_bool_values() {
        let adapter = FileConfigAdapter::from_string(
            "[notify]\na = true\nb = yes\nc = On\nd = false\ne = 0\nf = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("notify", "a", false));
        assert!(adapter.get_bool("notify", "b", false));
        assert!(adapter.get_bool("notify", "c", false));
        assert!(!adapter.get_bool("notify", "d", true));
        assert!(!adapter.get_bool("notify", "e", true));
        assert!(adapter.get_bool("notify", "f", true));
        assert!(!adapter.get_bool("notify", "missing", false));
    }

    #[test]
    fn empty_adapter_uses_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("screener", "tickers"), None);
        assert_eq!(adapter.get_int("notify", "overflow_limit", 10), 10);
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[http]\ntimeout_secs = 30\n").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_int("http", "timeout_secs", 15), 30);
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/godlife.ini");
        assert!(matches!(result, Err(GodlifeError::ConfigParse { .. })));
    }
}

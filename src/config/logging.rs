use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use super::types::ConfigError;

/// LoggingConfig controls how we initialize tracing/logging.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String, // e.g. "info", "debug", "warn"
    #[serde(default = "default_format")]
    pub format: String, // e.g. "json", "console"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl LoggingConfig {
    /// Parses the configured level string into a filter.
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        match self.level.trim().to_lowercase().as_str() {
            "trace" => Ok(LevelFilter::TRACE),
            "debug" => Ok(LevelFilter::DEBUG),
            "info" => Ok(LevelFilter::INFO),
            "warn" => Ok(LevelFilter::WARN),
            "error" => Ok(LevelFilter::ERROR),
            _ => Err(ConfigError::Invalid(format!(
                "LOG_LEVEL '{}' is not one of: trace, debug, info, warn, error",
                self.level
            ))),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format.trim().eq_ignore_ascii_case("json")
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "console".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_case_insensitive() {
        let config = LoggingConfig {
            level: " DEBUG ".to_string(),
            format: "console".to_string(),
        };
        assert_eq!(config.level_filter().unwrap(), LevelFilter::DEBUG);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
            format: "json".to_string(),
        };
        assert!(matches!(
            config.level_filter(),
            Err(ConfigError::Invalid(_))
        ));
        assert!(config.is_json());
    }
}

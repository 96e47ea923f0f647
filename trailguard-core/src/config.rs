//! Strategy configuration — startup banner, instrument, timeframe.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bar timeframe. Fixed at engine start, not reconfigurable mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
}

impl Timeframe {
    /// Nominal bar duration in minutes.
    pub fn minutes(&self) -> u32 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H4 => 240,
            Timeframe::D1 => 1440,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Timeframe::M1 => "M1",
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::D1 => "D1",
        };
        f.write_str(name)
    }
}

/// Serializable configuration for a running strategy instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Cosmetic banner logged once at startup.
    #[serde(default = "default_message")]
    pub message: String,

    /// Instrument this engine manages; positions on other symbols are
    /// ignored.
    pub symbol: String,

    /// Bar timeframe the host supplies history for.
    #[serde(default = "default_timeframe")]
    pub timeframe: Timeframe,
}

fn default_message() -> String {
    "Hello world!".to_string()
}

fn default_timeframe() -> Timeframe {
    Timeframe::M5
}

impl StrategyConfig {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            message: default_message(),
            symbol: symbol.into(),
            timeframe: default_timeframe(),
        }
    }

    /// Load from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_the_platform() {
        let config = StrategyConfig::new("EURUSD");
        assert_eq!(config.message, "Hello world!");
        assert_eq!(config.timeframe, Timeframe::M5);
        assert_eq!(config.symbol, "EURUSD");
    }

    #[test]
    fn timeframe_durations() {
        assert_eq!(Timeframe::M5.minutes(), 5);
        assert_eq!(Timeframe::H4.minutes(), 240);
        assert_eq!(Timeframe::D1.minutes(), 1440);
    }

    #[test]
    fn parses_toml_with_defaults() {
        let config: StrategyConfig = toml::from_str(r#"symbol = "EURUSD""#).unwrap();
        assert_eq!(config.symbol, "EURUSD");
        assert_eq!(config.timeframe, Timeframe::M5);
        assert_eq!(config.message, "Hello world!");
    }

    #[test]
    fn parses_full_toml() {
        let config: StrategyConfig = toml::from_str(
            r#"
            message = "managing stops"
            symbol = "GBPJPY"
            timeframe = "M15"
            "#,
        )
        .unwrap();
        assert_eq!(config.timeframe, Timeframe::M15);
        assert_eq!(config.message, "managing stops");
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = StrategyConfig::new("EURUSD");
        let raw = toml::to_string(&config).unwrap();
        let deser: StrategyConfig = toml::from_str(&raw).unwrap();
        assert_eq!(config, deser);
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join("trailguard_config_test.toml");
        std::fs::write(&path, "symbol = \"EURUSD\"\ntimeframe = \"H1\"\n").unwrap();
        let config = StrategyConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.timeframe, Timeframe::H1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = StrategyConfig::from_toml_file("/nonexistent/trailguard.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

//! CLI configuration file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use trendscan::ScreenerConfig;
use trendscan::data::YahooConfig;

/// Errors loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    /// File could not be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// File is not valid JSON for [`AppConfig`].
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything a run can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// Pipeline settings
    pub(crate) screener: ScreenerConfig,
    /// Yahoo Finance request budget
    pub(crate) yahoo: YahooConfig,
}

impl AppConfig {
    /// Load from a JSON file, or defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_nested_partial_json() {
        let config = AppConfig::from_json(
            r#"{"screener": {"concurrency": 4}, "yahoo": {"min_request_interval_ms": 250}}"#,
        )
        .unwrap();
        assert_eq!(config.screener.concurrency, 4);
        assert_eq!(config.screener.min_price_points, 251);
        assert_eq!(config.yahoo.min_request_interval_ms, 250);
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/trendscan.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

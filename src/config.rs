//! Runtime configuration.
//!
//! Configuration only affects the surrounding layers (cache lifetimes and
//! gather width); resolution itself has no knobs.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file '{path}': {message}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        message: String,
    },

    /// The document is not valid config JSON.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parser message, with line and column.
        message: String,
    },

    /// A value is out of range.
    #[error("Invalid value for '{field}': {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Cache lifetimes, in seconds. `None` means entries never expire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of per-series reads (series row, participants, matches).
    pub series_ttl_secs: Option<u64>,
    /// Lifetime of whole-listing reads (events, tournaments, maps, ...).
    pub events_ttl_secs: Option<u64>,
}

impl CacheConfig {
    /// TTL for per-series reads.
    #[must_use]
    pub fn series_ttl(&self) -> Option<Duration> {
        self.series_ttl_secs.map(secs_to_duration)
    }

    /// TTL for listing reads.
    #[must_use]
    pub fn events_ttl(&self) -> Option<Duration> {
        self.events_ttl_secs.map(secs_to_duration)
    }
}

/// Longest representable TTL; larger values are clamped (about a century).
const MAX_TTL_SECS: i64 = 100 * 365 * 24 * 60 * 60;

fn secs_to_duration(secs: u64) -> Duration {
    Duration::seconds(i64::try_from(secs).unwrap_or(MAX_TTL_SECS).min(MAX_TTL_SECS))
}

/// Concurrency limits for gathers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatherConfig {
    /// Upper bound on worker threads used by a single gather.
    pub max_concurrency: usize,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self { max_concurrency: 8 }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidesConfig {
    /// Cache lifetimes.
    pub cache: CacheConfig,
    /// Gather width.
    pub gather: GatherConfig,
}

impl SidesConfig {
    /// Parse and validate a JSON config document. Missing fields take defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gather.max_concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "gather.max_concurrency".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_never_expire() {
        let config = SidesConfig::default();
        assert_eq!(config.cache.series_ttl(), None);
        assert_eq!(config.cache.events_ttl(), None);
        assert_eq!(config.gather.max_concurrency, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let config = SidesConfig::from_json_str(r#"{"cache": {"series_ttl_secs": 60}}"#).unwrap();
        assert_eq!(config.cache.series_ttl(), Some(Duration::seconds(60)));
        assert_eq!(config.cache.events_ttl_secs, None);
        assert_eq!(config.gather, GatherConfig::default());
    }

    #[test]
    fn huge_ttl_is_clamped() {
        let config = SidesConfig::from_json_str(&format!(r#"{{"cache": {{"series_ttl_secs": {}}}}}"#, u64::MAX)).unwrap();
        assert_eq!(config.cache.series_ttl(), Some(Duration::seconds(MAX_TTL_SECS)));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = SidesConfig::from_json_str(r#"{"gather": {"max_concurrency": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SidesConfig::from_json_str("{ cache").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cache": {{"events_ttl_secs": 5}}}}"#).unwrap();
        let config = SidesConfig::from_path(file.path()).unwrap();
        assert_eq!(config.cache.events_ttl(), Some(Duration::seconds(5)));

        let err = SidesConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

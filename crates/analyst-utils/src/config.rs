//! Configuration management utilities

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::logging::LogFormat;

/// Errors raised while reading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    Invalid { key: String, value: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
    /// Directory holding `macro_data.csv` and news snapshots
    pub data_dir: PathBuf,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Model identifier for analyst nodes
    pub model: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "analyst-rs".to_string(),
            environment: "development".to_string(),
            data_dir: PathBuf::from("data"),
            log_filter: "info".to_string(),
            log_format: LogFormat::Text,
            model: None,
        }
    }
}

impl Config {
    /// Load from `ANALYST_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup
    ///
    /// Reads `ANALYST_APP_NAME`, `ANALYST_ENV`, `ANALYST_DATA_DIR`,
    /// `ANALYST_LOG`, `ANALYST_LOG_FORMAT` and `ANALYST_MODEL`. Empty values
    /// count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let log_format = match get("ANALYST_LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|_| ConfigError::Invalid {
                key: "ANALYST_LOG_FORMAT".to_string(),
                value: raw,
            })?,
            None => defaults.log_format,
        };

        Ok(Self {
            app_name: get("ANALYST_APP_NAME").unwrap_or(defaults.app_name),
            environment: get("ANALYST_ENV").unwrap_or(defaults.environment),
            data_dir: get("ANALYST_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            log_filter: get("ANALYST_LOG").unwrap_or(defaults.log_filter),
            log_format,
            model: get("ANALYST_MODEL"),
        })
    }
}

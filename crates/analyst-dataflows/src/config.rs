//! Configuration for the data adapters

use analyst_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::macro_indicators::MACRO_DATASET_FILE;

/// Environment variable holding the Finnhub API key
pub const FINNHUB_API_KEY_ENV: &str = "FINNHUB_API_KEY";

/// Primary backend for the news capabilities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsVendor {
    /// Finnhub REST API (requires API key)
    Finnhub,
    /// CSV snapshots under `<data_dir>/news`
    #[default]
    Local,
}

impl fmt::Display for NewsVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finnhub => f.write_str("finnhub"),
            Self::Local => f.write_str("local"),
        }
    }
}

impl FromStr for NewsVendor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "finnhub" => Ok(Self::Finnhub),
            "local" => Ok(Self::Local),
            other => Err(Error::Config(format!(
                "unknown news vendor '{other}', expected 'finnhub' or 'local'"
            ))),
        }
    }
}

/// Configuration for dataset locations and vendor selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataflowConfig {
    /// Directory holding `macro_data.csv` and the `news/` snapshots
    pub data_dir: PathBuf,

    /// Primary news backend
    pub news_vendor: NewsVendor,

    /// Register the local snapshot after Finnhub, for transient failures
    pub fallback_to_local: bool,

    /// Finnhub API key (optional)
    pub finnhub_api_key: Option<String>,

    /// Finnhub requests per minute (free tier: 60)
    pub finnhub_rate_limit: u32,

    /// Request timeout for HTTP vendors
    pub request_timeout: Duration,
}

impl Default for DataflowConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            news_vendor: NewsVendor::Local,
            fallback_to_local: true,
            finnhub_api_key: None,
            finnhub_rate_limit: 60,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl DataflowConfig {
    /// Create a new configuration builder
    pub fn builder() -> DataflowConfigBuilder {
        DataflowConfigBuilder::default()
    }

    /// Load the Finnhub API key from the environment
    #[must_use]
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var(FINNHUB_API_KEY_ENV) {
            self.finnhub_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.news_vendor == NewsVendor::Finnhub && self.finnhub_api_key.is_none() {
            return Err(Error::Config(format!(
                "{FINNHUB_API_KEY_ENV} required when using the finnhub news vendor"
            )));
        }

        if self.finnhub_rate_limit == 0 {
            return Err(Error::Config(
                "finnhub_rate_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Path of the macro indicator dataset
    pub fn macro_dataset_path(&self) -> PathBuf {
        self.data_dir.join(MACRO_DATASET_FILE)
    }

    /// Directory of the local news snapshots
    pub fn news_dir(&self) -> PathBuf {
        self.data_dir.join("news")
    }
}

/// Builder for [`DataflowConfig`]
#[derive(Debug, Default)]
pub struct DataflowConfigBuilder {
    data_dir: Option<PathBuf>,
    news_vendor: Option<NewsVendor>,
    fallback_to_local: Option<bool>,
    finnhub_api_key: Option<String>,
    finnhub_rate_limit: Option<u32>,
    request_timeout: Option<Duration>,
}

impl DataflowConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set the primary news vendor
    pub fn news_vendor(mut self, vendor: NewsVendor) -> Self {
        self.news_vendor = Some(vendor);
        self
    }

    /// Enable or disable the local fallback behind Finnhub
    pub fn fallback_to_local(mut self, enabled: bool) -> Self {
        self.fallback_to_local = Some(enabled);
        self
    }

    /// Set the Finnhub API key
    pub fn finnhub_api_key(mut self, key: impl Into<String>) -> Self {
        self.finnhub_api_key = Some(key.into());
        self
    }

    /// Set the Finnhub rate limit (requests per minute)
    pub fn finnhub_rate_limit(mut self, per_minute: u32) -> Self {
        self.finnhub_rate_limit = Some(per_minute);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Load the Finnhub API key from the environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var(FINNHUB_API_KEY_ENV) {
            self.finnhub_api_key = Some(key);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DataflowConfig> {
        let defaults = DataflowConfig::default();

        let config = DataflowConfig {
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            news_vendor: self.news_vendor.unwrap_or(defaults.news_vendor),
            fallback_to_local: self.fallback_to_local.unwrap_or(defaults.fallback_to_local),
            finnhub_api_key: self.finnhub_api_key,
            finnhub_rate_limit: self.finnhub_rate_limit.unwrap_or(defaults.finnhub_rate_limit),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DataflowConfig::default();
        assert_eq!(config.news_vendor, NewsVendor::Local);
        assert!(config.fallback_to_local);
        assert_eq!(config.finnhub_rate_limit, 60);
        assert_eq!(config.macro_dataset_path(), PathBuf::from("data/macro_data.csv"));
        assert_eq!(config.news_dir(), PathBuf::from("data/news"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = DataflowConfig::builder()
            .data_dir("/srv/analyst")
            .news_vendor(NewsVendor::Finnhub)
            .finnhub_api_key("key")
            .finnhub_rate_limit(30)
            .request_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.macro_dataset_path(), PathBuf::from("/srv/analyst/macro_data.csv"));
        assert_eq!(config.finnhub_rate_limit, 30);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_finnhub_requires_key() {
        let result = DataflowConfig::builder()
            .news_vendor(NewsVendor::Finnhub)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let result = DataflowConfig::builder().finnhub_rate_limit(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_news_vendor_parsing() {
        assert_eq!("finnhub".parse::<NewsVendor>().unwrap(), NewsVendor::Finnhub);
        assert_eq!(" Local ".parse::<NewsVendor>().unwrap(), NewsVendor::Local);
        assert!("yahoo".parse::<NewsVendor>().is_err());
        assert_eq!(NewsVendor::Finnhub.to_string(), "finnhub");
        assert_eq!(serde_json::to_value(NewsVendor::Local).unwrap(), "local");
    }
}

//! Client configuration with validation.

use std::env;
use std::time::Duration;

use ak_01_entity_codec::{BTL_DEFAULT, CONTENT_TYPE_DEFAULT};
use ak_02_tx_encoding::STORAGE_ADDRESS;
use ak_04_event_watch::{WatchConfig, DEFAULT_POLL_INTERVAL, DEFAULT_STOP_TIMEOUT};
use ak_05_query_paging::{QueryOptions, DEFAULT_RESULTS_PER_PAGE};
use arkiv_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use shared_types::Address;
use thiserror::Error;

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Node JSON-RPC endpoint, handed to the transport
    pub rpc_url: String,
    /// Storage contract that receives entity transactions
    pub storage_address: Address,
    /// Delay between two polls of one event filter
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Upper bound on waiting for a watcher thread to exit
    #[serde(with = "humantime_serde")]
    pub stop_timeout: Duration,
    /// Blocks-to-live for creates and updates that do not set one
    pub default_btl: u64,
    pub default_content_type: String,
    pub max_results_per_page: usize,
    pub telemetry: TelemetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            storage_address: STORAGE_ADDRESS,
            poll_interval: DEFAULT_POLL_INTERVAL,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
            default_btl: BTL_DEFAULT,
            default_content_type: CONTENT_TYPE_DEFAULT.to_string(),
            max_results_per_page: DEFAULT_RESULTS_PER_PAGE,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ARKIV_RPC_URL`
    /// - `ARKIV_POLL_INTERVAL_MS`
    /// - `ARKIV_STOP_TIMEOUT_MS`
    /// - `ARKIV_DEFAULT_BTL`
    /// - `ARKIV_RESULTS_PER_PAGE`
    ///
    /// Unparseable numbers are rejected rather than ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            telemetry: TelemetryConfig::from_env(),
            ..Self::default()
        };

        if let Ok(url) = env::var("ARKIV_RPC_URL") {
            config.rpc_url = url;
        }
        if let Some(ms) = env_number::<u64>("ARKIV_POLL_INTERVAL_MS")? {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = env_number::<u64>("ARKIV_STOP_TIMEOUT_MS")? {
            config.stop_timeout = Duration::from_millis(ms);
        }
        if let Some(btl) = env_number("ARKIV_DEFAULT_BTL")? {
            config.default_btl = btl;
        }
        if let Some(size) = env_number("ARKIV_RESULTS_PER_PAGE")? {
            config.max_results_per_page = size;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid("rpc_url must not be empty".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "poll_interval must be greater than zero".into(),
            ));
        }
        if self.max_results_per_page == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_results_per_page must be greater than zero".into(),
            ));
        }
        if self.default_btl == 0 {
            return Err(ConfigError::InvalidLimit(
                "default_btl must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn watch_config(&self) -> WatchConfig {
        WatchConfig::default()
            .with_poll_interval(self.poll_interval)
            .with_stop_timeout(self.stop_timeout)
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions::default().with_page_size(self.max_results_per_page)
    }
}

fn env_number<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { name, value }),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Environment variable present but unparseable
    #[error("invalid value for {name}: {value:?}")]
    Env { name: &'static str, value: String },
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Humantime serde module for Duration serialization
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" before "s"
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .map(Duration::from_secs)
                .ok_or("invalid minutes")
        } else {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}

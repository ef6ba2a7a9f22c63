//! Storefront Ingest configuration
//!
//! Settings are read from an optional TOML file and then overridden by
//! `SF_*` environment variables. Every section has defaults, so an empty
//! file (or no file at all) yields a runnable configuration.
//!
//! ```toml
//! [log]
//! level = "debug"
//! json = true
//!
//! [alert]
//! webhook_url = "https://hooks.example.com/ingest"
//! timeout_secs = 5
//!
//! [routing]
//! cdc_prefix = "dbserver.cdc"
//! event_prefix = "app.event"
//! job_topic = "app.job.generic"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    pub log: LogConfig,
    pub alert: AlertConfig,
    pub routing: RoutingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Default level directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Out-of-band alerting for failed jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertConfig {
    /// Webhook receiving alert JSON. Alerts are only logged when unset.
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: 10,
        }
    }
}

/// Topic naming used to route broker messages to handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    /// CDC topics are `<cdc_prefix>.<entity>`.
    pub cdc_prefix: String,
    /// Non-CDC topics are `<event_prefix>.<entity>`.
    pub event_prefix: String,
    pub job_topic: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cdc_prefix: "cdc".to_string(),
            event_prefix: "event".to_string(),
            job_topic: "job.generic".to_string(),
        }
    }
}

impl RoutingConfig {
    pub fn cdc_topic(&self, kind: &str) -> String {
        format!("{}.{}", self.cdc_prefix, kind)
    }

    pub fn event_topic(&self, kind: &str) -> String {
        format!("{}.{}", self.event_prefix, kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    /// Address for the Prometheus scrape endpoint, e.g. `0.0.0.0:9090`.
    pub listen_addr: Option<String>,
}

// ============================================================================
// Loading
// ============================================================================

impl IngestConfig {
    /// Load from `path` (if given), apply process environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Apply `SF_*` overrides from an iterator of environment pairs.
    /// Unrelated variables are ignored.
    pub fn apply_env<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "SF_LOG_LEVEL" => self.log.level = value,
                "SF_LOG_JSON" => self.log.json = parse_bool(&key, &value)?,
                "SF_ALERT_WEBHOOK_URL" => {
                    self.alert.webhook_url = Some(value).filter(|v| !v.is_empty())
                }
                "SF_ALERT_TIMEOUT_SECS" => {
                    self.alert.timeout_secs = value.parse().map_err(|_| invalid(&key, &value))?
                }
                "SF_CDC_TOPIC_PREFIX" => self.routing.cdc_prefix = value,
                "SF_EVENT_TOPIC_PREFIX" => self.routing.event_prefix = value,
                "SF_JOB_TOPIC" => self.routing.job_topic = value,
                "SF_METRICS_ADDR" => self.metrics.listen_addr = Some(value).filter(|v| !v.is_empty()),
                _ => {}
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.alert.timeout_secs == 0 {
            return Err(ConfigError::Invalid("alert.timeout_secs must be positive".to_string()));
        }
        let routing = &self.routing;
        if routing.cdc_prefix.is_empty() || routing.event_prefix.is_empty() || routing.job_topic.is_empty() {
            return Err(ConfigError::Invalid("routing topics must not be empty".to_string()));
        }
        if routing.cdc_prefix == routing.event_prefix {
            return Err(ConfigError::Invalid(
                "routing.cdc_prefix and routing.event_prefix must differ".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

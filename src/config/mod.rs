//! Configuration management for the slot watcher
//!
//! Configuration is loaded once at start-up, from the environment (after an
//! optional `.env` file) or from a TOML file, validated eagerly, and then
//! handed to the watcher. Nothing else reads the environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::models::Credentials;
use crate::utils::SleepRange;

/// Default portal root
pub const DEFAULT_BASE_URL: &str = "https://ais.usvisa-info.com/pt-br/niv";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Portal endpoints and HTTP settings
    pub portal: PortalConfig,

    /// Login credentials
    pub credentials: Credentials,

    /// Poll loop pacing
    #[serde(default)]
    pub polling: PollingConfig,

    /// Alert settings
    #[serde(default)]
    pub alert: AlertConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Portal-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Root URL every endpoint hangs off
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Applicant schedule identifier
    pub schedule_id: String,

    /// Consulate/facility identifier
    pub facility_id: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Poll loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Lower bound of the pause between cycles, in seconds
    pub min_sleep_secs: u64,

    /// Upper bound of the pause between cycles, in seconds
    pub max_sleep_secs: u64,

    /// Give up after this many failed cycles; unset retries forever
    pub max_restarts: Option<u32>,
}

/// Alert configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Play sounds and raise notifications at all
    pub enabled: bool,

    /// Desktop notification title
    pub title: String,

    /// Command used to play `sound_file`
    pub sound_player: String,

    /// Sound file handed to the player
    pub sound_file: String,

    /// How long the sound keeps repeating, in seconds
    pub sound_duration_secs: u64,

    /// Gap between repeats, in seconds
    pub sound_interval_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for PollingConfig {
    fn default() -> Self {
        let range = SleepRange::default();
        Self {
            min_sleep_secs: range.min_secs,
            max_sleep_secs: range.max_secs,
            max_restarts: None,
        }
    }
}

impl PollingConfig {
    pub fn sleep_range(&self) -> SleepRange {
        SleepRange::new(self.min_sleep_secs, self.max_sleep_secs)
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: String::from("Visto Disponível"),
            sound_player: String::from("afplay"),
            sound_file: String::from("/System/Library/Sounds/Funk.aiff"),
            sound_duration_secs: 60,
            sound_interval_secs: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{key} is not set"))
        };
        let parsed = |key: &str| -> Result<Option<u64>> {
            lookup(key)
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .with_context(|| format!("{key} must be a whole number, got {v:?}"))
                })
                .transpose()
        };

        let polling_defaults = PollingConfig::default();
        let alert_defaults = AlertConfig::default();
        let logging_defaults = LoggingConfig::default();

        let max_restarts = parsed("SLOTWATCH_MAX_RESTARTS")?
            .map(|n| u32::try_from(n).context("SLOTWATCH_MAX_RESTARTS is too large"))
            .transpose()?;

        Ok(Self {
            portal: PortalConfig {
                base_url: lookup("SLOTWATCH_BASE_URL").unwrap_or_else(default_base_url),
                schedule_id: required("SCHEDULE_ID")?,
                facility_id: required("FACILITY_ID")?,
                request_timeout_secs: parsed("SLOTWATCH_REQUEST_TIMEOUT")?
                    .unwrap_or_else(default_request_timeout),
            },
            credentials: Credentials::new(required("USERNAME")?, required("PASSWORD")?),
            polling: PollingConfig {
                min_sleep_secs: parsed("SLOTWATCH_MIN_SLEEP_SECS")?
                    .unwrap_or(polling_defaults.min_sleep_secs),
                max_sleep_secs: parsed("SLOTWATCH_MAX_SLEEP_SECS")?
                    .unwrap_or(polling_defaults.max_sleep_secs),
                max_restarts,
            },
            alert: AlertConfig {
                sound_player: lookup("SLOTWATCH_SOUND_PLAYER")
                    .unwrap_or(alert_defaults.sound_player.clone()),
                sound_file: lookup("SLOTWATCH_ALERT_SOUND")
                    .unwrap_or(alert_defaults.sound_file.clone()),
                ..alert_defaults
            },
            logging: LoggingConfig {
                level: lookup("SLOTWATCH_LOG_LEVEL").unwrap_or(logging_defaults.level),
                format: lookup("SLOTWATCH_LOG_FORMAT").unwrap_or(logging_defaults.format),
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.credentials.username.trim().is_empty() {
            anyhow::bail!("username must not be empty");
        }

        if self.credentials.password.is_empty() {
            anyhow::bail!("password must not be empty");
        }

        if self.portal.schedule_id.trim().is_empty() || self.portal.facility_id.trim().is_empty() {
            anyhow::bail!("schedule_id and facility_id must not be empty");
        }

        Url::parse(&self.portal.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.portal.base_url))?;

        if self.portal.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.polling.min_sleep_secs > self.polling.max_sleep_secs {
            anyhow::bail!(
                "min_sleep_secs ({}) must not exceed max_sleep_secs ({})",
                self.polling.min_sleep_secs,
                self.polling.max_sleep_secs
            );
        }

        if self.alert.sound_interval_secs == 0 {
            anyhow::bail!("sound_interval_secs must be greater than 0");
        }

        Ok(())
    }
}

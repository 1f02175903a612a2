//! Configuration loading for the notifier
//!
//! YAML file plus environment overrides, so deployments can point the same
//! config at different servers without editing files.

use crate::identity::{Identity, Role};
use resocket::ExponentialBackoff;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Notifier daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    pub server: ServerConfig,
    pub identity: IdentityConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base realtime URL, e.g. `wss://api.cargolink.example`
    pub ws_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub user_id: String,
    pub role: Role,
}

impl IdentityConfig {
    pub fn to_identity(&self) -> Identity {
        Identity::new(self.user_id.clone(), self.role)
    }
}

/// Reconnect and dispatch knobs for the realtime link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound on any single retry delay, in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Retry ceiling; once spent, only an explicit reconnect revives the link
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Whether the notification sound cue starts enabled
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
}

impl RealtimeConfig {
    /// Backoff policy as configured: `min(base * 2^attempt, cap)` up to the ceiling
    pub fn reconnect_policy(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
            Some(self.max_attempts),
        )
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            max_attempts: default_max_attempts(),
            sound_enabled: default_sound_enabled(),
        }
    }
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_max_attempts() -> usize {
    5
}

fn default_sound_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl NotifierConfig {
    /// Load configuration from a YAML file, then apply environment overrides
    ///
    /// Recognized overrides: `CARGOLINK_WS_URL`, `CARGOLINK_USER_ID`,
    /// `CARGOLINK_ROLE`.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config: NotifierConfig = serde_yaml::from_str(&yaml_content)?;

        if let Ok(ws_url) = std::env::var("CARGOLINK_WS_URL") {
            config.server.ws_url = ws_url;
        }
        if let Ok(user_id) = std::env::var("CARGOLINK_USER_ID") {
            config.identity.user_id = user_id;
        }
        if let Ok(role) = std::env::var("CARGOLINK_ROLE") {
            config.identity.role = role
                .parse()
                .map_err(ConfigError::ValidationError)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.server.ws_url.starts_with("ws://") && !self.server.ws_url.starts_with("wss://") {
            return Err(ConfigError::ValidationError(format!(
                "server.ws_url must use ws:// or wss://, got '{}'",
                self.server.ws_url
            )));
        }
        if self.identity.user_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "identity.user_id must not be empty".to_string(),
            ));
        }
        if self.realtime.base_delay_ms == 0 {
            return Err(ConfigError::ValidationError(
                "realtime.base_delay_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Log the effective configuration at startup
    pub fn log(&self) {
        info!(
            ws_url = %self.server.ws_url,
            user = %self.identity.user_id,
            role = %self.identity.role,
            base_delay_ms = self.realtime.base_delay_ms,
            max_delay_ms = self.realtime.max_delay_ms,
            max_attempts = self.realtime.max_attempts,
            sound = self.realtime.sound_enabled,
            "notifier configuration loaded"
        );
    }
}

//! # rb-config
//!
//! Layered client settings: built-in defaults, then an optional
//! `rusty-blog.toml`, then `RUSTY_BLOG_*` environment variables
//! (a `.env` file is read first).

use config::{Config, Environment, File};
use rb_core::error::AppError;
use rb_core::models::SortOption;
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Base name of the optional settings file (any format `config` understands).
pub const CONFIG_FILE: &str = "rusty-blog";
/// Prefix for environment overrides, e.g. `RUSTY_BLOG_API_BASE_URL`.
pub const ENV_PREFIX: &str = "RUSTY_BLOG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct ClientSettings {
    /// API root every request path is joined onto
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Sent as `Authorization: Bearer <token>` when present
    #[serde(default)]
    pub api_token: Option<SecretString>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub sort_option: SortOption,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    20
}

impl ClientSettings {
    /// Loads settings from `.env`, `rusty-blog.*` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let cfg = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Self::from_config(cfg)
    }

    /// Deserializes and validates an already-built `Config`.
    pub fn from_config(cfg: Config) -> Result<Self, ConfigError> {
        let settings: ClientSettings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "api_base_url",
                reason: "must not be empty".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "page_size",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

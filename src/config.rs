// src/config.rs

//! Configuration loading utilities.
//!
//! Secrets come from the environment; everything else from a TOML file
//! (local path for the CLI, S3 object for Lambda).

use std::fmt;

use url::Url;

use crate::error::{AppError, Result};

#[cfg(feature = "s3")]
use crate::{models::Config, storage::s3::S3Storage};

/// Environment variable holding the open API key.
pub const API_KEY_VAR: &str = "NEXON_API_KEY";

/// Environment variable holding the webhook URL.
pub const WEBHOOK_URL_VAR: &str = "DISCORD_WEBHOOK_URL";

/// The two secrets a run needs.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub webhook_url: Url,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, webhook_url: &str) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AppError::config(format!("{API_KEY_VAR} is empty")));
        }
        let webhook_url = Url::parse(webhook_url)
            .map_err(|e| AppError::config(format!("{WEBHOOK_URL_VAR} is not a URL: {e}")))?;
        Ok(Self {
            api_key,
            webhook_url,
        })
    }

    /// Read both secrets from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::config(format!("{API_KEY_VAR} environment variable is required")))?;
        let webhook_url = lookup(WEBHOOK_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                AppError::config(format!("{WEBHOOK_URL_VAR} environment variable is required"))
            })?;
        Self::new(api_key, &webhook_url)
    }
}

// Keep secrets out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("webhook_url", &self.webhook_url.host_str())
            .finish()
    }
}

/// Config loader for Lambda environment.
#[cfg(feature = "s3")]
pub struct LambdaConfigLoader {
    storage: S3Storage,
    prefix: String,
}

#[cfg(feature = "s3")]
impl LambdaConfigLoader {
    pub fn new(storage: S3Storage, config_prefix: &str) -> Self {
        Self {
            storage,
            prefix: config_prefix.to_string(),
        }
    }

    /// Load `config.toml` from S3, falling back to defaults when absent.
    pub async fn load_config(&self) -> Result<Config> {
        let key = format!("{}/config.toml", self.prefix);
        log::info!("Loading config file from S3: {}", key);

        let mut config = match self.storage.read_bytes_optional(&key).await? {
            Some(bytes) => {
                let s = String::from_utf8(bytes).map_err(|e| {
                    AppError::config(format!("Config file {} is not valid UTF-8: {}", key, e))
                })?;
                Config::from_toml(&s)?
            }
            None => {
                log::warn!("Config file not found in S3: {}. Using defaults.", key);
                Config::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

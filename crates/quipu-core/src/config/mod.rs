//! TOML configuration with per-section defaults.


use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::QuipuError;

/// Top-level Quipu configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub quipu: QuipuConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub rates: RatesConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuipuConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Offset from UTC, in minutes, used for report boundaries and
    /// transaction timestamps shown to the user. Default is America/Bogota.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
}

impl Default for QuipuConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            utc_offset_minutes: default_utc_offset(),
        }
    }
}

/// Database config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Exchange-rate provider config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    #[serde(default = "default_rates_url")]
    pub api_url: String,
    /// API key for the provider. Falls back to the `FIXER_API_KEY` env var
    /// when empty, so the secret can stay out of the config file.
    #[serde(default)]
    pub api_key: String,
    /// Rate substituted when the provider is unreachable or returns garbage.
    #[serde(default = "default_fallback_rate")]
    pub fallback_rate: f64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            api_url: default_rates_url(),
            api_key: String::new(),
            fallback_rate: default_fallback_rate(),
        }
    }
}

/// Twilio WhatsApp config for outbound welcome messages.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TwilioConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub account_sid: String,
    /// Falls back to the `TWILIO_AUTH_TOKEN` env var when empty.
    #[serde(default)]
    pub auth_token: String,
    /// The WhatsApp-enabled number messages are sent from, E.164.
    #[serde(default)]
    pub from_number: String,
}

/// Webhook server config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_name() -> String {
    "Quipu".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_utc_offset() -> i32 {
    -300
}

fn default_db_path() -> String {
    "~/.quipu/data/quipu.db".to_string()
}

fn default_rates_url() -> String {
    "https://api.apilayer.com/fixer/latest".to_string()
}

fn default_fallback_rate() -> f64 {
    4700.0
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. Empty secrets are
/// filled from the environment after parsing.
pub fn load(path: &str) -> Result<Config, QuipuError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| QuipuError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| QuipuError::Config(format!("failed to parse config: {}", e)))?
    } else {
        tracing::info!("Config file not found at {}, using defaults", path.display());
        Config::default()
    };

    if config.rates.api_key.is_empty() {
        if let Ok(key) = std::env::var("FIXER_API_KEY") {
            config.rates.api_key = key;
        }
    }
    if config.twilio.auth_token.is_empty() {
        if let Ok(token) = std::env::var("TWILIO_AUTH_TOKEN") {
            config.twilio.auth_token = token;
        }
    }

    Ok(config)
}

//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Environment variables (`INFOGEN_*`)
//! 2. Config file (`~/.infogen/config.toml`)
//! 3. Defaults

use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Default chat-completion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.deepseek.com/chat/completions";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default history capacity.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Chat-completion API configuration.
    pub api: ApiConfig,

    /// History configuration.
    pub history: HistoryConfig,

    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Chat-completion API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint URL receiving the POST.
    pub endpoint: String,

    /// Model identifier sent in the request body.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Request a streamed (SSE) response.
    pub stream: bool,

    /// Whole-request timeout in seconds. Not applied to streamed requests.
    pub timeout_seconds: u64,

    /// Longest wait for the next chunk of a response, in seconds.
    pub read_timeout_seconds: u64,

    /// Bearer token. Usually supplied through `INFOGEN_API_KEY`.
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            stream: true,
            timeout_seconds: 120,
            read_timeout_seconds: 60,
            api_key: None,
        }
    }
}

impl ApiConfig {
    /// The configured API key, if present and non-blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

/// History configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum records kept; the oldest are evicted beyond this.
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_HISTORY,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the infogen home directory.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_home(),
        }
    }
}

/// Get the default infogen home directory.
fn default_home() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".infogen"), |h| h.join(".infogen"))
}

/// Get the infogen home directory.
///
/// Uses `INFOGEN_HOME` environment variable if set, otherwise `~/.infogen`.
#[must_use]
pub fn get_home() -> PathBuf {
    env::var("INFOGEN_HOME").map_or_else(|_| default_home(), PathBuf::from)
}

/// Load configuration with precedence: env vars → file → defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let config_path = get_config_path();
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path).map_err(Error::Storage)?;
        config = toml::from_str(&contents).map_err(|e| Error::Config(e.to_string()))?;
    }

    apply_env_overrides(&mut config, |key| env::var(key).ok());

    Ok(config)
}

/// Get the path to the config file.
fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("INFOGEN_CONFIG") {
        return PathBuf::from(path);
    }

    get_home().join("config.toml")
}

/// Apply environment variable overrides to config.
///
/// `lookup` is `std::env::var` in production; tests pass a map.
fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    // Credentials
    if let Some(key) = lookup("INFOGEN_API_KEY").or_else(|| lookup("DEEPSEEK_API_KEY")) {
        config.api.api_key = Some(key);
    }

    if let Some(endpoint) = lookup("INFOGEN_ENDPOINT") {
        config.api.endpoint = endpoint;
    }

    if let Some(model) = lookup("INFOGEN_MODEL") {
        config.api.model = model;
    }

    if let Some(val) = lookup("INFOGEN_TEMPERATURE") {
        if let Ok(temperature) = val.parse() {
            config.api.temperature = temperature;
        }
    }

    if let Some(val) = lookup("INFOGEN_STREAM") {
        config.api.stream = !matches!(val.to_lowercase().as_str(), "0" | "false" | "no" | "off");
    }

    // History
    if let Some(val) = lookup("INFOGEN_MAX_HISTORY") {
        if let Ok(max) = val.parse() {
            config.history.max_entries = max;
        }
    }

    // Storage path
    if let Some(path) = lookup("INFOGEN_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    } else if let Some(home) = lookup("INFOGEN_HOME") {
        config.storage.path = PathBuf::from(home);
    }
}

//! Configuration management for Syndicast

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "SYNDICAST_CONFIG";
/// Environment variable overriding `api.api_key`
pub const API_KEY_ENV: &str = "SYNDICAST_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub agent: AgentSettings,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Deadline for each JSON request to the API
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Deadline for one presigned media transfer
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .finish()
    }
}

/// Settings the agent host passes into every tool invocation.
///
/// These are read once by the host and handed to the pipeline explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSettings {
    /// When false, every tool call is refused
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Ask for y/N confirmation before publishing, scheduling or queueing
    #[serde(default = "enabled_by_default")]
    pub confirm_destructive_actions: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            confirm_destructive_actions: true,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_upload_timeout_secs() -> u64 {
    DEFAULT_UPLOAD_TIMEOUT_SECS
}

fn enabled_by_default() -> bool {
    true
}

impl ApiConfig {
    /// API key from `SYNDICAST_API_KEY`, falling back to the config file
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key.trim().to_string());
            }
        }

        self.api_key
            .as_ref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| key.trim().to_string())
            .ok_or_else(|| ConfigError::MissingField("api.api_key".to_string()).into())
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        if config.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("api.base_url".to_string()).into());
        }

        Ok(config)
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("syndicast").join("config.toml"))
}

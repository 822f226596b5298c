use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON5 parse error: {0}")]
    Json5(#[from] json5::Error),
    #[error("Config directory not found")]
    NoDirFound,
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Remote generative-AI service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenAiConfig {
    /// Model ID used for description calls.
    #[serde(default = "default_model")]
    pub model: String,
    /// Service base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Directory holding the fixed media files, relative to the process
    /// working directory unless absolute.
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,
    /// Seconds between status checks while an upload is processing.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Status checks before giving up on a processing upload.
    #[serde(default = "default_max_poll_checks")]
    pub max_poll_checks: u32,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("media")
}

fn default_poll_interval() -> u64 {
    10
}

fn default_max_poll_checks() -> u32 {
    60
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            media_dir: default_media_dir(),
            poll_interval_secs: default_poll_interval(),
            max_poll_checks: default_max_poll_checks(),
        }
    }
}

/// Top-level descry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescryConfig {
    /// HTTP server config.
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote service config.
    #[serde(default)]
    pub genai: GenAiConfig,
}

/// Resolve the descry config directory (~/.descry/).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|h| h.join(".descry"))
        .ok_or(ConfigError::NoDirFound)
}

/// Resolve the config file path (~/.descry/config.json5).
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.json5"))
}

/// Load configuration from the default path, falling back to defaults.
///
/// Loads `.env` first so the `PORT` and `GEMINI_API_KEY` variables can come
/// from a local env file.
pub fn load_config() -> Result<DescryConfig, ConfigError> {
    let _ = dotenvy::dotenv();

    let path = config_file_path()?;
    let mut config = load_config_from(&path)?;

    if let Some(port) = port_from_env(std::env::var("PORT").ok().as_deref()) {
        config.server.port = port;
    }
    Ok(config)
}

/// Load configuration from a specific path, falling back to defaults if not found.
pub fn load_config_from(path: &Path) -> Result<DescryConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("Config file not found at {}, using defaults", path.display());
        return Ok(DescryConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: DescryConfig = json5::from_str(&content)?;
    Ok(config)
}

/// The remote service credential. Environment-only, never persisted.
pub fn api_key() -> Result<String, ConfigError> {
    match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(ConfigError::MissingApiKey),
    }
}

fn port_from_env(value: Option<&str>) -> Option<u16> {
    let raw = value?;
    match raw.parse() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!("Ignoring unparseable PORT value: {raw}");
            None
        }
    }
}

use serde::Deserialize;
use std::path::Path;

/// Environment variable holding the Routes API key, overrides YAML
const API_KEY_ENV: &str = "GMAPS_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the server binds to
    #[serde(default = "Config::default_bind")]
    pub bind: String,
    /// Allowed CORS origins. Required unless cors_permissive is true.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Explicitly allow all origins (development only). Defaults to false.
    #[serde(default)]
    pub cors_permissive: bool,
    /// Routes API provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Configuration for the Routes API provider
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the Routes API (default: Google's production endpoint)
    #[serde(default = "ProviderConfig::default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "ProviderConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    /// API key; the GMAPS_API_KEY environment variable takes precedence
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
            api_key: None,
        }
    }
}

impl ProviderConfig {
    fn default_base_url() -> String {
        "https://routes.googleapis.com".to_string()
    }
    fn default_timeout_secs() -> u64 {
        30
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: Self::default_bind(),
            cors_origins: Vec::new(),
            cors_permissive: false,
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    fn default_bind() -> String {
        "0.0.0.0:8000".to_string()
    }

    /// Load configuration from a YAML file. A missing file degrades to the
    /// defaults so a dev setup works without any config at all.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Resolve the provider API key: environment first, then YAML.
    /// None is not an error; the server starts degraded and /health says so.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.provider.api_key.clone())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "igdb-client";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
pub const DEFAULT_API_BASE_URL: &str = "https://api.igdb.com/v4";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IGDB client id and secret must both be set")]
    MissingCredentials,
    #[error("Token safety margin of {0} seconds is out of range")]
    InvalidSafetyMargin(u64),
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Client configuration
///
/// Read once at process start. Everything except the credentials has a
/// default, so a config file only needs the fields it overrides.
#[derive(Clone, Serialize, Deserialize)]
pub struct IgdbConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_token_timeout")]
    pub token_timeout_secs: u64,
    /// Tokens are treated as expired this many seconds before their real expiry
    #[serde(default = "default_safety_margin")]
    pub token_safety_margin_secs: u64,
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_token_timeout() -> u64 {
    10
}

fn default_safety_margin() -> u64 {
    60
}

impl Default for IgdbConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            token_url: default_token_url(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout(),
            token_timeout_secs: default_token_timeout(),
            token_safety_margin_secs: default_safety_margin(),
        }
    }
}

impl IgdbConfig {
    /// Creates a config with the given credentials and default endpoints
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            ..Self::default()
        }
    }

    /// Loads the config file from the user config directory (if present),
    /// then applies `IGDB_*` environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_dir().map(|dir| dir.join(CONFIG_FILE));
        let mut config = Self::load_from(path.as_deref())?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Loads a config file, falling back to defaults when it doesn't exist
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path.filter(|p| p.exists()) else {
            return Ok(Self::default());
        };

        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overrides fields from `IGDB_*` variables resolved through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |target: &mut String, key: &str| {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *target = value;
            }
        };

        set(&mut self.client_id, "IGDB_CLIENT_ID");
        set(&mut self.client_secret, "IGDB_CLIENT_SECRET");
        set(&mut self.token_url, "IGDB_TOKEN_URL");
        set(&mut self.api_base_url, "IGDB_API_BASE_URL");
    }

    /// Returns the validated credentials
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        Ok(Credentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn token_timeout(&self) -> Duration {
        Duration::from_secs(self.token_timeout_secs)
    }

    pub fn safety_margin(&self) -> Result<chrono::Duration, ConfigError> {
        i64::try_from(self.token_safety_margin_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or(ConfigError::InvalidSafetyMargin(self.token_safety_margin_secs))
    }

    /// Returns the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME))
    }
}

impl std::fmt::Debug for IgdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IgdbConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_url", &self.token_url)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("token_timeout_secs", &self.token_timeout_secs)
            .field("token_safety_margin_secs", &self.token_safety_margin_secs)
            .finish()
    }
}

/// Twitch application credentials used for the client-credentials grant
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

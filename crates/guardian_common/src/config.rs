//! Configuration for the dashboard client.
//!
//! Resolution order: defaults, then the TOML config file, then environment
//! (`API_BASE_URL`, `POLL_INTERVAL_MS`, `API_KEY`). The CLI applies its own
//! flag overrides on top.

use crate::error::ConfigError;
use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Explicit config path override
pub const CONFIG_ENV: &str = "GUARDIAN_CONFIG";

pub const ENV_API_BASE_URL: &str = "API_BASE_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "POLL_INTERVAL_MS";
pub const ENV_API_KEY: &str = "API_KEY";

/// Dashboard client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardianConfig {
    /// Backend base URL, without trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Poll interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Sent as a bearer token when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Deadline for dashboard and acknowledge requests
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Deadline for health checks
    #[serde(default = "default_health_timeout_ms")]
    pub health_timeout_ms: u64,

    #[serde(default)]
    pub locale: Locale,

    /// Speak critical alerts aloud
    #[serde(default = "default_announce_critical")]
    pub announce_critical: bool,

    /// Program used for speech output
    #[serde(default = "default_speech_command")]
    pub speech_command: String,
}

fn default_api_base_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_fetch_timeout_ms() -> u64 {
    5_000
}

fn default_health_timeout_ms() -> u64 {
    3_000
}

fn default_announce_critical() -> bool {
    true
}

fn default_speech_command() -> String {
    "spd-say".to_string()
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            poll_interval_ms: default_poll_interval_ms(),
            api_key: None,
            fetch_timeout_ms: default_fetch_timeout_ms(),
            health_timeout_ms: default_health_timeout_ms(),
            locale: Locale::default(),
            announce_critical: default_announce_critical(),
            speech_command: default_speech_command(),
        }
    }
}

impl GuardianConfig {
    /// Load from file (explicit path or discovered) and the process environment.
    ///
    /// An explicit path (argument or `$GUARDIAN_CONFIG`) must exist. Only the
    /// default location may be missing.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.map(Path::to_path_buf).or_else(Self::env_path);

        let mut config = match explicit {
            Some(ref p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(ref p) if p.exists() => Self::from_file(p)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Config file location
    ///
    /// Priority:
    /// 1. $GUARDIAN_CONFIG
    /// 2. $XDG_CONFIG_HOME/factory-guardian/config.toml
    /// 3. ~/.config/factory-guardian/config.toml
    pub fn discover_path() -> Option<PathBuf> {
        Self::env_path().or_else(Self::default_path)
    }

    fn env_path() -> Option<PathBuf> {
        std::env::var(CONFIG_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("factory-guardian").join("config.toml"))
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.api_base_url = trim_base_url(&config.api_base_url);

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_API_BASE_URL) {
            self.api_base_url = trim_base_url(&url);
        }

        if let Some(raw) = non_empty(ENV_POLL_INTERVAL_MS) {
            let interval: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_POLL_INTERVAL_MS.to_string(),
                value: raw.clone(),
            })?;
            if interval == 0 {
                return Err(ConfigError::InvalidInterval);
            }
            self.poll_interval_ms = interval;
        }

        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = Some(key);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }
}

/// Strip whitespace and trailing slashes
pub fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

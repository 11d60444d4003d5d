//! Error types for Factory Guardian.

use thiserror::Error;

/// Why a dashboard fetch did not produce a snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API request failed: {0}")]
    BadStatus(u16),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Backend rejected request: {0}")]
    Rejected(String),
}

impl FetchError {
    /// Short stable label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Timeout => "timeout",
            FetchError::BadStatus(_) => "bad_status",
            FetchError::Decode(_) => "decode",
            FetchError::Rejected(_) => "rejected",
        }
    }
}

/// Why an alert acknowledgment failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AckError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Acknowledge failed: {0}")]
    BadStatus(u16),

    #[error("Invalid acknowledge URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Poll interval must be a positive number of milliseconds")]
    InvalidInterval,

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: String, value: String },
}

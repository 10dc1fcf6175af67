//! Configuration types and structures.

use serde::{Deserialize, Serialize};

/// Default Secret Manager REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com/v1/";

/// Secret store provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the Secret Manager API, ending in a versioned path segment
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// OAuth2 bearer token used for every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Project used to qualify bare secret names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            access_token: None,
            project: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level for this output
    #[serde(default = "default_log_level")]
    pub level: crate::LogLevel,
    /// Log format (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_level() -> crate::LogLevel {
    crate::LogLevel::Info
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format with colors
    Pretty,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

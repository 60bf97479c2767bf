//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the application shell.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ShellConfig {
    /// API client settings (base address, default headers).
    pub api: ApiConfig,

    /// Local key-value storage settings.
    pub storage: StorageConfig,

    /// Client-side router settings.
    pub router: RouterConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// API client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base address prefixed to every relative request path.
    pub base_url: String,

    /// Value of the default `Content-Type` header.
    pub content_type: String,

    /// Storage key the bearer token is read from.
    pub token_key: String,

    /// Total request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            content_type: "application/json".to_string(),
            token_key: "token".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Local storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the store. `None` keeps everything in memory.
    pub path: Option<String>,
}

/// Router configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// History base path stripped from every navigation path.
    pub base: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base: "/".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

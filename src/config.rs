use std::net::SocketAddr;

use serde::Serialize;
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Medibot";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Liveness probe budget for the local model server.
pub const PROBE_TIMEOUT_SECS: u64 = 5;
/// Budget for a single generation call on either backend.
pub const GENERATE_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "medllama2";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "medibot_lib=debug,medibot=debug,tower_http=debug"
    } else {
        "medibot_lib=info,medibot=info,tower_http=info"
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be an http(s) URL, got {1:?}")]
    InvalidUrl(&'static str, String),

    #[error("{0} must be a socket address, got {1:?}")]
    InvalidBindAddr(&'static str, String),
}

/// Runtime settings, read once at startup and passed explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct TriageConfig {
    #[serde(skip_serializing)]
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub bind_addr: SocketAddr,
}

impl TriageConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let gemini_base_url = checked_url("MEDIBOT_GEMINI_URL", get_or("MEDIBOT_GEMINI_URL", DEFAULT_GEMINI_URL))?;
        let ollama_base_url = checked_url("MEDIBOT_OLLAMA_URL", get_or("MEDIBOT_OLLAMA_URL", DEFAULT_OLLAMA_URL))?;
        if !is_loopback_url(&ollama_base_url) {
            tracing::warn!(url = %ollama_base_url, "Ollama URL is not a loopback address");
        }

        let raw_addr = get_or("MEDIBOT_BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr("MEDIBOT_BIND_ADDR", raw_addr.clone()))?;

        Ok(Self {
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get_or("MEDIBOT_GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_base_url,
            ollama_base_url,
            ollama_model: get_or("MEDIBOT_OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            bind_addr,
        })
    }

    pub fn has_cloud_credential(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}

fn checked_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value)
    } else {
        Err(ConfigError::InvalidUrl(var, value))
    }
}

fn is_loopback_url(url: &str) -> bool {
    let rest = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    if rest.starts_with("[::1]") {
        return true;
    }
    let host = rest.split(['/', ':']).next().unwrap_or_default();
    matches!(host, "localhost" | "127.0.0.1")
}

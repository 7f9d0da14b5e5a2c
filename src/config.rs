use std::env;

use thiserror::Error;

pub const APP_NAME: &str = "Advanced Dental X-Ray Analysis System";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "DENTASCAN_MODEL";
pub const ENDPOINT_VAR: &str = "DENTASCAN_ENDPOINT";
pub const TIMEOUT_VAR: &str = "DENTASCAN_TIMEOUT_SECS";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default `env_logger` filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Please provide an API key (or set GEMINI_API_KEY).")]
    MissingCredential,
}

/// Where and how the hosted model is reached. The credential is resolved
/// separately because it can change while the app is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub env_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            env_api_key: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let timeout_secs = match non_empty(TIMEOUT_VAR) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid {TIMEOUT_VAR}={raw}, using {DEFAULT_TIMEOUT_SECS}s");
                defaults.timeout_secs
            }),
            None => defaults.timeout_secs,
        };

        Self {
            model: non_empty(MODEL_VAR).unwrap_or(defaults.model),
            endpoint: non_empty(ENDPOINT_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.endpoint),
            timeout_secs,
            env_api_key: non_empty(API_KEY_VAR),
        }
    }

    /// Typed key wins over the environment.
    pub fn resolve_credential(&self, typed: &str) -> Result<String, ConfigError> {
        let typed = typed.trim();
        if !typed.is_empty() {
            return Ok(typed.to_string());
        }
        self.env_api_key
            .clone()
            .ok_or(ConfigError::MissingCredential)
    }
}

//! Settings structures for repo-scout configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Upper bound for `search.recency_days` (one century)
pub const MAX_RECENCY_DAYS: u32 = 36_500;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Main settings structure loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub search: SearchSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (REPO_SCOUT_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; `merge_env` feeds it the process environment
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("REPO_SCOUT_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("REPO_SCOUT_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("REPO_SCOUT_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("REPO_SCOUT_ENDPOINT") {
            self.search.endpoint = val;
        }
        if let Some(val) = lookup("REPO_SCOUT_LANGUAGE") {
            self.search.language = val;
        }
    }

    /// Check values the orchestrator cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.search.validate()
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the API
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "repo-scout".to_string(),
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Repository search endpoint
    pub endpoint: String,
    /// Results per page (`per_page`)
    pub page_size: u32,
    /// Language restriction added to every query
    pub language: String,
    /// Only repositories created within this many days are returned
    pub recency_days: u32,
    /// Sort metric, always ordered descending
    pub sort: String,
    /// Quiet period after the last query edit, in milliseconds
    pub debounce_ms: u64,
    /// Maximum number of results the API lets a client page through
    pub result_cap: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.github.com/search/repositories".to_string(),
            page_size: 20,
            language: "javascript".to_string(),
            recency_days: 30,
            sort: "stars".to_string(),
            debounce_ms: 500,
            result_cap: 1000,
        }
    }
}

impl SearchSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        if self.page_size == 0 || self.page_size > 100 {
            return Err(SettingsError::Invalid {
                field: "search.page_size",
                reason: format!("must be between 1 and 100, got {}", self.page_size),
            });
        }

        if self.recency_days > MAX_RECENCY_DAYS {
            return Err(SettingsError::Invalid {
                field: "search.recency_days",
                reason: format!(
                    "must be at most {}, got {}",
                    MAX_RECENCY_DAYS, self.recency_days
                ),
            });
        }

        match Url::parse(&self.endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(SettingsError::Invalid {
                    field: "search.endpoint",
                    reason: format!("unsupported scheme `{}`", url.scheme()),
                })
            }
            Err(e) => {
                return Err(SettingsError::Invalid {
                    field: "search.endpoint",
                    reason: e.to_string(),
                })
            }
        }

        if self.language.trim().is_empty() {
            return Err(SettingsError::Invalid {
                field: "search.language",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8888,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds (none = transport default)
    pub request_timeout: Option<f64>,
    /// User agent override (none = crate name and version)
    pub user_agent: Option<String>,
    /// Proxy settings
    pub proxies: ProxySettings,
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

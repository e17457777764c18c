//! Configuration handling for the relay credential and endpoint

use crate::relay::DEFAULT_ENDPOINT;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the relay access key
pub const ACCESS_KEY_ENV: &str = "WEB3FORMS_ACCESS_KEY";
/// Environment variable overriding the relay endpoint
pub const ENDPOINT_ENV: &str = "SEEKER_RELAY_ENDPOINT";
/// Value shipped in sample `.env` files; treated as "not configured"
pub const PLACEHOLDER_ACCESS_KEY: &str = "YOUR_API_KEY_HERE";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeekerConfig {
    /// Relay access key
    pub access_key: Option<String>,
    /// Relay endpoint (defaults to the public Web3Forms endpoint)
    pub relay_endpoint: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

impl SeekerConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("kr.co", "theseeker", "seeker-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: SeekerConfig = serde_json::from_str(&content)?;
                tracing::debug!(path = %path.display(), "Loaded config file");
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Resolve relay settings, environment variables taking precedence
    pub fn relay_settings(&self) -> RelaySettings {
        self.relay_settings_with(|name| std::env::var(name).ok())
    }

    /// Resolve relay settings using the given environment lookup
    pub fn relay_settings_with(&self, env: impl Fn(&str) -> Option<String>) -> RelaySettings {
        let access_key = env(ACCESS_KEY_ENV).or_else(|| self.access_key.clone());
        let endpoint = env(ENDPOINT_ENV)
            .or_else(|| self.relay_endpoint.clone())
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let request_timeout = self
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        RelaySettings {
            endpoint,
            access_key: AccessKey::parse(access_key),
            request_timeout,
        }
    }
}

/// Relay access credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKey(String);

impl AccessKey {
    /// Accept a raw credential unless it is missing, blank or the placeholder
    pub fn parse(raw: Option<String>) -> Option<Self> {
        let raw = raw?.trim().to_string();
        if raw.is_empty() || raw == PLACEHOLDER_ACCESS_KEY {
            return None;
        }
        Some(Self(raw))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessKey(***)")
    }
}

/// Resolved relay settings passed to the client and the pipeline
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub endpoint: String,
    pub access_key: Option<AccessKey>,
    pub request_timeout: Duration,
}

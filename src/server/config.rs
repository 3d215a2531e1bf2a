//! Configuration loading for mimird.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.mimir/config.toml` (user)
//! 3. `/etc/mimir/config.toml` (system)
//!
//! When no file exists the built-in defaults are used. The origin host may
//! also come from the `MIMIR_ORIGIN_HOST` environment variable; without
//! one, mimird still starts and answers every request with a 500.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::StoreConfig;
use crate::{Mimir, MimirBuilder, MimirError, Result};

/// Environment variable consulted when `[origin] host` is unset.
pub const ORIGIN_HOST_ENV: &str = "MIMIR_ORIGIN_HOST";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub origin: OriginConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8787).
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            limits: LimitsConfig::default(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8787".to_string()
}

/// Resource limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Whole-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
        }
    }
}

impl LimitsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_timeout() -> u64 {
    30
}

/// Origin bucket configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OriginConfig {
    /// Bucket host, optionally with a port.
    #[serde(default)]
    pub host: Option<String>,
    /// Scheme used to reach the bucket (default: https).
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Per origin request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            host: None,
            scheme: default_scheme(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_scheme() -> String {
    "https".to_string()
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; must exist)
    /// 2. `~/.mimir/config.toml`
    /// 3. `/etc/mimir/config.toml`
    /// 4. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit_path)? else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MimirError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".mimir").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/mimir/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Origin host from the config file, falling back to `MIMIR_ORIGIN_HOST`.
    pub fn origin_host(&self) -> Option<String> {
        resolve_origin_host(self.origin.host.as_deref(), std::env::var(ORIGIN_HOST_ENV).ok())
    }

    /// A builder carrying this configuration.
    pub fn builder(&self) -> MimirBuilder {
        Mimir::builder()
            .maybe_origin_host(self.origin_host())
            .origin_scheme(&self.origin.scheme)
            .timeout(Duration::from_secs(self.origin.timeout_secs))
            .store_config(self.store.clone())
    }
}

fn resolve_origin_host(configured: Option<&str>, from_env: Option<String>) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_owned)
        .or_else(|| from_env.filter(|h| !h.trim().is_empty()))
}

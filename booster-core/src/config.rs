//! Configuration for the Booster engine

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BoosterError, Result};
use crate::storage::{FileStore, InMemoryStore, KeyValueStore, NullStore};

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoosterConfig {
    /// Analysis cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Analysis provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl BoosterConfig {
    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let load_error = |reason: String| BoosterError::ConfigLoadError {
            path: path.display().to_string(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| load_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_seconds == 0 {
            return Err(BoosterError::InvalidConfig {
                reason: "cache.ttl_seconds must be greater than zero".to_string(),
            });
        }
        if self.cache.backend == CacheBackendType::File && self.cache.directory.is_none() {
            return Err(BoosterError::InvalidConfig {
                reason: "cache.directory is required for the file backend".to_string(),
            });
        }
        if self.provider.model.trim().is_empty() {
            return Err(BoosterError::InvalidConfig {
                reason: "provider.model must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn default_true() -> bool { true }

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Record lifetime in seconds
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,

    /// Cache backend type
    #[serde(default)]
    pub backend: CacheBackendType,

    /// Directory for the file backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

fn default_ttl() -> u64 { 24 * 60 * 60 }

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: default_ttl(),
            backend: CacheBackendType::Memory,
            directory: None,
        }
    }
}

impl CacheConfig {
    /// Enabled file-backed cache rooted at `directory`, default TTL
    pub fn file(directory: impl Into<PathBuf>) -> Self {
        Self {
            backend: CacheBackendType::File,
            directory: Some(directory.into()),
            ..Self::default()
        }
    }

    /// Record lifetime
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Build the configured store; a disabled cache gets a `NullStore`
    pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>> {
        if !self.enabled {
            return Ok(Arc::new(NullStore::new()));
        }

        match self.backend {
            CacheBackendType::Memory => Ok(Arc::new(InMemoryStore::new())),
            CacheBackendType::File => {
                let directory = self.directory.clone().ok_or_else(|| BoosterError::InvalidConfig {
                    reason: "cache.directory is required for the file backend".to_string(),
                })?;
                Ok(Arc::new(FileStore::new(directory)?))
            }
        }
    }
}

/// Cache backend type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendType {
    #[default]
    Memory,
    File,
}

/// Analysis provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// REST API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_model() -> String { "gemini-2.0-flash".to_string() }
fn default_endpoint() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_api_key_env() -> String { "GEMINI_API_KEY".to_string() }
fn default_timeout() -> u64 { 30000 }

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            timeout_ms: default_timeout(),
        }
    }
}

impl ProviderConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

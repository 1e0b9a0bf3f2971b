//! CLI configuration
//!
//! Each `booster` invocation is a fresh process, so an in-memory cache could
//! never hit. Unless a config file picks `cache.backend` explicitly, the CLI
//! keeps analyses in a file store under the cache directory:
//!
//! 1. `$BOOSTER_CACHE_DIR`, when set
//! 2. the platform cache directory, e.g. `~/.cache/booster`
//! 3. `.booster-cache` in the working directory

use std::path::{Path, PathBuf};

use booster_core::{BoosterConfig, BoosterError, CacheBackendType, CacheConfig, Result};
use serde_json::Value;

/// Environment variable overriding the cache directory
pub const CACHE_DIR_ENV: &str = "BOOSTER_CACHE_DIR";

/// Cache directory used when no platform cache directory exists
pub const FALLBACK_CACHE_DIR: &str = ".booster-cache";

/// Directory holding the CLI's cached analyses
pub fn default_cache_dir() -> PathBuf {
    match std::env::var(CACHE_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => dirs::cache_dir()
            .map(|dir| dir.join("booster"))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR)),
    }
}

/// Configuration used without a config file
pub fn default_config() -> BoosterConfig {
    BoosterConfig {
        cache: CacheConfig::file(default_cache_dir()),
        ..BoosterConfig::default()
    }
}

/// Load the CLI configuration
///
/// A config file that leaves `cache.backend` unset gets the file backend,
/// with `cache.directory` defaulting to [`default_cache_dir`].
pub fn load_config(path: Option<&Path>) -> Result<BoosterConfig> {
    let Some(path) = path else {
        return Ok(default_config());
    };

    let load_error = |reason: String| BoosterError::ConfigLoadError {
        path: path.display().to_string(),
        reason,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| load_error(e.to_string()))?;
    let backend_chosen = value.pointer("/cache/backend").is_some();

    let mut config: BoosterConfig =
        serde_json::from_value(value).map_err(|e| load_error(e.to_string()))?;
    if !backend_chosen {
        config.cache.backend = CacheBackendType::File;
        config.cache.directory.get_or_insert_with(default_cache_dir);
    }

    config.validate()?;
    tracing::debug!(
        path = %path.display(),
        backend = ?config.cache.backend,
        directory = ?config.cache.directory,
        "configuration loaded"
    );
    Ok(config)
}

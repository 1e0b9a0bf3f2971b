//! Pluggable key-value storage
//!
//! The analysis cache persists its records through [`KeyValueStore`], a
//! minimal byte-oriented interface: read, write, delete. No range queries and
//! no transactions. The default is in-memory storage; [`FileStore`] keeps one
//! file per key so cached analyses survive restarts.
//!
//! # Example
//!
//! ```rust
//! use booster_core::storage::{InMemoryStore, KeyValueStore};
//!
//! let store = InMemoryStore::new();
//! store.write("analysis_22AI101", b"{}").unwrap();
//! assert_eq!(store.read("analysis_22AI101").unwrap(), Some(b"{}".to_vec()));
//! ```

mod file;

pub use file::FileStore;

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{BoosterError, Result};

/// Byte-oriented key-value persistence
///
/// All methods take `&self` so backends can be shared behind `Arc`.
pub trait KeyValueStore: Send + Sync {
    /// Read the bytes stored under `key`
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    fn write(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn delete(&self, key: &str) -> Result<()>;

    /// Backend name (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// In-memory storage backend (default)
///
/// Values are lost on restart. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is present, regardless of what its bytes contain
    pub fn contains(&self, key: &str) -> bool {
        self.values
            .read()
            .map(|v| v.contains_key(key))
            .unwrap_or(false)
    }

    /// Remove every stored value
    pub fn clear(&self) {
        if let Ok(mut values) = self.values.write() {
            values.clear();
        }
    }
}

impl KeyValueStore for InMemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let values = self.values.read().map_err(|_| BoosterError::StorageLocked)?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut values = self.values.write().map_err(|_| BoosterError::StorageLocked)?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| BoosterError::StorageLocked)?;
        values.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

/// Null storage backend (discards all values)
///
/// Used when caching is disabled: every lookup misses.
#[derive(Debug, Default, Clone)]
pub struct NullStore;

impl NullStore {
    pub fn new() -> Self {
        Self
    }
}

impl KeyValueStore for NullStore {
    fn read(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &[u8]) -> Result<()> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

//! File-based storage backend
//!
//! One file per key. File names are the SHA-256 of the key, so owner ids
//! containing path separators or other unsafe characters never reach the
//! filesystem.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use super::KeyValueStore;
use crate::error::{BoosterError, Result};

/// Directory of `<sha256(key)>.entry` files
#[derive(Debug)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `directory`, creating it if needed
    pub fn new<P: Into<PathBuf>>(directory: P) -> Result<Self> {
        let dir = directory.into();
        fs::create_dir_all(&dir).map_err(|e| BoosterError::IoError {
            message: format!("Failed to create storage directory {}: {}", dir.display(), e),
        })?;
        Ok(Self { directory: dir })
    }

    /// Directory holding the entry files
    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.directory
            .join(format!("{}.entry", hex::encode(hasher.finalize())))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.entry_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BoosterError::IoError {
                message: format!("Failed to read entry '{}': {}", key, e),
            }),
        }
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        // Write to a sibling file first so readers never see half an entry
        let path = self.entry_path(key);
        let staging = path.with_extension("tmp");

        fs::write(&staging, value).map_err(|e| BoosterError::IoError {
            message: format!("Failed to write entry '{}': {}", key, e),
        })?;
        fs::rename(&staging, &path).map_err(|e| BoosterError::IoError {
            message: format!("Failed to commit entry '{}': {}", key, e),
        })?;

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BoosterError::IoError {
                message: format!("Failed to delete entry '{}': {}", key, e),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

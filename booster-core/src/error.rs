//! Error types for Booster operations
//!
//! Only the ambient surfaces raise errors: configuration loading, storage
//! backends, record validation and transcript export. The aggregation and
//! analysis paths are total and degrade instead of failing (zero metrics,
//! degraded cache keys, cache misses, fallback analyses).
//!
//! Each variant has a stable error code (e.g. `STORAGE_LOCKED`) that can be
//! used for logging and for mapping to user-facing messages.
//!
//! # Example
//!
//! ```rust
//! use booster_core::error::{BoosterError, ErrorCategory};
//!
//! let err = BoosterError::InvalidEntry { reason: "score exceeds maxScore".to_string() };
//! assert_eq!(err.error_code(), "INVALID_ENTRY");
//! assert_eq!(err.category(), ErrorCategory::Validation);
//! assert!(!err.is_recoverable());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Booster operations
pub type Result<T> = std::result::Result<T, BoosterError>;

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Input validation failed
    Validation,
    /// Configuration could not be loaded or is inconsistent
    Configuration,
    /// Internal state problem (poisoned locks)
    Internal,
    /// External resource failed (filesystem, JSON, CSV)
    External,
}

/// Errors that can occur in Booster operations
#[derive(Error, Debug)]
pub enum BoosterError {
    // ═══════════════════════════════════════════════════════════════════════
    // Record errors
    // ═══════════════════════════════════════════════════════════════════════

    /// A score entry violates the record invariants
    #[error("Invalid score entry: {reason}")]
    InvalidEntry { reason: String },

    /// A subject definition is malformed
    #[error("Invalid subject '{subject}': {reason}")]
    InvalidSubject { subject: String, reason: String },

    /// Transcript export was requested for an empty record set
    #[error("No transcript data to export for '{owner_id}'")]
    EmptyTranscript { owner_id: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Configuration errors
    // ═══════════════════════════════════════════════════════════════════════

    /// Configuration file could not be read or parsed
    #[error("Failed to load configuration from '{path}': {reason}")]
    ConfigLoadError { path: String, reason: String },

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Storage and I/O errors
    // ═══════════════════════════════════════════════════════════════════════

    /// Storage lock poisoned
    #[error("Storage lock poisoned. A writer panicked while holding the lock.")]
    StorageLocked,

    /// I/O error from a storage backend or export target
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl BoosterError {
    /// Returns true if retrying the same operation may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BoosterError::StorageLocked | BoosterError::IoError { .. })
    }

    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            BoosterError::InvalidEntry { .. }
            | BoosterError::InvalidSubject { .. }
            | BoosterError::EmptyTranscript { .. } => ErrorCategory::Validation,

            BoosterError::ConfigLoadError { .. }
            | BoosterError::InvalidConfig { .. } => ErrorCategory::Configuration,

            BoosterError::StorageLocked => ErrorCategory::Internal,

            BoosterError::IoError { .. }
            | BoosterError::JsonError(_)
            | BoosterError::CsvError(_) => ErrorCategory::External,
        }
    }

    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BoosterError::InvalidEntry { .. } => "INVALID_ENTRY",
            BoosterError::InvalidSubject { .. } => "INVALID_SUBJECT",
            BoosterError::EmptyTranscript { .. } => "EMPTY_TRANSCRIPT",
            BoosterError::ConfigLoadError { .. } => "CONFIG_LOAD_ERROR",
            BoosterError::InvalidConfig { .. } => "INVALID_CONFIG",
            BoosterError::StorageLocked => "STORAGE_LOCKED",
            BoosterError::IoError { .. } => "IO_ERROR",
            BoosterError::JsonError(_) => "JSON_ERROR",
            BoosterError::CsvError(_) => "CSV_ERROR",
        }
    }
}

impl From<std::io::Error> for BoosterError {
    fn from(err: std::io::Error) -> Self {
        BoosterError::IoError {
            message: err.to_string(),
        }
    }
}

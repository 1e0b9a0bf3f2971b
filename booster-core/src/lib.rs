//! # Booster Core - academic performance aggregation
//!
//! Booster turns a student's assessment records into dashboard metrics and
//! memoizes expensive generative analyses of those records:
//!
//! - **Metrics**: credit-weighted pointer, average percentage, latest trend
//!   delta and credit completion ratio, recomputed from the records on every
//!   call
//! - **Fingerprints**: deterministic cache keys derived from record content
//! - **Analysis cache**: TTL-bound records in a pluggable key-value store,
//!   expired lazily on read
//! - **Orchestration**: cache first, provider on miss or forced refresh,
//!   fixed fallback when the provider fails
//!
//! ## Data flow
//!
//! ```text
//! records ──► metrics ──► DerivedMetrics
//!    │
//!    └──► fingerprint ──► key ──► AnalysisCache ──hit──► AnalysisResult
//!                                     │ miss / force
//!                                     ▼
//!                              AnalysisProvider ──ok──► cache.put ──► AnalysisResult
//!                                     │ err
//!                                     └──► fallback (not cached)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use booster_core::{compute_metrics, AssessmentKind, ScoreEntry, Subject};
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
//! let entries = vec![
//!     ScoreEntry::new("22AI101", "Maths", AssessmentKind::InternalAssessment1, 19.0, 20.0, date, 4.0),
//!     ScoreEntry::new("22AI101", "AOA", AssessmentKind::InternalAssessment1, 18.0, 20.0, date, 3.0),
//! ];
//! let subjects = vec![
//!     Subject::new("maths4", "Maths", "CSC401", 4.0),
//!     Subject::new("aoa", "AOA", "CSC402", 3.0),
//! ];
//!
//! let metrics = compute_metrics(&entries, &subjects);
//! assert_eq!(metrics.pointer, 9.29);
//! assert_eq!(metrics.average_percentage, 93);
//! assert_eq!(metrics.credit_completion_ratio, 1.0);
//! ```

pub mod analysis;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod metrics;
pub mod orchestrator;
pub mod provider;
pub mod record;
pub mod storage;
pub mod transcript;

pub use analysis::AnalysisResult;
pub use cache::{AnalysisCache, CacheRecord, CacheStats, DEFAULT_ANALYSIS_TTL};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BoosterConfig, CacheBackendType, CacheConfig, ProviderConfig};
pub use error::{BoosterError, ErrorCategory, Result};
pub use fingerprint::derive_key;
pub use metrics::{compute_metrics, DerivedMetrics, PerformanceBand, Stability, SubjectAverage};
pub use orchestrator::{AnalysisOrchestrator, AnalysisSource, ServedAnalysis};
pub use provider::{AnalysisProvider, ProviderError, UnconfiguredProvider};
pub use record::{AssessmentKind, ScoreEntry, Subject};
pub use storage::{FileStore, InMemoryStore, KeyValueStore, NullStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

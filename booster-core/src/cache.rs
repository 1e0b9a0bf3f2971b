//! Analysis cache
//!
//! Memoizes provider analyses in a [`KeyValueStore`] under content-derived
//! keys (see [`crate::fingerprint`]). Records carry the time they were
//! stored; a record older than the TTL is purged the next time it is read.
//! There is no background sweeper.
//!
//! Both `get` and `put` are total. Unreadable, corrupt or mismatched records
//! are deleted and reported as misses; write failures are logged and
//! swallowed. A broken cache only costs an extra provider call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::clock::{Clock, SystemClock};
use crate::storage::KeyValueStore;

/// Default record lifetime (24 hours)
pub const DEFAULT_ANALYSIS_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A stored analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    /// Key the record was stored under
    pub key: String,
    /// Storage time in milliseconds since the Unix epoch
    pub stored_at_epoch_millis: i64,
    /// The cached analysis
    pub payload: AnalysisResult,
}

impl CacheRecord {
    /// Storage time, if the stamp is representable
    pub fn stored_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.stored_at_epoch_millis)
    }

    fn age_millis_at(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp_millis().saturating_sub(self.stored_at_epoch_millis)
    }

    /// Age of the record at `now`; negative for stamps in the future
    pub fn age_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        // Duration::milliseconds rejects i64::MIN
        chrono::Duration::milliseconds(self.age_millis_at(now).max(-i64::MAX))
    }

    /// Whether the record has outlived `ttl` at `now`
    ///
    /// A stamp later than `now` cannot be trusted and counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let age = self.age_millis_at(now);
        age < 0 || age > ttl_ms
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups served from the store
    pub hits: u64,
    /// Lookups that found nothing usable
    pub misses: u64,
    /// Records purged for exceeding the TTL
    pub expirations: u64,
    /// Records purged because they could not be decoded
    pub corrupt_entries: u64,
    /// Successful writes
    pub writes: u64,
    /// Writes the store rejected
    pub write_failures: u64,
    /// Hit rate (0.0 - 1.0)
    pub hit_rate: f64,
}

/// Analysis cache over a key-value store
pub struct AnalysisCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,

    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    corrupt_entries: AtomicU64,
    writes: AtomicU64,
    write_failures: AtomicU64,
}

impl AnalysisCache {
    /// Create a cache with the default TTL and the system clock
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            ttl: DEFAULT_ANALYSIS_TTL,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
            corrupt_entries: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    /// Set the record lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Record lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current time according to the cache's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Look up a live record
    ///
    /// Expired and corrupt records are deleted and reported absent.
    pub fn get(&self, key: &str) -> Option<CacheRecord> {
        let bytes = match self.store.read(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return self.miss(key),
            Err(err) => {
                tracing::warn!(key, backend = self.store.name(), error = %err, "cache read failed");
                return self.miss(key);
            }
        };

        let record = match serde_json::from_slice::<CacheRecord>(&bytes) {
            Ok(record) if record.key == key => record,
            Ok(record) => {
                tracing::warn!(key, stored_key = %record.key, "cache record key mismatch, purging");
                self.corrupt_entries.fetch_add(1, Ordering::Relaxed);
                self.purge(key);
                return self.miss(key);
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "corrupt cache record, purging");
                self.corrupt_entries.fetch_add(1, Ordering::Relaxed);
                self.purge(key);
                return self.miss(key);
            }
        };

        if record.is_expired_at(self.clock.now(), self.ttl) {
            tracing::debug!(key, "cache record expired, purging");
            self.expirations.fetch_add(1, Ordering::Relaxed);
            self.purge(key);
            return self.miss(key);
        }

        tracing::debug!(key, "analysis cache hit");
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(record)
    }

    /// Store `payload` under `key`, stamped with the current time
    ///
    /// Overwrites any previous record unconditionally.
    pub fn put(&self, key: &str, payload: &AnalysisResult) {
        let record = CacheRecord {
            key: key.to_string(),
            stored_at_epoch_millis: self.clock.now().timestamp_millis(),
            payload: payload.clone(),
        };

        let bytes = match serde_json::to_vec(&record) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key, error = %err, "could not encode cache record");
                self.write_failures.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        match self.store.write(key, &bytes) {
            Ok(()) => {
                self.writes.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                tracing::warn!(key, backend = self.store.name(), error = %err, "cache write failed");
                self.write_failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Drop the record stored under `key`
    pub fn invalidate(&self, key: &str) {
        self.purge(key);
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStats {
            hits,
            misses,
            expirations: self.expirations.load(Ordering::Relaxed),
            corrupt_entries: self.corrupt_entries.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            hit_rate: if total > 0 { hits as f64 / total as f64 } else { 0.0 },
        }
    }

    fn miss(&self, key: &str) -> Option<CacheRecord> {
        tracing::debug!(key, "analysis cache miss");
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn purge(&self, key: &str) {
        if let Err(err) = self.store.delete(key) {
            tracing::warn!(key, backend = self.store.name(), error = %err, "cache delete failed");
        }
    }
}

impl std::fmt::Debug for AnalysisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisCache")
            .field("backend", &self.store.name())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::InMemoryStore;

    #[test]
    fn test_expiry_is_strictly_greater_than_ttl() {
        let now = Utc::now();
        let record = CacheRecord {
            key: "k".to_string(),
            stored_at_epoch_millis: now.timestamp_millis() - 1_000,
            payload: AnalysisResult::fallback(),
        };

        assert!(!record.is_expired_at(now, Duration::from_millis(1_000)));
        assert!(record.is_expired_at(now, Duration::from_millis(999)));
        assert_eq!(record.age_at(now), chrono::Duration::seconds(1));
    }

    #[test]
    fn test_future_stamp_is_expired() {
        let now = Utc::now();
        let record = CacheRecord {
            key: "k".to_string(),
            stored_at_epoch_millis: now.timestamp_millis() + 60_000,
            payload: AnalysisResult::fallback(),
        };

        assert!(record.is_expired_at(now, DEFAULT_ANALYSIS_TTL));
        assert_eq!(record.age_at(now), chrono::Duration::seconds(-60));
    }

    #[test]
    fn test_future_stamp_in_store_is_purged() {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(ManualClock::starting_now());
        let cache = AnalysisCache::new(store.clone()).with_clock(clock.clone());

        cache.put("k", &AnalysisResult::fallback());
        clock.advance(chrono::Duration::minutes(-10));

        assert!(cache.get("k").is_none());
        assert!(!store.contains("k"));
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_extreme_stamps_do_not_overflow() {
        let now = Utc::now();
        let ancient = CacheRecord {
            key: "k".to_string(),
            stored_at_epoch_millis: i64::MIN,
            payload: AnalysisResult::fallback(),
        };
        let distant = CacheRecord {
            stored_at_epoch_millis: i64::MAX,
            ..ancient.clone()
        };

        assert!(ancient.is_expired_at(now, DEFAULT_ANALYSIS_TTL));
        assert!(ancient.age_at(now) > chrono::Duration::days(365));
        assert!(distant.is_expired_at(now, DEFAULT_ANALYSIS_TTL));
        assert!(distant.age_at(now) < chrono::Duration::zero());
    }

    #[test]
    fn test_key_mismatch_is_purged() {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(ManualClock::starting_now());
        let cache = AnalysisCache::new(store.clone()).with_clock(clock);

        cache.put("analysis_a", &AnalysisResult::fallback());
        let bytes = store.read("analysis_a").unwrap().unwrap();
        store.write("analysis_b", &bytes).unwrap();

        assert!(cache.get("analysis_b").is_none());
        assert!(!store.contains("analysis_b"));
        assert!(cache.get("analysis_a").is_some());
        assert_eq!(cache.stats().corrupt_entries, 1);
    }
}

//! Analysis orchestration
//!
//! Decides, per call, whether a student's analysis comes from the cache, from
//! a fresh provider call, or from the fixed fallback:
//!
//! ```text
//! Idle ─► Requesting ─┬─► Served-From-Cache
//!                     ├─► Served-Fresh      (cache updated)
//!                     └─► Served-Fallback   (cache untouched)
//! ```
//!
//! Every call ends in one of the three terminal states; nothing is carried
//! between calls. The orchestrator does not serialize overlapping calls: two
//! concurrent requests for the same key both reach the provider and the last
//! successful write wins. Provider failures are not retried; asking again is
//! the caller's decision.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::cache::AnalysisCache;
use crate::config::BoosterConfig;
use crate::error::Result;
use crate::fingerprint::derive_key;
use crate::provider::{AnalysisProvider, ProviderError};
use crate::record::ScoreEntry;

/// Where a served analysis came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Live record found in the cache
    Cache,
    /// Fresh provider result, now cached
    Fresh,
    /// Provider failed; fixed payload, not cached
    Fallback,
}

/// An analysis handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServedAnalysis {
    /// Cache key of the record set
    pub key: String,
    /// Terminal state of the call
    pub source: AnalysisSource,
    /// When the served record was cached (cache hits only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<DateTime<Utc>>,
    /// The analysis
    pub result: AnalysisResult,
}

impl ServedAnalysis {
    /// Whether the analysis was served from the cache
    pub fn is_cached(&self) -> bool {
        self.source == AnalysisSource::Cache
    }

    /// Whether the fallback payload was served
    pub fn is_fallback(&self) -> bool {
        self.source == AnalysisSource::Fallback
    }

    /// Minutes since the record was cached, rounded to the nearest minute
    /// (halves round up), for "cached 5m ago" labels
    pub fn cached_minutes_ago(&self, now: DateTime<Utc>) -> Option<i64> {
        self.cached_at.map(|at| {
            let elapsed_ms = now.timestamp_millis().saturating_sub(at.timestamp_millis());
            ((elapsed_ms as f64 / 60_000.0 + 0.5).floor() as i64).max(0)
        })
    }

    /// Drop the metadata and keep the analysis
    pub fn into_result(self) -> AnalysisResult {
        self.result
    }
}

/// Serves analyses from the cache or the provider
pub struct AnalysisOrchestrator {
    cache: Arc<AnalysisCache>,
    provider: Arc<dyn AnalysisProvider>,
}

impl AnalysisOrchestrator {
    /// Create an orchestrator over an existing cache
    pub fn new(cache: Arc<AnalysisCache>, provider: Arc<dyn AnalysisProvider>) -> Self {
        Self { cache, provider }
    }

    /// Build the configured cache and wrap `provider`
    pub fn from_config(config: &BoosterConfig, provider: Arc<dyn AnalysisProvider>) -> Result<Self> {
        config.validate()?;
        let store = config.cache.open_store()?;
        let cache = AnalysisCache::new(store).with_ttl(config.cache.ttl());
        Ok(Self::new(Arc::new(cache), provider))
    }

    /// The underlying cache
    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Cache-only lookup; never calls the provider
    pub fn peek_cached(&self, owner_id: &str, entries: &[ScoreEntry]) -> Option<ServedAnalysis> {
        if entries.is_empty() {
            return None;
        }

        let key = derive_key(owner_id, entries);
        self.cache.get(&key).map(|record| ServedAnalysis {
            cached_at: record.stored_at(),
            source: AnalysisSource::Cache,
            result: record.payload,
            key,
        })
    }

    /// Obtain an analysis for `owner_id`'s records
    ///
    /// Returns `None` for an empty record set without touching the cache or
    /// the provider. With `force_refresh` the cache is bypassed for reading
    /// but still updated on success.
    pub async fn obtain_analysis(
        &self,
        owner_id: &str,
        entries: &[ScoreEntry],
        display_name: &str,
        force_refresh: bool,
    ) -> Option<ServedAnalysis> {
        if entries.is_empty() {
            return None;
        }

        let key = derive_key(owner_id, entries);

        if !force_refresh {
            if let Some(record) = self.cache.get(&key) {
                return Some(ServedAnalysis {
                    cached_at: record.stored_at(),
                    source: AnalysisSource::Cache,
                    result: record.payload,
                    key,
                });
            }
        }

        tracing::info!(
            owner_id,
            key = %key,
            provider = self.provider.name(),
            force_refresh,
            "requesting fresh analysis"
        );

        match self.provider.analyze(entries, display_name).await {
            Ok(result) => {
                self.cache.put(&key, &result);
                Some(ServedAnalysis {
                    key,
                    source: AnalysisSource::Fresh,
                    cached_at: None,
                    result,
                })
            }
            Err(err) => {
                let result = match &err {
                    ProviderError::QuotaExhausted(_) => {
                        tracing::warn!(
                            owner_id,
                            "provider quota exceeded or rate-limited, serving fallback analysis"
                        );
                        AnalysisResult::fallback()
                    }
                    ProviderError::NotConfigured(_) => {
                        tracing::warn!(owner_id, error = %err, "provider not configured");
                        AnalysisResult::unconfigured()
                    }
                    ProviderError::Transport(_) | ProviderError::InvalidResponse(_) => {
                        tracing::error!(owner_id, error = %err, "provider analysis failed");
                        AnalysisResult::fallback()
                    }
                };

                Some(ServedAnalysis {
                    key,
                    source: AnalysisSource::Fallback,
                    cached_at: None,
                    result,
                })
            }
        }
    }
}

impl std::fmt::Debug for AnalysisOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisOrchestrator")
            .field("cache", &self.cache)
            .field("provider", &self.provider.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn served_at(cached_at: DateTime<Utc>) -> ServedAnalysis {
        ServedAnalysis {
            key: "analysis_22AI101_00ff".to_string(),
            source: AnalysisSource::Cache,
            cached_at: Some(cached_at),
            result: AnalysisResult::fallback(),
        }
    }

    #[test]
    fn test_cached_minutes_round_to_nearest() {
        let cached_at = Utc::now();
        let served = served_at(cached_at);

        assert_eq!(served.cached_minutes_ago(cached_at + Duration::seconds(29)), Some(0));
        assert_eq!(served.cached_minutes_ago(cached_at + Duration::seconds(30)), Some(1));
        assert_eq!(served.cached_minutes_ago(cached_at + Duration::seconds(89)), Some(1));
        assert_eq!(served.cached_minutes_ago(cached_at + Duration::seconds(90)), Some(2));
        assert_eq!(served.cached_minutes_ago(cached_at + Duration::minutes(5)), Some(5));
    }

    #[test]
    fn test_cached_minutes_never_negative() {
        let cached_at = Utc::now();
        let served = served_at(cached_at);

        assert_eq!(served.cached_minutes_ago(cached_at - Duration::minutes(3)), Some(0));

        let fresh = ServedAnalysis {
            source: AnalysisSource::Fresh,
            cached_at: None,
            ..served
        };
        assert_eq!(fresh.cached_minutes_ago(cached_at), None);
    }
}

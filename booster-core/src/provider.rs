//! Analysis provider interface
//!
//! The generative analysis service is an external collaborator. The engine
//! only knows this request/response contract: given a student's records and
//! display name, produce an [`AnalysisResult`] or fail.

use async_trait::async_trait;
use thiserror::Error;

use crate::analysis::AnalysisResult;
use crate::record::ScoreEntry;

/// Why the provider could not produce an analysis
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Quota exhausted or rate limited
    #[error("Provider quota exhausted: {0}")]
    QuotaExhausted(String),

    /// No credentials configured
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Network or HTTP failure
    #[error("Provider transport error: {0}")]
    Transport(String),

    /// Response did not match the expected schema
    #[error("Provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether this failure comes from quota or rate limits
    pub fn is_quota(&self) -> bool {
        matches!(self, ProviderError::QuotaExhausted(_))
    }
}

/// Generative analysis service
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Provider name (for logging/debugging)
    fn name(&self) -> &str;

    /// Analyze `entries` for the student called `display_name`
    async fn analyze(
        &self,
        entries: &[ScoreEntry],
        display_name: &str,
    ) -> Result<AnalysisResult, ProviderError>;
}

/// Provider used when no credentials are available
///
/// Always fails with [`ProviderError::NotConfigured`].
#[derive(Debug, Default, Clone)]
pub struct UnconfiguredProvider {
    hint: String,
}

impl UnconfiguredProvider {
    pub fn new(hint: impl Into<String>) -> Self {
        Self { hint: hint.into() }
    }
}

#[async_trait]
impl AnalysisProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn analyze(
        &self,
        _entries: &[ScoreEntry],
        _display_name: &str,
    ) -> Result<AnalysisResult, ProviderError> {
        Err(ProviderError::NotConfigured(self.hint.clone()))
    }
}

//! The `analyze` command
//!
//! Every call builds its cache from configuration, as a fresh `booster`
//! process would, so repeated invocations only share analyses through a
//! persistent store.

use std::path::Path;
use std::sync::Arc;

use booster_core::{
    AnalysisOrchestrator, AnalysisProvider, BoosterConfig, ProviderError, Result, ServedAnalysis,
    UnconfiguredProvider,
};

use crate::gemini::GeminiProvider;
use crate::ledger;

/// Provider for the configured API key, or the unconfigured stand-in
pub fn provider_for(config: &BoosterConfig) -> std::result::Result<Arc<dyn AnalysisProvider>, ProviderError> {
    match GeminiProvider::from_config(&config.provider) {
        Ok(provider) => {
            tracing::info!(model = provider.model(), "Gemini provider configured");
            Ok(Arc::new(provider))
        }
        Err(ProviderError::NotConfigured(hint)) => {
            tracing::warn!(
                "{}; set it in the environment or a .env file to enable AI analysis",
                hint
            );
            Ok(Arc::new(UnconfiguredProvider::new(hint)))
        }
        Err(e) => Err(e),
    }
}

/// Load `student_id`'s records from `scores` and obtain their analysis
///
/// `Ok(None)` when the student has no valid records.
pub async fn analyze_student(
    config: &BoosterConfig,
    provider: Arc<dyn AnalysisProvider>,
    scores: &Path,
    student_id: &str,
    display_name: Option<&str>,
    force_refresh: bool,
) -> Result<(AnalysisOrchestrator, Option<ServedAnalysis>)> {
    let entries = ledger::load_student_entries(scores, student_id)?;
    let orchestrator = AnalysisOrchestrator::from_config(config, provider)?;

    let served = orchestrator
        .obtain_analysis(
            student_id,
            &entries,
            display_name.unwrap_or(student_id),
            force_refresh,
        )
        .await;

    tracing::debug!(stats = ?orchestrator.cache().stats(), "analysis cache statistics");
    Ok((orchestrator, served))
}

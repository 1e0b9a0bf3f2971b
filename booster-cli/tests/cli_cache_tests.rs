//! Analyses persist between `booster analyze` runs

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use booster_cli::analyze::analyze_student;
use booster_cli::settings;
use booster_core::{
    AnalysisProvider, AnalysisResult, AnalysisSource, BoosterConfig, CacheBackendType,
    CacheConfig, ProviderError, ScoreEntry,
};

/// Provider that always succeeds and counts calls
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl AnalysisProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    async fn analyze(
        &self,
        entries: &[ScoreEntry],
        display_name: &str,
    ) -> Result<AnalysisResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AnalysisResult::new(
            format!("{} has {} records", display_name, entries.len()),
            vec!["Revise process scheduling".to_string()],
            "Systems Programming",
        ))
    }
}

fn workspace(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("booster-cli-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("scores.json"),
        r#"[
            {"studentId":"22AI101","subject":"Operating System","type":"Internal Assessment 1","score":15,"maxScore":20,"date":"2024-02-18","credits":3},
            {"studentId":"22AI101","subject":"Operating System","type":"Term Work","score":21,"maxScore":25,"date":"2024-04-01","credits":3}
        ]"#,
    )
    .unwrap();
    dir
}

#[test]
fn test_cli_default_cache_is_persistent() {
    let config = settings::default_config();
    assert_eq!(config.cache.backend, CacheBackendType::File);
    assert!(config.cache.directory.is_some());
}

#[tokio::test]
async fn test_second_run_is_served_from_file_cache() {
    let dir = workspace("two-runs");
    let scores = dir.join("scores.json");
    let config = BoosterConfig {
        cache: CacheConfig::file(dir.join("cache")),
        ..BoosterConfig::default()
    };
    let provider = Arc::new(CountingProvider::default());

    let (_, first) = analyze_student(&config, provider.clone(), &scores, "22AI101", Some("Asha Patil"), false)
        .await
        .unwrap();
    let first = first.unwrap();
    assert_eq!(first.source, AnalysisSource::Fresh);

    // A fresh orchestrator and store, as a new process would build
    let (orchestrator, second) =
        analyze_student(&config, provider.clone(), &scores, "22AI101", Some("Asha Patil"), false)
            .await
            .unwrap();
    let second = second.unwrap();

    assert!(second.is_cached());
    assert_eq!(second.result, first.result);
    assert_eq!(second.cached_minutes_ago(orchestrator.cache().now()), Some(0));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(orchestrator.cache().stats().hits, 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_force_refresh_skips_file_cache() {
    let dir = workspace("force");
    let scores = dir.join("scores.json");
    let config = BoosterConfig {
        cache: CacheConfig::file(dir.join("cache")),
        ..BoosterConfig::default()
    };
    let provider = Arc::new(CountingProvider::default());

    analyze_student(&config, provider.clone(), &scores, "22AI101", None, false)
        .await
        .unwrap();
    let (_, forced) = analyze_student(&config, provider.clone(), &scores, "22AI101", None, true)
        .await
        .unwrap();

    assert_eq!(forced.unwrap().source, AnalysisSource::Fresh);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_student_without_records_is_none() {
    let dir = workspace("empty");
    let config = BoosterConfig {
        cache: CacheConfig::file(dir.join("cache")),
        ..BoosterConfig::default()
    };
    let provider = Arc::new(CountingProvider::default());

    let (_, served) = analyze_student(&config, provider.clone(), &dir.join("scores.json"), "22AI999", None, false)
        .await
        .unwrap();

    assert!(served.is_none());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

    let _ = std::fs::remove_dir_all(&dir);
}

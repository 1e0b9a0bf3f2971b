//! Benchmarks for metric computation and cache key derivation
//!
//! Both run on every dashboard refresh, so they are measured over ledgers of
//! increasing size.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use booster_core::storage::InMemoryStore;
use booster_core::{
    compute_metrics, derive_key, AnalysisCache, AnalysisResult, AssessmentKind, ScoreEntry,
    Subject,
};
use chrono::{Duration, NaiveDate};

const SUBJECTS: [(&str, &str, &str, f64); 6] = [
    ("maths4", "Engineering Mathematics-IV", "CSC401", 4.0),
    ("aoa", "Analysis of Algorithms", "CSC402", 3.0),
    ("dbms", "Database Management System", "CSC403", 3.0),
    ("os", "Operating System", "CSC404", 3.0),
    ("mpmc", "Microprocessor & Microcontroller", "CSC405", 3.0),
    ("python", "Skill Lab: Python Programming", "CSL405", 2.0),
];

fn subjects() -> Vec<Subject> {
    SUBJECTS
        .iter()
        .map(|(id, name, code, credits)| Subject::new(*id, *name, *code, *credits))
        .collect()
}

fn ledger(size: usize) -> Vec<ScoreEntry> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap_or_default();
    (0..size)
        .map(|i| {
            let (_, name, _, credits) = SUBJECTS[i % SUBJECTS.len()];
            let kind = AssessmentKind::ALL[i % AssessmentKind::ALL.len()];
            let max = kind.default_max_score();
            ScoreEntry::new(
                "22AI101",
                name,
                kind,
                (max * 0.4 + (i % 7) as f64).min(max),
                max,
                start + Duration::days((i * 3 % 120) as i64),
                credits,
            )
        })
        .collect()
}

fn bench_metrics(c: &mut Criterion) {
    let catalog = subjects();
    let mut group = c.benchmark_group("compute_metrics");

    for size in [10, 100, 1_000] {
        let entries = ledger(size);
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| compute_metrics(black_box(&entries), black_box(&catalog)))
        });
    }

    group.finish();
}

fn bench_derive_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_key");

    for size in [10, 100, 1_000] {
        let entries = ledger(size);
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| derive_key(black_box("22AI101"), black_box(&entries)))
        });
    }

    group.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let cache = AnalysisCache::new(Arc::new(InMemoryStore::new()));
    let key = derive_key("22AI101", &ledger(50));
    cache.put(&key, &AnalysisResult::fallback());

    c.bench_function("cache_hit", |b| b.iter(|| cache.get(black_box(&key))));
}

criterion_group!(benches, bench_metrics, bench_derive_key, bench_cache_hit);
criterion_main!(benches);

//! Metric calculator tests

use booster_core::metrics::{
    average_percentage, compute_metrics, credit_completion_ratio, latest_delta, latest_entry,
    pointer,
};
use booster_core::{AssessmentKind, ScoreEntry, Subject};
use chrono::NaiveDate;

fn entry(subject: &str, score: f64, max_score: f64, date: &str, credits: f64) -> ScoreEntry {
    ScoreEntry::new(
        "22AI101",
        subject,
        AssessmentKind::InternalAssessment1,
        score,
        max_score,
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        credits,
    )
}

fn semester_subjects() -> Vec<Subject> {
    vec![
        Subject::new("maths4", "Engineering Mathematics-IV", "CSC401", 4.0),
        Subject::new("aoa", "Analysis of Algorithms", "CSC402", 3.0),
        Subject::new("dbms", "Database Management System", "CSC403", 3.0),
        Subject::new("os", "Operating System", "CSC404", 3.0),
        Subject::new("mpmc", "Microprocessor & Microcontroller", "CSC405", 3.0),
        Subject::new("python", "Skill Lab: Python Programming", "CSL405", 2.0),
    ]
}

fn elite_student() -> Vec<ScoreEntry> {
    vec![
        entry("Engineering Mathematics-IV", 19.0, 20.0, "2024-02-15", 4.0),
        entry("Analysis of Algorithms", 18.0, 20.0, "2024-02-16", 3.0),
        entry("Database Management System", 19.0, 20.0, "2024-02-17", 3.0),
        entry("Engineering Mathematics-IV", 24.0, 25.0, "2024-04-10", 4.0),
        entry("Skill Lab: Python Programming", 48.0, 50.0, "2024-04-15", 2.0),
    ]
}

#[test]
fn test_empty_inputs_are_zero() {
    assert_eq!(pointer(&[]), 0.0);
    assert_eq!(average_percentage(&[]), 0);
    assert_eq!(latest_delta(&[]), 0);
    assert_eq!(credit_completion_ratio(&[], &semester_subjects()), 0.0);
    assert!(latest_entry(&[]).is_none());
}

#[test]
fn test_pointer_weighted_by_credits() {
    let entries = vec![
        entry("Engineering Mathematics-IV", 19.0, 20.0, "2024-02-15", 4.0),
        entry("Analysis of Algorithms", 18.0, 20.0, "2024-02-16", 3.0),
    ];

    // (0.95 * 10 * 4 + 0.90 * 10 * 3) / 7 = 9.2857...
    assert_eq!(pointer(&entries), 9.29);
}

#[test]
fn test_pointer_with_zero_credits_is_zero() {
    let entries = vec![
        entry("Seminar", 10.0, 10.0, "2024-02-15", 0.0),
        entry("Seminar", 5.0, 10.0, "2024-02-16", 0.0),
    ];
    assert_eq!(pointer(&entries), 0.0);
}

#[test]
fn test_metrics_stay_in_range() {
    let cases = vec![
        elite_student(),
        vec![entry("Operating System", 0.0, 20.0, "2024-02-18", 3.0)],
        vec![
            entry("Operating System", 20.0, 20.0, "2024-02-18", 3.0),
            entry("Operating System", 20.0, 20.0, "2024-02-18", 3.0),
        ],
        vec![
            entry("Analysis of Algorithms", 12.0, 20.0, "2024-02-16", 3.0),
            entry("Operating System", 15.0, 20.0, "2024-02-18", 3.0),
        ],
    ];

    for entries in cases {
        let metrics = compute_metrics(&entries, &semester_subjects());
        assert!((0.0..=10.0).contains(&metrics.pointer), "pointer {}", metrics.pointer);
        assert!(metrics.average_percentage <= 100);
        assert!((0.0..=1.0).contains(&metrics.credit_completion_ratio));
    }
}

#[test]
fn test_average_percentage_rounds_to_integer() {
    let entries = vec![
        entry("Analysis of Algorithms", 12.0, 20.0, "2024-02-16", 3.0),
        entry("Operating System", 15.0, 20.0, "2024-02-18", 3.0),
    ];
    // (60 + 75) / 2 = 67.5
    assert_eq!(average_percentage(&entries), 68);
}

#[test]
fn test_latest_delta_uses_newest_two_by_date() {
    // Input deliberately unsorted
    let entries = vec![
        entry("Operating System", 15.0, 20.0, "2024-02-18", 3.0),
        entry("Analysis of Algorithms", 12.0, 20.0, "2024-02-16", 3.0),
        entry("Operating System", 10.0, 20.0, "2024-03-01", 3.0),
    ];

    // newest 50%, previous 75%
    assert_eq!(latest_delta(&entries), -25);
    assert_eq!(latest_entry(&entries).unwrap().score, 10.0);
}

#[test]
fn test_latest_delta_single_entry_and_equal_ratios() {
    let single = vec![entry("Operating System", 15.0, 20.0, "2024-02-18", 3.0)];
    assert_eq!(latest_delta(&single), 0);

    let same_ratio = vec![
        entry("Operating System", 15.0, 20.0, "2024-02-18", 3.0),
        entry("Term Work", 30.0, 40.0, "2024-03-18", 3.0),
    ];
    assert_eq!(latest_delta(&same_ratio), 0);
}

#[test]
fn test_credit_completion_counts_each_subject_once() {
    let ratio = credit_completion_ratio(&elite_student(), &semester_subjects());

    // Maths (4) counted once + AOA (3) + DBMS (3) + Python (2) = 12 of 18
    assert!((ratio - 12.0 / 18.0).abs() < 1e-12);
}

#[test]
fn test_credit_completion_first_subject_match_wins() {
    let subjects = vec![
        Subject::new("os-a", "Operating System", "CSC404", 3.0),
        Subject::new("os-b", "Operating System", "CSC414", 1.0),
    ];
    let entries = vec![entry("Operating System", 15.0, 20.0, "2024-02-18", 9.0)];

    assert!((credit_completion_ratio(&entries, &subjects) - 0.75).abs() < 1e-12);
}

#[test]
fn test_credit_completion_ignores_unknown_subjects_and_empty_catalog() {
    let entries = vec![entry("Quantum Basket Weaving", 15.0, 20.0, "2024-02-18", 3.0)];
    assert_eq!(credit_completion_ratio(&entries, &semester_subjects()), 0.0);
    assert_eq!(credit_completion_ratio(&entries, &[]), 0.0);
}

#[test]
fn test_compute_metrics_for_elite_student() {
    let metrics = compute_metrics(&elite_student(), &semester_subjects());

    assert_eq!(metrics.average_percentage, 94);
    assert_eq!(metrics.latest_delta, 0);
    assert_eq!(metrics.band(), booster_core::PerformanceBand::Elite);
    assert_eq!(metrics.stability(), booster_core::Stability::Stable);
}

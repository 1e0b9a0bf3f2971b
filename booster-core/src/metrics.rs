//! Metric calculator
//!
//! Pure functions turning a set of score entries into the figures shown on
//! the student dashboard. Nothing here holds state; every call recomputes
//! from the caller's current entries.
//!
//! Rounding matches the dashboard: half-way values round towards positive
//! infinity, so a delta of -2.5 points rounds to -2.

use serde::{Deserialize, Serialize};

use crate::record::{ScoreEntry, Subject};

/// Display metrics derived from a student's entries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    /// Credit-weighted grade pointer in [0, 10], two decimals
    pub pointer: f64,
    /// Mean percentage in [0, 100]
    pub average_percentage: u32,
    /// Percentage-point change between the two most recent entries
    pub latest_delta: i64,
    /// Share of the semester's credits with at least one entry, in [0, 1]
    pub credit_completion_ratio: f64,
}

impl DerivedMetrics {
    /// Performance band for the average percentage
    pub fn band(&self) -> PerformanceBand {
        PerformanceBand::from_percentage(self.average_percentage as f64)
    }

    /// Stability assessment for the average and latest delta
    pub fn stability(&self) -> Stability {
        Stability::assess(self.average_percentage as f64, self.latest_delta)
    }
}

/// Compute all dashboard metrics in one pass over the inputs
pub fn compute_metrics(entries: &[ScoreEntry], all_subjects: &[Subject]) -> DerivedMetrics {
    DerivedMetrics {
        pointer: pointer(entries),
        average_percentage: average_percentage(entries),
        latest_delta: latest_delta(entries),
        credit_completion_ratio: credit_completion_ratio(entries, all_subjects),
    }
}

/// Round half towards positive infinity
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn round_to_cents(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

/// Credit-weighted pointer: `Σ(ratio × 10 × credits) / Σ(credits)`
///
/// Zero for empty input and for entries whose credits sum to zero.
pub fn pointer(entries: &[ScoreEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }

    let (weighted, credits) = entries.iter().fold((0.0, 0.0), |(w, c), e| {
        (w + e.ratio() * 10.0 * e.credits, c + e.credits)
    });

    if credits <= 0.0 || !credits.is_finite() {
        return 0.0;
    }

    round_to_cents(weighted / credits)
}

/// Mean of the per-entry percentages, rounded to a whole number
pub fn average_percentage(entries: &[ScoreEntry]) -> u32 {
    if entries.is_empty() {
        return 0;
    }

    let total: f64 = entries.iter().map(|e| e.ratio() * 100.0).sum();
    let mean = round_half_up(total / entries.len() as f64);
    mean.max(0.0) as u32
}

/// Entries ordered newest first; equal dates keep their input order
pub fn sorted_by_date_desc(entries: &[ScoreEntry]) -> Vec<&ScoreEntry> {
    let mut sorted: Vec<&ScoreEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Most recent entry by date
pub fn latest_entry(entries: &[ScoreEntry]) -> Option<&ScoreEntry> {
    sorted_by_date_desc(entries).into_iter().next()
}

/// Percentage-point change between the newest and second-newest entry
pub fn latest_delta(entries: &[ScoreEntry]) -> i64 {
    let sorted = sorted_by_date_desc(entries);
    match sorted.as_slice() {
        [newest, previous, ..] => round_half_up((newest.ratio() - previous.ratio()) * 100.0) as i64,
        _ => 0,
    }
}

/// Completed credits over the semester's total credits
///
/// Each distinct subject name in `entries` counts once, with the credits of
/// the first subject in `all_subjects` carrying that name. Names with no
/// matching subject contribute nothing.
pub fn credit_completion_ratio(entries: &[ScoreEntry], all_subjects: &[Subject]) -> f64 {
    let total: f64 = all_subjects.iter().map(|s| s.credits).sum();
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }

    let mut seen: Vec<&str> = Vec::new();
    for entry in entries {
        if !seen.contains(&entry.subject.as_str()) {
            seen.push(entry.subject.as_str());
        }
    }

    let completed: f64 = seen
        .iter()
        .filter_map(|name| all_subjects.iter().find(|s| s.name == *name))
        .map(|s| s.credits)
        .sum();

    completed / total
}

/// Mean percentage for one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAverage {
    pub subject: String,
    pub average: f64,
    pub entry_count: usize,
}

/// Per-subject mean percentages, in order of first appearance
pub fn subject_averages(entries: &[ScoreEntry]) -> Vec<SubjectAverage> {
    let mut groups: Vec<(&str, f64, usize)> = Vec::new();

    for entry in entries {
        match groups.iter_mut().find(|(name, _, _)| *name == entry.subject) {
            Some((_, sum, count)) => {
                *sum += entry.ratio();
                *count += 1;
            }
            None => groups.push((entry.subject.as_str(), entry.ratio(), 1)),
        }
    }

    groups
        .into_iter()
        .map(|(name, sum, count)| SubjectAverage {
            subject: name.to_string(),
            average: sum / count as f64 * 100.0,
            entry_count: count,
        })
        .collect()
}

/// Subject with the lowest mean percentage; the earliest one wins ties
pub fn weakest_subject(entries: &[ScoreEntry]) -> Option<SubjectAverage> {
    subject_averages(entries)
        .into_iter()
        .reduce(|weakest, next| if next.average < weakest.average { next } else { weakest })
}

/// Performance band shown on the dashboard gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    /// 85% and above
    Elite,
    /// 65% to 85%
    HighFrequency,
    /// 40% to 65%
    StandardCruise,
    /// Below 40%
    ColdStart,
}

impl PerformanceBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 85.0 {
            PerformanceBand::Elite
        } else if percentage >= 65.0 {
            PerformanceBand::HighFrequency
        } else if percentage >= 40.0 {
            PerformanceBand::StandardCruise
        } else {
            PerformanceBand::ColdStart
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceBand::Elite => "Redline / Elite",
            PerformanceBand::HighFrequency => "High Frequency",
            PerformanceBand::StandardCruise => "Standard Cruise",
            PerformanceBand::ColdStart => "Cold Start",
        }
    }
}

/// Trend stability indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    Stable,
    Turbulent,
    LowVoltage,
}

impl Stability {
    pub fn assess(percentage: f64, delta: i64) -> Self {
        if percentage > 35.0 {
            if delta > -5 {
                Stability::Stable
            } else {
                Stability::Turbulent
            }
        } else {
            Stability::LowVoltage
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stability::Stable => "STABLE",
            Stability::Turbulent => "TURBULENT",
            Stability::LowVoltage => "LOW VOLTAGE",
        }
    }
}

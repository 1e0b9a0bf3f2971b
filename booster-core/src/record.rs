//! Score records and subject definitions
//!
//! Records use the dashboard's JSON field names (`studentId`, `subject`,
//! `type`, `score`, `maxScore`, `date`, `credits`) so exported ledgers can be
//! loaded unchanged.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{BoosterError, Result};

/// Kind of assessment a score was recorded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssessmentKind {
    #[serde(rename = "Internal Assessment 1")]
    InternalAssessment1,
    #[serde(rename = "Internal Assessment 2")]
    InternalAssessment2,
    #[serde(rename = "Term Work")]
    TermWork,
    #[serde(rename = "End Semester Exam")]
    EndSemesterExam,
    #[serde(rename = "Oral & Practical")]
    OralPractical,
}

impl AssessmentKind {
    /// All kinds, in ledger order
    pub const ALL: [AssessmentKind; 5] = [
        AssessmentKind::InternalAssessment1,
        AssessmentKind::InternalAssessment2,
        AssessmentKind::TermWork,
        AssessmentKind::EndSemesterExam,
        AssessmentKind::OralPractical,
    ];

    /// Display label, identical to the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            AssessmentKind::InternalAssessment1 => "Internal Assessment 1",
            AssessmentKind::InternalAssessment2 => "Internal Assessment 2",
            AssessmentKind::TermWork => "Term Work",
            AssessmentKind::EndSemesterExam => "End Semester Exam",
            AssessmentKind::OralPractical => "Oral & Practical",
        }
    }

    /// Maximum marks offered by default when recording this kind
    pub fn default_max_score(&self) -> f64 {
        match self {
            AssessmentKind::InternalAssessment1 | AssessmentKind::InternalAssessment2 => 20.0,
            AssessmentKind::TermWork => 25.0,
            AssessmentKind::EndSemesterExam => 80.0,
            AssessmentKind::OralPractical => 50.0,
        }
    }
}

impl fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single assessment score
///
/// Entries are never mutated by the engine; a correction is a new entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Owner of the record (student roll number)
    #[serde(rename = "studentId")]
    pub owner_id: String,

    /// Subject name
    pub subject: String,

    /// Assessment kind
    #[serde(rename = "type")]
    pub kind: AssessmentKind,

    /// Marks obtained
    pub score: f64,

    /// Marks available
    #[serde(rename = "maxScore")]
    pub max_score: f64,

    /// Assessment date
    pub date: NaiveDate,

    /// Credit weight of the subject
    pub credits: f64,
}

impl ScoreEntry {
    /// Create a new entry
    pub fn new(
        owner_id: impl Into<String>,
        subject: impl Into<String>,
        kind: AssessmentKind,
        score: f64,
        max_score: f64,
        date: NaiveDate,
        credits: f64,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            subject: subject.into(),
            kind,
            score,
            max_score,
            date,
            credits,
        }
    }

    /// Fraction of available marks obtained, in [0, 1] for valid entries
    ///
    /// Returns 0 when `max_score` is not positive so aggregates never see NaN.
    pub fn ratio(&self) -> f64 {
        if self.max_score > 0.0 && self.max_score.is_finite() && self.score.is_finite() {
            self.score / self.max_score
        } else {
            0.0
        }
    }

    /// Check the invariants the entry producer is responsible for
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(BoosterError::InvalidEntry { reason });

        if self.subject.trim().is_empty() {
            return invalid("subject name is empty".to_string());
        }
        if !self.score.is_finite() || !self.max_score.is_finite() || !self.credits.is_finite() {
            return invalid(format!("non-finite number in '{}' entry", self.subject));
        }
        if self.max_score <= 0.0 {
            return invalid(format!("maxScore must be positive, got {}", self.max_score));
        }
        if self.score < 0.0 || self.score > self.max_score {
            return invalid(format!(
                "score {} outside 0..={} for '{}'",
                self.score, self.max_score, self.subject
            ));
        }
        if self.credits < 0.0 {
            return invalid(format!("credits must not be negative, got {}", self.credits));
        }
        Ok(())
    }
}

/// A subject offered in the semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: String,
    pub credits: f64,
}

impl Subject {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        code: impl Into<String>,
        credits: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            credits,
        }
    }

    /// Validate the subject code format and credit weight
    pub fn validate(&self) -> Result<()> {
        if !is_valid_subject_code(&self.code) {
            return Err(BoosterError::InvalidSubject {
                subject: self.name.clone(),
                reason: format!("code '{}' does not look like CSC401", self.code),
            });
        }
        if !self.credits.is_finite() || self.credits < 0.0 {
            return Err(BoosterError::InvalidSubject {
                subject: self.name.clone(),
                reason: format!("credits must be a non-negative number, got {}", self.credits),
            });
        }
        Ok(())
    }
}

const ROLL_NUMBER_PATTERN: &str = r"^[0-9]{2}[A-Z]{2,4}[0-9]{3,4}$";
const SUBJECT_CODE_PATTERN: &str = r"^[A-Z]{2,3}[0-9]{3,4}$";

fn pattern_matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .map(|re| re.is_match(value.trim()))
        .unwrap_or(false)
}

/// Roll numbers look like `22AI101` or `23CS0001`
pub fn is_valid_roll_number(value: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    pattern_matches(&RE, ROLL_NUMBER_PATTERN, value)
}

/// Subject codes look like `CSC401` or `CSL405`
pub fn is_valid_subject_code(value: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    pattern_matches(&RE, SUBJECT_CODE_PATTERN, value)
}

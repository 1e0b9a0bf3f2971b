//! Loading score ledgers and subject catalogs
//!
//! Both files are JSON arrays in the dashboard's export format. Invalid rows
//! are skipped with a warning rather than failing the whole load.

use std::path::Path;

use booster_core::record::is_valid_roll_number;
use booster_core::{BoosterError, Result, ScoreEntry, Subject};

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| BoosterError::IoError {
        message: format!("{}: {}", path.display(), e),
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Load one student's valid entries from a score ledger
pub fn load_student_entries(path: &Path, student_id: &str) -> Result<Vec<ScoreEntry>> {
    if !is_valid_roll_number(student_id) {
        tracing::warn!(student_id, "student id does not look like a roll number (e.g. 22AI101)");
    }

    let all: Vec<ScoreEntry> = read_json(path)?;
    let total = all.len();
    let entries = select_valid(all, student_id);

    tracing::info!(
        path = %path.display(),
        student_id,
        total,
        selected = entries.len(),
        "loaded score ledger"
    );
    Ok(entries)
}

/// Keep `student_id`'s entries that pass validation, in ledger order
pub fn select_valid(entries: Vec<ScoreEntry>, student_id: &str) -> Vec<ScoreEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.owner_id == student_id)
        .filter(|entry| match entry.validate() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(subject = %entry.subject, date = %entry.date, error = %err, "skipping invalid entry");
                false
            }
        })
        .collect()
}

/// Load the subject catalog, skipping invalid subjects
pub fn load_subjects(path: &Path) -> Result<Vec<Subject>> {
    let subjects: Vec<Subject> = read_json(path)?;

    Ok(subjects
        .into_iter()
        .filter(|subject| match subject.validate() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "skipping invalid subject");
                false
            }
        })
        .collect())
}

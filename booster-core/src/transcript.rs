//! Transcript export
//!
//! Writes a student's entries as CSV with the columns
//! `Date,Subject,Type,Score,MaxScore,Credits`, one row per entry in input
//! order.

use std::io::Write;

use crate::error::{BoosterError, Result};
use crate::record::ScoreEntry;

/// CSV header row
pub const TRANSCRIPT_HEADER: [&str; 6] = ["Date", "Subject", "Type", "Score", "MaxScore", "Credits"];

/// Default file name for an owner's transcript
pub fn transcript_file_name(owner_id: &str) -> String {
    format!("transcript_{}.csv", owner_id)
}

/// Write `entries` as a CSV transcript
///
/// Fails with [`BoosterError::EmptyTranscript`] when there is nothing to export.
pub fn write_transcript<W: Write>(owner_id: &str, entries: &[ScoreEntry], writer: W) -> Result<()> {
    if entries.is_empty() {
        return Err(BoosterError::EmptyTranscript {
            owner_id: owner_id.to_string(),
        });
    }

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(TRANSCRIPT_HEADER)?;

    for entry in entries {
        csv.write_record([
            entry.date.format("%Y-%m-%d").to_string(),
            entry.subject.clone(),
            entry.kind.label().to_string(),
            entry.score.to_string(),
            entry.max_score.to_string(),
            entry.credits.to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

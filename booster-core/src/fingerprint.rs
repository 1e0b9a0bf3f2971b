//! Cache key derivation
//!
//! A cache key addresses one analysis per (owner, record content) pair:
//!
//! ```text
//! analysis_<ownerId>_<16 hex digits>
//! ```
//!
//! Only subject, score, maxScore and date take part in the fingerprint.
//! Assessment kind and credit weight are deliberately left out, so editing
//! either of them keeps serving the analysis cached for the old content.
//! Entries are fingerprinted in input order; the same records in a different
//! order produce a different key.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::record::ScoreEntry;

/// Prefix shared by every analysis key
pub const KEY_PREFIX: &str = "analysis_";

/// Fields of an entry that take part in the fingerprint
#[derive(Serialize)]
struct Projection<'a> {
    subject: &'a str,
    score: f64,
    #[serde(rename = "maxScore")]
    max_score: f64,
    date: String,
}

impl<'a> From<&'a ScoreEntry> for Projection<'a> {
    fn from(entry: &'a ScoreEntry) -> Self {
        Self {
            subject: &entry.subject,
            score: entry.score,
            max_score: entry.max_score,
            date: entry.date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Canonical serialization of the fingerprinted fields
fn canonical_projection(entries: &[ScoreEntry]) -> serde_json::Result<String> {
    let projected: Vec<Projection<'_>> = entries.iter().map(Projection::from).collect();
    serde_json::to_string(&projected)
}

/// Fold a SHA-256 digest of `content` into 64 bits, as 16 hex digits
fn fold_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

/// Key shared by every content state of an owner
///
/// Used when the records cannot be serialized; caching still works but one
/// analysis then stands for all of the owner's record sets.
pub fn degraded_key(owner_id: &str) -> String {
    format!("{}{}", KEY_PREFIX, owner_id)
}

/// Derive the cache key for an owner's current records
pub fn derive_key(owner_id: &str, entries: &[ScoreEntry]) -> String {
    match canonical_projection(entries) {
        Ok(serialized) => format!("{}{}_{}", KEY_PREFIX, owner_id, fold_hash(&serialized)),
        Err(err) => {
            tracing::warn!(
                owner_id,
                error = %err,
                "could not fingerprint score entries, using degraded cache key"
            );
            degraded_key(owner_id)
        }
    }
}

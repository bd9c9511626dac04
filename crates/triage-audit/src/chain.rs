//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Hash input layout (bytes, in order):
//!   1. ledger_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the decision record

use sha2::{Digest, Sha256};

use triage_contracts::{
    decision::DecisionRecord,
    error::{EngineResult, TriageError},
};

use crate::entry::LedgerEntry;

/// Compute the SHA-256 hash for one ledger entry.
///
/// Commits to the ledger the entry belongs to, its position, its link to the
/// previous entry, and the full decision record. Returns a lowercase
/// 64-character hex string.
pub fn hash_entry(
    ledger_id: &str,
    sequence: u64,
    record: &DecisionRecord,
    prev_hash: &str,
) -> EngineResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| TriageError::LedgerWriteFailed {
        reason: format!("decision record did not serialize: {e}"),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(ledger_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify the integrity of a hash chain.
///
/// Valid when every entry's `prev_hash` equals the preceding entry's
/// `this_hash` (or `GENESIS_HASH` for the first), every `this_hash` matches
/// the value recomputed from the entry's own fields, and sequence numbers
/// run 0, 1, 2, ... without gaps. An empty chain is valid.
pub fn verify_chain(entries: &[LedgerEntry]) -> bool {
    let mut expected_prev = LedgerEntry::GENESIS_HASH.to_string();

    for (position, entry) in entries.iter().enumerate() {
        if entry.sequence != position as u64 || entry.prev_hash != expected_prev {
            return false;
        }

        match hash_entry(&entry.ledger_id, entry.sequence, &entry.record, &entry.prev_hash) {
            Ok(recomputed) if recomputed == entry.this_hash => {}
            _ => return false,
        }

        expected_prev = entry.this_hash.clone();
    }

    true
}

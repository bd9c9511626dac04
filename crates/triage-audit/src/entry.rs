//! Ledger entry and sealed-log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use triage_contracts::decision::DecisionRecord;

/// One link in the decision hash chain.
///
/// Changing any field, including anything inside `record`, invalidates
/// `this_hash` and every later `prev_hash`; `verify_chain` detects both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Position in the chain, starting at 0.
    pub sequence: u64,
    pub ledger_id: String,
    pub record: DecisionRecord,
    /// `this_hash` of the previous entry, or `GENESIS_HASH` for the first.
    pub prev_hash: String,
    pub this_hash: String,
}

impl LedgerEntry {
    /// The `prev_hash` of the first entry in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A sealed snapshot of a ledger.
///
/// `terminal_hash` is the `this_hash` of the last entry and commits to the
/// whole log; it is empty when the ledger is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionLog {
    pub ledger_id: String,
    pub entries: Vec<LedgerEntry>,
    pub exported_at: DateTime<Utc>,
    pub terminal_hash: String,
}

/// Counts of decisions by source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total: usize,
    pub remote: usize,
    pub fallback: usize,
}

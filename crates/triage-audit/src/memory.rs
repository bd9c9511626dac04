//! In-memory implementation of `DecisionRecorder`.
//!
//! `InMemoryDecisionLedger` keeps every entry in a `Vec` behind a `Mutex`,
//! so one ledger can be shared by an orchestrator serving many sessions.
//! Call `verify_integrity()` at any time and `export_log()` to take a
//! sealed snapshot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::debug;

use triage_contracts::{
    decision::{DecisionRecord, DecisionSource},
    error::{EngineResult, TriageError},
};
use triage_core::traits::DecisionRecorder;

use crate::{
    chain::{hash_entry, verify_chain},
    entry::{DecisionLog, LedgerEntry, LedgerSummary},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct LedgerState {
    pub(crate) entries: Vec<LedgerEntry>,
    /// Next sequence number to assign.
    pub(crate) sequence: u64,
    /// `this_hash` of the last entry, or `GENESIS_HASH` before the first.
    pub(crate) last_hash: String,
}

// ── Public ledger ─────────────────────────────────────────────────────────────

/// An in-memory, append-only decision ledger backed by a SHA-256 hash chain.
///
/// Cloning shares the underlying chain.
#[derive(Clone)]
pub struct InMemoryDecisionLedger {
    ledger_id: String,
    pub(crate) state: Arc<Mutex<LedgerState>>,
}

impl InMemoryDecisionLedger {
    pub fn new(ledger_id: impl Into<String>) -> Self {
        let state = LedgerState {
            entries: Vec::new(),
            sequence: 0,
            last_hash: LedgerEntry::GENESIS_HASH.to_string(),
        };
        Self {
            ledger_id: ledger_id.into(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn ledger_id(&self) -> &str {
        &self.ledger_id
    }

    // Read paths tolerate a poisoned lock: appends are all-or-nothing, so
    // the entries behind it are still a consistent chain.
    fn read(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// Export a sealed `DecisionLog` of every entry written so far.
    pub fn export_log(&self) -> DecisionLog {
        let state = self.read();
        let terminal_hash = state
            .entries
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        DecisionLog {
            ledger_id: self.ledger_id.clone(),
            entries: state.entries.clone(),
            exported_at: Utc::now(),
            terminal_hash,
        }
    }

    /// Confirm the in-memory chain has not been tampered with.
    pub fn verify_integrity(&self) -> bool {
        verify_chain(&self.read().entries)
    }

    pub fn summary(&self) -> LedgerSummary {
        let state = self.read();
        let fallback = state
            .entries
            .iter()
            .filter(|e| matches!(e.record.source, DecisionSource::Fallback { .. }))
            .count();
        LedgerSummary {
            total: state.entries.len(),
            remote: state.entries.len() - fallback,
            fallback,
        }
    }
}

// ── DecisionRecorder impl ─────────────────────────────────────────────────────

impl DecisionRecorder for InMemoryDecisionLedger {
    /// Append one decision to the chain.
    ///
    /// Fails with `LedgerWriteFailed` if the lock is poisoned or the record
    /// cannot be hashed; the chain is left unchanged in either case.
    fn record(&self, record: &DecisionRecord) -> EngineResult<()> {
        let mut state = self.state.lock().map_err(|e| TriageError::LedgerWriteFailed {
            reason: format!("ledger state lock poisoned: {}", e),
        })?;

        let prev_hash = state.last_hash.clone();
        let sequence = state.sequence;
        let this_hash = hash_entry(&self.ledger_id, sequence, record, &prev_hash)?;

        state.entries.push(LedgerEntry {
            sequence,
            ledger_id: self.ledger_id.clone(),
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.sequence += 1;
        state.last_hash = this_hash;

        debug!(
            ledger_id = %self.ledger_id,
            sequence,
            request_id = %record.request_id.0,
            "decision appended to ledger"
        );

        Ok(())
    }
}

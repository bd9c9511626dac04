//! # triage-audit
//!
//! Append-only, SHA-256 hash-chained ledger of triage decisions.
//!
//! ## Overview
//!
//! The orchestrator hands every decision to a `DecisionRecorder`.
//! `InMemoryDecisionLedger` wraps each `DecisionRecord` in a `LedgerEntry`
//! linked to the previous entry by hash, so editing any stored decision
//! (a lowered risk score, a rewritten fallback reason) is detectable.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use triage_audit::InMemoryDecisionLedger;
//!
//! let ledger = InMemoryDecisionLedger::new("ward-7");
//! let orchestrator = Orchestrator::new(rules, validator, Box::new(ledger.clone()));
//! orchestrator.evaluate(&payload).await;
//!
//! assert!(ledger.verify_integrity());
//! let log = ledger.export_log();
//! ```

pub mod chain;
pub mod entry;
pub mod memory;

pub use chain::{hash_entry, verify_chain};
pub use entry::{DecisionLog, LedgerEntry, LedgerSummary};
pub use memory::InMemoryDecisionLedger;

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Error types for the triage decision engine.
//!
//! Fallible collaborators (reasoning providers, configuration loaders, the
//! decision ledger) return `EngineResult<T>`. The orchestrator never lets one
//! of these escape `evaluate()`: every failure ends in a rule-engine result.

use thiserror::Error;

/// The unified error type for the triage crates.
#[derive(Debug, Error)]
pub enum TriageError {
    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// The remote reasoning provider could not be reached.
    #[error("reasoning provider unavailable at {endpoint}: {reason}")]
    RemoteUnavailable { endpoint: String, reason: String },

    /// The remote reasoning provider answered with a non-success status.
    #[error("reasoning provider returned status {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    /// The remote call did not finish inside its time budget.
    #[error("reasoning provider timed out after {secs}s")]
    RemoteTimeout { secs: u64 },

    /// The provider answered, but no JSON object could be recovered from the text.
    #[error("malformed reasoning response: {reason}")]
    MalformedResponse { reason: String },

    /// The decoded response violated the triage output schema.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },

    /// An analysis is already running for this session.
    #[error("analysis already in flight for session {session_id}")]
    AnalysisInFlight { session_id: String },

    /// The decision ledger could not append a record.
    #[error("ledger write failed: {reason}")]
    LedgerWriteFailed { reason: String },
}

/// Convenience alias used throughout the triage crates.
pub type EngineResult<T> = Result<T, TriageError>;

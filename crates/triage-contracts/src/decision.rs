//! Request identity and decision provenance.
//!
//! `DecisionRecord` is what the orchestrator hands to the decision ledger
//! after every analysis: which request, which session, which path produced
//! the result, and why the fallback ran when it did.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::TriageResult;

/// Unique identifier for one analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub uuid::Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for a triage session (one patient form, one browser tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Why the rule engine produced the result instead of the remote provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    /// No reasoning provider is configured.
    ProviderAbsent,
    /// The remote call exceeded its time budget and was cancelled.
    Timeout { millis: u64 },
    /// Transport failure or non-success status.
    ProviderError { message: String },
    /// The provider answered, but the answer failed extraction or validation.
    InvalidResponse { failures: Vec<String> },
}

/// Which path produced a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DecisionSource {
    Remote,
    Fallback { reason: FallbackReason },
}

/// One immutable ledger entry per analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub request_id: RequestId,
    /// Absent for one-off evaluations made outside a session.
    pub session_id: Option<SessionId>,
    pub source: DecisionSource,
    pub result: TriageResult,
    pub timestamp: DateTime<Utc>,
}

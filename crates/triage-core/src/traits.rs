//! Trait definitions at the trust seams of the decision engine.
//!
//! - `RuleEngine`        — trusted, deterministic fallback and safety net
//! - `ReasoningProvider` — untrusted remote model, may be absent, slow, or wrong
//! - `ResponseValidator` — trusted gate between raw provider text and a result
//! - `DecisionRecorder`  — append-only sink for decision provenance
//!
//! The orchestrator wires them together. A provider answer only reaches the
//! caller after the validator returns `RemoteVerdict::Valid`.

use async_trait::async_trait;

use triage_contracts::{
    decision::DecisionRecord,
    error::EngineResult,
    payload::ContextualPayload,
    remote::RemoteVerdict,
    result::TriageResult,
};

/// The deterministic classifier used whenever the remote path fails.
///
/// Implementations must be pure: the same payload always yields the same
/// result, evaluation never blocks, and every branch fills every field.
pub trait RuleEngine: Send + Sync {
    /// Classify `payload` with `fallback_used = true`.
    fn fallback_analysis(&self, payload: &ContextualPayload) -> TriageResult;

    /// Return the first neurological marker found in `transcript`, if any.
    ///
    /// Sessions use this to latch their sticky neuro flag.
    fn neuro_marker(&self, transcript: &str) -> Option<String>;
}

/// A remote reasoning endpoint (typically an LLM behind HTTP).
///
/// Treated as untrusted: the orchestrator bounds every call with a timeout
/// and validates every answer.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// Short label for logs, e.g. the model name.
    fn name(&self) -> &str;

    /// Send `prompt` and return the provider's raw text answer.
    async fn complete(&self, prompt: &str) -> EngineResult<String>;
}

/// Turns raw provider text into a validated assessment or a failure list.
pub trait ResponseValidator: Send + Sync {
    fn validate(&self, raw: &str) -> RemoteVerdict;
}

/// Append-only sink for one `DecisionRecord` per analysis request.
///
/// A failed write is logged by the orchestrator and never changes the
/// result handed back to the caller.
pub trait DecisionRecorder: Send + Sync {
    fn record(&self, record: &DecisionRecord) -> EngineResult<()>;
}

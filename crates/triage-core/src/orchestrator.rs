//! The triage orchestrator: remote-first, rule-backed evaluation.
//!
//! Every request runs the same pipeline:
//!
//!   Payload → Prompt → [Provider, under timeout] → Validate → Result
//!                 └──────── any failure ─────────▶ Rule engine → Result
//!                                                     ↓
//!                                               Decision ledger
//!
//! `evaluate()` cannot fail. Provider absence, transport errors, timeouts,
//! and invalid answers all end in the rule engine's result with
//! `fallback_used = true`. There is no retry inside a request; the next
//! request consults the provider again.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use triage_contracts::{
    decision::{DecisionRecord, DecisionSource, FallbackReason, RequestId, SessionId},
    error::EngineResult,
    payload::ContextualPayload,
    remote::RemoteVerdict,
    result::TriageResult,
};

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::prompt::render_prompt;
use crate::session::{IntakeDraft, TriageSession};
use crate::traits::{DecisionRecorder, ReasoningProvider, ResponseValidator, RuleEngine};

/// Confidence reported for every validated remote answer.
pub const REMOTE_CONFIDENCE: f32 = 0.9;

/// Drives one analysis request at a time per call; holds no per-request state.
///
/// Safe to share across sessions: all methods take `&self` and the
/// collaborators are `Send + Sync`.
pub struct Orchestrator {
    rules: Box<dyn RuleEngine>,
    provider: Option<Box<dyn ReasoningProvider>>,
    validator: Box<dyn ResponseValidator>,
    recorder: Box<dyn DecisionRecorder>,
    timeout: Duration,
}

impl Orchestrator {
    /// Build an orchestrator with no remote provider; every request uses the rule engine.
    pub fn new(
        rules: Box<dyn RuleEngine>,
        validator: Box<dyn ResponseValidator>,
        recorder: Box<dyn DecisionRecorder>,
    ) -> Self {
        Self {
            rules,
            provider: None,
            validator,
            recorder,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn ReasoningProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn rules(&self) -> &dyn RuleEngine {
        self.rules.as_ref()
    }

    /// Run the rule engine alone.
    pub fn fallback_analysis(&self, payload: &ContextualPayload) -> TriageResult {
        self.rules.fallback_analysis(payload)
    }

    /// Evaluate one payload outside of any session.
    pub async fn evaluate(&self, payload: &ContextualPayload) -> TriageResult {
        self.run(RequestId::new(), None, payload).await
    }

    /// Evaluate a draft inside `session`.
    ///
    /// Claims the session's in-flight slot, latches the sticky neuro flag
    /// from the draft transcript, then evaluates. The only error is
    /// `AnalysisInFlight`; the evaluation itself cannot fail.
    pub async fn evaluate_in_session(
        &self,
        session: &TriageSession,
        draft: IntakeDraft,
    ) -> EngineResult<TriageResult> {
        let _guard = session.try_begin()?;
        let payload = session.build_payload(self.rules.as_ref(), draft);
        Ok(self.run(RequestId::new(), Some(session.id()), &payload).await)
    }

    async fn run(
        &self,
        request_id: RequestId,
        session_id: Option<SessionId>,
        payload: &ContextualPayload,
    ) -> TriageResult {
        debug!(
            request_id = %request_id.0,
            neuro_risk_detected = payload.neuro_risk_detected,
            "triage request starting"
        );

        let (result, source) = match self.consult_remote(request_id, payload).await {
            Ok(result) => (result, DecisionSource::Remote),
            Err(reason) => {
                warn!(
                    request_id = %request_id.0,
                    reason = ?reason,
                    "using rule-based safety net"
                );
                let result = self.rules.fallback_analysis(payload);
                (result, DecisionSource::Fallback { reason })
            }
        };

        info!(
            request_id = %request_id.0,
            risk_score = result.risk_score,
            department = %result.department,
            fallback_used = result.fallback_used,
            "triage decision made"
        );

        let record = DecisionRecord {
            request_id,
            session_id,
            source,
            result: result.clone(),
            timestamp: Utc::now(),
        };
        if let Err(e) = self.recorder.record(&record) {
            // The caller still gets its result; alerting must always have something to act on.
            warn!(request_id = %request_id.0, error = %e, "decision ledger write failed");
        }

        result
    }

    /// One bounded attempt at the remote provider, validated before it is trusted.
    async fn consult_remote(
        &self,
        request_id: RequestId,
        payload: &ContextualPayload,
    ) -> Result<TriageResult, FallbackReason> {
        let provider = self.provider.as_ref().ok_or(FallbackReason::ProviderAbsent)?;

        let prompt = render_prompt(payload);
        debug!(
            request_id = %request_id.0,
            provider = provider.name(),
            prompt_len = prompt.len(),
            timeout_ms = self.timeout.as_millis() as u64,
            "consulting reasoning provider"
        );

        // Dropping the future on timeout cancels the in-flight call.
        let raw = match tokio::time::timeout(self.timeout, provider.complete(&prompt)).await {
            Err(_elapsed) => {
                return Err(FallbackReason::Timeout {
                    millis: self.timeout.as_millis() as u64,
                })
            }
            Ok(Err(e)) => {
                return Err(FallbackReason::ProviderError {
                    message: e.to_string(),
                })
            }
            Ok(Ok(raw)) => raw,
        };

        match self.validator.validate(&raw) {
            RemoteVerdict::Valid(assessment) => Ok(TriageResult::new(
                i64::from(assessment.risk_score),
                assessment.department,
                &assessment.justification,
                REMOTE_CONFIDENCE,
                false,
            )),
            RemoteVerdict::Invalid { failures } => {
                Err(FallbackReason::InvalidResponse { failures })
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use triage_contracts::{
        decision::{DecisionRecord, DecisionSource, FallbackReason},
        error::{EngineResult, TriageError},
        patient::{BloodGroup, PatientProfile, VitalSigns},
        payload::ContextualPayload,
        remote::{RemoteAssessment, RemoteVerdict},
        result::{Department, TriageResult},
    };

    use crate::session::{IntakeDraft, TriageSession};
    use crate::traits::{DecisionRecorder, ReasoningProvider, ResponseValidator, RuleEngine};

    use super::{Orchestrator, REMOTE_CONFIDENCE};

    // ── Mock helpers ─────────────────────────────────────────────────────────

    fn make_profile() -> PatientProfile {
        PatientProfile {
            age: "34".to_string(),
            gender: "male".to_string(),
            blood_pressure: "120/80".to_string(),
            blood_group: BloodGroup::OPositive,
        }
    }

    fn make_vitals() -> VitalSigns {
        VitalSigns {
            heart_rate: 76,
            blood_pressure: "120/80".to_string(),
            spo2: 98,
        }
    }

    fn make_payload(neuro: bool) -> ContextualPayload {
        ContextualPayload {
            patient_profile: make_profile(),
            symptom_transcript: "feeling fine".to_string(),
            ehr_history: String::new(),
            neuro_risk_detected: neuro,
            vital_signs: make_vitals(),
        }
    }

    fn make_draft(transcript: &str) -> IntakeDraft {
        IntakeDraft {
            patient_profile: make_profile(),
            symptom_transcript: transcript.to_string(),
            ehr_history: String::new(),
            vital_signs: make_vitals(),
        }
    }

    /// Neuro flag → 88/Neurology, otherwise 15/General Medicine.
    struct MockRules;

    impl RuleEngine for MockRules {
        fn fallback_analysis(&self, payload: &ContextualPayload) -> TriageResult {
            if payload.neuro_risk_detected {
                TriageResult::new(88, Department::Neurology, "neuro flag", 0.85, true)
            } else {
                TriageResult::new(15, Department::GeneralMedicine, "stable", 0.6, true)
            }
        }

        fn neuro_marker(&self, transcript: &str) -> Option<String> {
            transcript.contains("shaking").then(|| "shaking".to_string())
        }
    }

    enum Behavior {
        Answer(&'static str),
        Fail,
        Hang,
    }

    /// A provider that counts calls and behaves as configured.
    struct MockProvider {
        behavior: Behavior,
        calls: Arc<Mutex<u32>>,
    }

    impl MockProvider {
        fn new(behavior: Behavior) -> Self {
            Self { behavior, calls: Arc::new(Mutex::new(0)) }
        }
    }

    #[async_trait]
    impl ReasoningProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(&self, _prompt: &str) -> EngineResult<String> {
            *self.calls.lock().unwrap() += 1;
            match self.behavior {
                Behavior::Answer(text) => Ok(text.to_string()),
                Behavior::Fail => Err(TriageError::RemoteStatus {
                    status: 500,
                    body: "internal error".to_string(),
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok("too late".to_string())
                }
            }
        }
    }

    /// Accepts exactly the text "valid"; rejects anything else.
    struct MockValidator;

    impl ResponseValidator for MockValidator {
        fn validate(&self, raw: &str) -> RemoteVerdict {
            if raw == "valid" {
                RemoteVerdict::Valid(RemoteAssessment {
                    risk_score: 77,
                    department: Department::Pulmonology,
                    justification: "low SpO2 trend".to_string(),
                })
            } else {
                RemoteVerdict::Invalid {
                    failures: vec![format!("unexpected body '{raw}'")],
                }
            }
        }
    }

    /// Records every decision for later inspection.
    struct MockRecorder {
        records: Arc<Mutex<Vec<DecisionRecord>>>,
        fail: bool,
    }

    impl MockRecorder {
        fn new() -> Self {
            Self { records: Arc::new(Mutex::new(vec![])), fail: false }
        }

        fn failing() -> Self {
            Self { records: Arc::new(Mutex::new(vec![])), fail: true }
        }
    }

    impl DecisionRecorder for MockRecorder {
        fn record(&self, record: &DecisionRecord) -> EngineResult<()> {
            if self.fail {
                return Err(TriageError::LedgerWriteFailed {
                    reason: "disk full".to_string(),
                });
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn orchestrator(recorder: MockRecorder) -> Orchestrator {
        Orchestrator::new(Box::new(MockRules), Box::new(MockValidator), Box::new(recorder))
    }

    fn only_source(records: &Arc<Mutex<Vec<DecisionRecord>>>) -> DecisionSource {
        let records = records.lock().unwrap();
        assert_eq!(records.len(), 1, "exactly one decision must be recorded");
        records[0].source.clone()
    }

    // ── Test cases ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn absent_provider_uses_rule_engine() {
        let recorder = MockRecorder::new();
        let records = recorder.records.clone();
        let orch = orchestrator(recorder);
        let payload = make_payload(false);

        let result = orch.evaluate(&payload).await;

        assert!(result.fallback_used);
        assert_eq!(result, orch.fallback_analysis(&payload));
        assert_eq!(
            only_source(&records),
            DecisionSource::Fallback { reason: FallbackReason::ProviderAbsent }
        );
    }

    #[tokio::test]
    async fn valid_remote_answer_passes_through() {
        let recorder = MockRecorder::new();
        let records = recorder.records.clone();
        let orch = orchestrator(recorder)
            .with_provider(Box::new(MockProvider::new(Behavior::Answer("valid"))));

        let result = orch.evaluate(&make_payload(false)).await;

        assert!(!result.fallback_used);
        assert_eq!(result.risk_score, 77);
        assert_eq!(result.department, Department::Pulmonology);
        assert_eq!(result.justification, "low SpO2 trend");
        assert_eq!(result.confidence, REMOTE_CONFIDENCE);
        assert_eq!(only_source(&records), DecisionSource::Remote);
    }

    /// A remote answer is not second-guessed by the rule engine.
    #[tokio::test]
    async fn valid_remote_answer_is_not_overridden_by_rules() {
        let orch = orchestrator(MockRecorder::new())
            .with_provider(Box::new(MockProvider::new(Behavior::Answer("valid"))));

        let result = orch.evaluate(&make_payload(true)).await;

        assert_eq!(result.department, Department::Pulmonology);
        assert!(!result.fallback_used);
    }

    #[tokio::test]
    async fn provider_error_falls_back_to_rule_result() {
        let recorder = MockRecorder::new();
        let records = recorder.records.clone();
        let orch = orchestrator(recorder)
            .with_provider(Box::new(MockProvider::new(Behavior::Fail)));
        let payload = make_payload(true);

        let result = orch.evaluate(&payload).await;

        assert_eq!(result, orch.fallback_analysis(&payload));
        assert!(result.fallback_used);
        match only_source(&records) {
            DecisionSource::Fallback { reason: FallbackReason::ProviderError { message } } => {
                assert!(message.contains("500"), "message should carry the status: {message}");
            }
            other => panic!("expected ProviderError fallback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn slow_provider_is_cancelled_and_falls_back() {
        let recorder = MockRecorder::new();
        let records = recorder.records.clone();
        let orch = orchestrator(recorder)
            .with_provider(Box::new(MockProvider::new(Behavior::Hang)))
            .with_timeout(Duration::from_millis(50));
        let payload = make_payload(false);

        let started = std::time::Instant::now();
        let result = orch.evaluate(&payload).await;

        assert!(started.elapsed() < Duration::from_secs(5), "timeout must bound the call");
        assert_eq!(result, orch.fallback_analysis(&payload));
        assert_eq!(
            only_source(&records),
            DecisionSource::Fallback { reason: FallbackReason::Timeout { millis: 50 } }
        );
    }

    #[tokio::test]
    async fn invalid_answer_falls_back_with_failures() {
        let recorder = MockRecorder::new();
        let records = recorder.records.clone();
        let orch = orchestrator(recorder)
            .with_provider(Box::new(MockProvider::new(Behavior::Answer("not json"))));
        let payload = make_payload(false);

        let result = orch.evaluate(&payload).await;

        assert_eq!(result, orch.fallback_analysis(&payload));
        match only_source(&records) {
            DecisionSource::Fallback { reason: FallbackReason::InvalidResponse { failures } } => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].contains("not json"));
            }
            other => panic!("expected InvalidResponse fallback, got {:?}", other),
        }
    }

    /// A prior fallback does not pin later requests to the rule engine.
    #[tokio::test]
    async fn every_request_consults_the_provider_again() {
        let provider = MockProvider::new(Behavior::Fail);
        let calls = provider.calls.clone();
        let orch = orchestrator(MockRecorder::new()).with_provider(Box::new(provider));

        orch.evaluate(&make_payload(false)).await;
        orch.evaluate(&make_payload(false)).await;

        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn ledger_failure_does_not_change_result() {
        let orch = orchestrator(MockRecorder::failing());
        let payload = make_payload(false);

        let result = orch.evaluate(&payload).await;

        assert_eq!(result, orch.fallback_analysis(&payload));
    }

    // ── Session integration ──────────────────────────────────────────────────

    #[tokio::test]
    async fn session_latches_neuro_flag_across_requests() {
        let recorder = MockRecorder::new();
        let records = recorder.records.clone();
        let orch = orchestrator(recorder);
        let session = TriageSession::new();

        let first = orch
            .evaluate_in_session(&session, make_draft("hands shaking since morning"))
            .await
            .unwrap();
        assert_eq!(first.department, Department::Neurology);

        let second = orch
            .evaluate_in_session(&session, make_draft("feeling fine"))
            .await
            .unwrap();
        assert_eq!(second.department, Department::Neurology, "flag must be sticky");

        session.reset_neuro_flag();
        let third = orch
            .evaluate_in_session(&session, make_draft("feeling fine"))
            .await
            .unwrap();
        assert_eq!(third.department, Department::GeneralMedicine);

        let records = records.lock().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.session_id == Some(session.id())));
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn concurrent_request_in_same_session_is_rejected() {
        let orch = orchestrator(MockRecorder::new());
        let session = TriageSession::new();
        let _held = session.try_begin().unwrap();

        let result = orch.evaluate_in_session(&session, make_draft("feeling fine")).await;

        assert!(matches!(result, Err(TriageError::AnalysisInFlight { .. })));
    }
}

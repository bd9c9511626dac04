//! Per-session state: the sticky neurological flag and the in-flight guard.
//!
//! The neuro flag is a two-state machine:
//!
//!   Normal ──(marker observed in transcript)──▶ Flagged
//!   Flagged ──(explicit reset_neuro_flag)──▶ Normal
//!
//! New input never clears the flag. Only the user-triggered reset does.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::info;

use triage_contracts::{
    decision::SessionId,
    error::{EngineResult, TriageError},
    patient::{PatientProfile, VitalSigns},
    payload::ContextualPayload,
};

use crate::traits::RuleEngine;

/// State of the sticky neurological-risk flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeuroRiskState {
    Normal,
    Flagged {
        /// The marker (or source) that latched the flag.
        marker: String,
    },
}

impl NeuroRiskState {
    pub fn is_flagged(&self) -> bool {
        matches!(self, NeuroRiskState::Flagged { .. })
    }
}

/// Raw collector inputs for one request, before the session adds its flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeDraft {
    pub patient_profile: PatientProfile,
    pub symptom_transcript: String,
    pub ehr_history: String,
    pub vital_signs: VitalSigns,
}

/// One patient form's worth of state across repeated analysis requests.
pub struct TriageSession {
    id: SessionId,
    neuro: Mutex<NeuroRiskState>,
    in_flight: AtomicBool,
}

impl TriageSession {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            neuro: Mutex::new(NeuroRiskState::Normal),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn neuro_state(&self) -> NeuroRiskState {
        self.neuro_lock().clone()
    }

    pub fn is_neuro_flagged(&self) -> bool {
        self.neuro_lock().is_flagged()
    }

    /// Normal → Flagged. A no-op when already flagged; the first marker is kept.
    pub fn flag_neuro(&self, marker: impl Into<String>) {
        let mut state = self.neuro_lock();
        if state.is_flagged() {
            return;
        }
        let marker = marker.into();
        info!(session_id = %self.id.0, marker = %marker, "neuro risk flag latched");
        *state = NeuroRiskState::Flagged { marker };
    }

    /// Scan `transcript` for a neuro marker and latch the flag on a match.
    ///
    /// Returns the flag state after observation.
    pub fn observe(&self, rules: &dyn RuleEngine, transcript: &str) -> bool {
        if let Some(marker) = rules.neuro_marker(transcript) {
            self.flag_neuro(marker);
        }
        self.is_neuro_flagged()
    }

    /// Flagged → Normal. The only way the flag is ever cleared.
    pub fn reset_neuro_flag(&self) {
        let mut state = self.neuro_lock();
        if state.is_flagged() {
            info!(session_id = %self.id.0, "neuro risk flag reset");
        }
        *state = NeuroRiskState::Normal;
    }

    /// Claim the session for one analysis.
    ///
    /// Returns `AnalysisInFlight` while another guard is alive. The claim is
    /// released when the guard drops, including on cancellation.
    pub fn try_begin(&self) -> EngineResult<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| TriageError::AnalysisInFlight {
                session_id: self.id.0.to_string(),
            })?;
        Ok(InFlightGuard { session: self })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Observe the draft's transcript, then build the payload with the current flag.
    pub fn build_payload(&self, rules: &dyn RuleEngine, draft: IntakeDraft) -> ContextualPayload {
        let neuro_risk_detected = self.observe(rules, &draft.symptom_transcript);
        ContextualPayload {
            patient_profile: draft.patient_profile,
            symptom_transcript: draft.symptom_transcript,
            ehr_history: draft.ehr_history,
            neuro_risk_detected,
            vital_signs: draft.vital_signs,
        }
    }

    fn neuro_lock(&self) -> MutexGuard<'_, NeuroRiskState> {
        // The state is a plain enum; a panic elsewhere cannot leave it half-written.
        self.neuro.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for TriageSession {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII claim on a session's single analysis slot.
pub struct InFlightGuard<'a> {
    session: &'a TriageSession,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.session.in_flight.store(false, Ordering::Release);
    }
}

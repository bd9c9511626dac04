//! The normalized input to one triage analysis.

use serde::{Deserialize, Serialize};

use crate::patient::{BloodPressure, PatientProfile, VitalSigns};

/// Everything the decision engine sees for one analysis request.
///
/// Built fresh for every request (manual trigger or debounced auto-trigger)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualPayload {
    pub patient_profile: PatientProfile,
    /// Voice or typed symptom description. May be empty.
    pub symptom_transcript: String,
    /// OCR'd or typed EHR history. May be empty.
    pub ehr_history: String,
    /// Session-scoped sticky flag; once set upstream it stays set until reset.
    pub neuro_risk_detected: bool,
    pub vital_signs: VitalSigns,
}

impl ContextualPayload {
    /// The blood pressure reading the engine should act on.
    ///
    /// The live vitals reading wins when it parses; otherwise the profile
    /// reading is used. `None` when neither parses, which disables only the
    /// BP-based rules.
    pub fn effective_blood_pressure(&self) -> Option<(BloodPressure, &str)> {
        [
            self.vital_signs.blood_pressure.as_str(),
            self.patient_profile.blood_pressure.as_str(),
        ]
        .into_iter()
        .find_map(|raw| BloodPressure::parse(raw).map(|bp| (bp, raw.trim())))
    }

    pub fn age_years(&self) -> u32 {
        self.patient_profile.age_years()
    }
}

//! Rendering a payload into the instruction sent to the reasoning provider.
//!
//! The hard rules restated here are hints for the remote model only. The
//! rule engine never relies on the model having followed them.

use std::fmt::Write;

use triage_contracts::{payload::ContextualPayload, result::Department};

/// Render the full instruction for one analysis request.
pub fn render_prompt(payload: &ContextualPayload) -> String {
    let profile = &payload.patient_profile;
    let vitals = &payload.vital_signs;
    let departments = Department::ALL
        .iter()
        .map(|d| format!("\"{}\"", d.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are a clinical triage assistant. Assess the patient below and \
         respond with ONLY a JSON object, no prose."
    );
    prompt.push('\n');
    let _ = writeln!(prompt, "Patient profile:");
    let _ = writeln!(prompt, "- Age: {}", or_unknown(&profile.age));
    let _ = writeln!(prompt, "- Gender: {}", or_unknown(&profile.gender));
    let _ = writeln!(prompt, "- Blood group: {}", profile.blood_group);
    let _ = writeln!(prompt, "- Blood pressure (profile): {}", or_unknown(&profile.blood_pressure));
    prompt.push('\n');
    let _ = writeln!(prompt, "Vital signs:");
    let _ = writeln!(prompt, "- Heart rate: {} bpm", vitals.heart_rate);
    let _ = writeln!(prompt, "- Blood pressure: {}", or_unknown(&vitals.blood_pressure));
    let _ = writeln!(prompt, "- SpO2: {}%", vitals.spo2);
    prompt.push('\n');
    let _ = writeln!(prompt, "Symptom transcript: {}", or_none(&payload.symptom_transcript));
    let _ = writeln!(prompt, "EHR history: {}", or_none(&payload.ehr_history));
    let _ = writeln!(
        prompt,
        "Neurological risk flag: {}",
        if payload.neuro_risk_detected { "SET" } else { "not set" }
    );
    prompt.push('\n');
    let _ = writeln!(prompt, "Hard rules:");
    let _ = writeln!(
        prompt,
        "1. Systolic blood pressure above 180, or chest pain, means high risk and department \"Cardiology\"."
    );
    let _ = writeln!(
        prompt,
        "2. Tremor, shaking, or stiffness in the transcript means high risk and department \"Neurology\"."
    );
    prompt.push('\n');
    let _ = writeln!(prompt, "Output format:");
    let _ = writeln!(
        prompt,
        "{{\"risk_score\": <integer 0-100>, \"department\": <one of {departments}>, \
         \"justification\": \"<one or two sentences>\"}}"
    );

    prompt
}

fn or_unknown(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        "unknown"
    } else {
        value
    }
}

fn or_none(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use triage_contracts::patient::{BloodGroup, PatientProfile, VitalSigns};

    use super::*;

    fn payload() -> ContextualPayload {
        ContextualPayload {
            patient_profile: PatientProfile {
                age: "61".to_string(),
                gender: "".to_string(),
                blood_pressure: "150/90".to_string(),
                blood_group: BloodGroup::ANegative,
            },
            symptom_transcript: "pressure in my chest".to_string(),
            ehr_history: "".to_string(),
            neuro_risk_detected: true,
            vital_signs: VitalSigns {
                heart_rate: 104,
                blood_pressure: "185/100".to_string(),
                spo2: 93,
            },
        }
    }

    #[test]
    fn prompt_carries_every_payload_field() {
        let prompt = render_prompt(&payload());
        assert!(prompt.contains("Age: 61"));
        assert!(prompt.contains("Gender: unknown"));
        assert!(prompt.contains("Blood group: A-"));
        assert!(prompt.contains("Heart rate: 104 bpm"));
        assert!(prompt.contains("Blood pressure: 185/100"));
        assert!(prompt.contains("SpO2: 93%"));
        assert!(prompt.contains("pressure in my chest"));
        assert!(prompt.contains("EHR history: (none)"));
        assert!(prompt.contains("Neurological risk flag: SET"));
    }

    #[test]
    fn prompt_lists_every_department_and_both_hard_rules() {
        let prompt = render_prompt(&payload());
        for dept in Department::ALL {
            assert!(prompt.contains(&format!("\"{}\"", dept.as_str())), "missing {dept}");
        }
        assert!(prompt.contains("above 180"));
        assert!(prompt.contains("Tremor"));
        assert!(prompt.contains("\"risk_score\""));
    }
}

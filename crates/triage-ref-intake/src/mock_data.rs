//! Fictional sample patients for the reference scenarios.
//!
//! No real patient data appears here.

use triage_contracts::{
    patient::{BloodGroup, PatientProfile, VitalSigns},
    result::Department,
};
use triage_core::session::IntakeDraft;

/// What a scenario expects the engine to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectation {
    pub min_score: u8,
    pub max_score: u8,
    pub department: Department,
}

/// One intake form, ready to be turned into an `IntakeDraft`.
#[derive(Debug, Clone)]
pub struct SamplePatient {
    /// Scenario letter, e.g. "A".
    pub scenario: &'static str,
    pub title: &'static str,
    pub name: &'static str,
    pub profile: PatientProfile,
    pub vitals: VitalSigns,
    pub transcript: &'static str,
    pub history: &'static str,
    pub expected: Expectation,
}

impl SamplePatient {
    pub fn draft(&self) -> IntakeDraft {
        IntakeDraft {
            patient_profile: self.profile.clone(),
            symptom_transcript: self.transcript.to_string(),
            ehr_history: self.history.to_string(),
            vital_signs: self.vitals.clone(),
        }
    }
}

fn profile(age: &str, gender: &str, bp: &str, blood_group: BloodGroup) -> PatientProfile {
    PatientProfile {
        age: age.to_string(),
        gender: gender.to_string(),
        blood_pressure: bp.to_string(),
        blood_group,
    }
}

fn vitals(heart_rate: u32, bp: &str, spo2: u32) -> VitalSigns {
    VitalSigns {
        heart_rate,
        blood_pressure: bp.to_string(),
        spo2,
    }
}

/// The four reference patients, in scenario order A–D.
pub fn sample_patients() -> Vec<SamplePatient> {
    vec![
        SamplePatient {
            scenario: "A",
            title: "Severe hypertension",
            name: "Harold Mensah",
            profile: profile("40", "male", "280/140", BloodGroup::BPositive),
            vitals: vitals(104, "280/140", 95),
            transcript: "",
            history: "",
            expected: Expectation {
                min_score: 95,
                max_score: 95,
                department: Department::Cardiology,
            },
        },
        SamplePatient {
            scenario: "B",
            title: "Tremor with normal vitals",
            name: "Lucia Ferreira",
            profile: profile("38", "female", "120/80", BloodGroup::OPositive),
            vitals: vitals(74, "120/80", 98),
            transcript: "patient has a tremor",
            history: "",
            expected: Expectation {
                min_score: 88,
                max_score: 88,
                department: Department::Neurology,
            },
        },
        SamplePatient {
            scenario: "C",
            title: "Routine visit",
            name: "Tomasz Nowak",
            profile: profile("30", "male", "120/80", BloodGroup::ANegative),
            vitals: vitals(70, "120/80", 99),
            transcript: "feeling fine",
            history: "",
            expected: Expectation {
                min_score: 15,
                max_score: 15,
                department: Department::GeneralMedicine,
            },
        },
        SamplePatient {
            scenario: "D",
            title: "Older diabetic with headache",
            name: "Meera Iyer",
            profile: profile("55", "female", "145/95", BloodGroup::AbPositive),
            vitals: vitals(82, "145/95", 97),
            transcript: "mild headache",
            history: "diabetes",
            expected: Expectation {
                min_score: 45,
                max_score: 55,
                department: Department::GeneralMedicine,
            },
        },
    ]
}

/// Look up a sample patient by scenario letter (case-insensitive).
pub fn sample_patient(scenario: &str) -> Option<SamplePatient> {
    sample_patients()
        .into_iter()
        .find(|p| p.scenario.eq_ignore_ascii_case(scenario.trim()))
}

//! Rule configuration schema and the individual triage rules.
//!
//! A `RuleConfig` is deserialized from TOML and tunes thresholds, scores,
//! and keyword lists. It does not control rule order: the engine always
//! evaluates crisis → neurological → comorbidity → chronic history, then
//! falls through to the baseline.

use serde::{Deserialize, Serialize};

use triage_contracts::{
    error::{EngineResult, TriageError},
    patient::BloodPressure,
    payload::ContextualPayload,
    result::{Department, RiskLevel, TriageResult},
};

// ── Configuration schema ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisConfig {
    /// Strictly greater than this systolic value triggers the rule.
    pub systolic_above: u32,
    /// Strictly greater than this diastolic value triggers the rule.
    pub diastolic_above: u32,
    pub risk_score: u8,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuroConfig {
    /// Substrings matched case-insensitively against the transcript.
    pub keywords: Vec<String>,
    pub risk_score: u8,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComorbidityConfig {
    pub history_markers: Vec<String>,
    pub fever_markers: Vec<String>,
    pub abdominal_markers: Vec<String>,
    pub risk_score: u8,
    /// Score used instead of `risk_score` when age >= `elder_age`.
    pub elder_risk_score: u8,
    pub elder_age: u32,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronicConfig {
    /// Inclusive.
    pub min_age: u32,
    pub risk_score: u8,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineConfig {
    pub risk_score: u8,
    pub confidence: f32,
}

/// The top-level structure deserialized from a rule TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub hypertensive_crisis: CrisisConfig,
    pub neurological: NeuroConfig,
    pub metabolic_comorbidity: ComorbidityConfig,
    pub chronic_history: ChronicConfig,
    pub baseline: BaselineConfig,
}

impl Default for RuleConfig {
    /// Matches `policies/triage-rules.toml`.
    fn default() -> Self {
        let words = |list: &[&str]| list.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self {
            hypertensive_crisis: CrisisConfig {
                systolic_above: 180,
                diastolic_above: 110,
                risk_score: 95,
                confidence: 0.9,
            },
            neurological: NeuroConfig {
                keywords: words(&[
                    "shake", "shaking", "tremor", "stiff", "frozen", "slur", "forget",
                    "temblor", "tremblement", "zittern", "काँप", "कंपन", "अकड़",
                ]),
                risk_score: 88,
                confidence: 0.85,
            },
            metabolic_comorbidity: ComorbidityConfig {
                history_markers: words(&["diabet"]),
                fever_markers: words(&["fever", "febrile", "chills", "high temperature"]),
                abdominal_markers: words(&[
                    "abdominal", "abdomen", "stomach", "belly", "vomit", "nausea", "diarrh",
                ]),
                risk_score: 48,
                elder_risk_score: 52,
                elder_age: 50,
                confidence: 0.75,
            },
            chronic_history: ChronicConfig {
                min_age: 50,
                risk_score: 45,
                confidence: 0.7,
            },
            baseline: BaselineConfig {
                risk_score: 15,
                confidence: 0.6,
            },
        }
    }
}

impl RuleConfig {
    /// Reject configurations that could under-classify an emergency or
    /// produce out-of-range results.
    pub fn validate(&self) -> EngineResult<()> {
        let scores = [
            ("hypertensive_crisis.risk_score", self.hypertensive_crisis.risk_score),
            ("neurological.risk_score", self.neurological.risk_score),
            ("metabolic_comorbidity.risk_score", self.metabolic_comorbidity.risk_score),
            ("metabolic_comorbidity.elder_risk_score", self.metabolic_comorbidity.elder_risk_score),
            ("chronic_history.risk_score", self.chronic_history.risk_score),
            ("baseline.risk_score", self.baseline.risk_score),
        ];
        for (field, score) in scores {
            if score > 100 {
                return Err(config_error(format!("{field} must be within 0..=100, got {score}")));
            }
        }

        let confidences = [
            ("hypertensive_crisis.confidence", self.hypertensive_crisis.confidence),
            ("neurological.confidence", self.neurological.confidence),
            ("metabolic_comorbidity.confidence", self.metabolic_comorbidity.confidence),
            ("chronic_history.confidence", self.chronic_history.confidence),
            ("baseline.confidence", self.baseline.confidence),
        ];
        for (field, confidence) in confidences {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(config_error(format!(
                    "{field} must be within 0.0..=1.0, got {confidence}"
                )));
            }
        }

        // Emergencies must always land in the HIGH band.
        let high = RiskLevel::HIGH_THRESHOLD;
        for (field, score) in [
            ("hypertensive_crisis.risk_score", self.hypertensive_crisis.risk_score),
            ("neurological.risk_score", self.neurological.risk_score),
        ] {
            if i64::from(score) < high {
                return Err(config_error(format!(
                    "{field} must classify as HIGH (>= {high}), got {score}"
                )));
            }
        }

        let lists = [
            ("neurological.keywords", &self.neurological.keywords),
            ("metabolic_comorbidity.history_markers", &self.metabolic_comorbidity.history_markers),
            ("metabolic_comorbidity.fever_markers", &self.metabolic_comorbidity.fever_markers),
            ("metabolic_comorbidity.abdominal_markers", &self.metabolic_comorbidity.abdominal_markers),
        ];
        for (field, list) in lists {
            if list.is_empty() {
                return Err(config_error(format!("{field} must not be empty")));
            }
            if list.iter().any(|w| w.trim().is_empty()) {
                return Err(config_error(format!("{field} must not contain blank entries")));
            }
        }

        Ok(())
    }
}

fn config_error(reason: String) -> TriageError {
    TriageError::Config { reason }
}

// ── Observation ───────────────────────────────────────────────────────────────

/// Normalized view of a payload, computed once per evaluation.
pub struct Observation<'a> {
    pub payload: &'a ContextualPayload,
    pub transcript: String,
    pub history: String,
    pub age: u32,
    pub blood_pressure: Option<(BloodPressure, &'a str)>,
}

impl<'a> Observation<'a> {
    pub fn new(payload: &'a ContextualPayload) -> Self {
        Self {
            payload,
            transcript: payload.symptom_transcript.to_lowercase(),
            history: payload.ehr_history.to_lowercase(),
            age: payload.age_years(),
            blood_pressure: payload.effective_blood_pressure(),
        }
    }
}

/// First entry of `markers` found in `haystack` (already lowercased).
pub(crate) fn first_marker<'m>(haystack: &str, markers: &'m [String]) -> Option<&'m str> {
    markers
        .iter()
        .map(String::as_str)
        .find(|m| haystack.contains(m))
}

fn lowercased(list: &[String]) -> Vec<String> {
    list.iter().map(|w| w.trim().to_lowercase()).collect()
}

// ── Rules ─────────────────────────────────────────────────────────────────────

/// One entry of the ordered rule list. `apply` is the predicate and the
/// result builder in one: `Some` means the rule matched and nothing after
/// it is evaluated.
#[derive(Debug, Clone)]
pub enum TriageRule {
    HypertensiveCrisis(CrisisConfig),
    Neurological(NeuroConfig),
    MetabolicComorbidity(ComorbidityConfig),
    ChronicHistory(ChronicConfig),
}

impl TriageRule {
    /// Build the rule list in its fixed evaluation order.
    pub fn ordered(config: &RuleConfig) -> Vec<TriageRule> {
        let mut neuro = config.neurological.clone();
        neuro.keywords = lowercased(&neuro.keywords);

        let mut comorbidity = config.metabolic_comorbidity.clone();
        comorbidity.history_markers = lowercased(&comorbidity.history_markers);
        comorbidity.fever_markers = lowercased(&comorbidity.fever_markers);
        comorbidity.abdominal_markers = lowercased(&comorbidity.abdominal_markers);

        vec![
            TriageRule::HypertensiveCrisis(config.hypertensive_crisis.clone()),
            TriageRule::Neurological(neuro),
            TriageRule::MetabolicComorbidity(comorbidity),
            TriageRule::ChronicHistory(config.chronic_history.clone()),
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            TriageRule::HypertensiveCrisis(_) => "hypertensive-crisis",
            TriageRule::Neurological(_) => "neurological-emergency",
            TriageRule::MetabolicComorbidity(_) => "metabolic-comorbidity",
            TriageRule::ChronicHistory(_) => "chronic-history",
        }
    }

    pub fn apply(&self, obs: &Observation<'_>) -> Option<TriageResult> {
        match self {
            TriageRule::HypertensiveCrisis(cfg) => {
                let (bp, raw) = obs.blood_pressure?;
                if bp.systolic <= cfg.systolic_above && bp.diastolic <= cfg.diastolic_above {
                    return None;
                }
                Some(TriageResult::new(
                    i64::from(cfg.risk_score),
                    Department::Cardiology,
                    format!(
                        "Hypertensive Crisis: blood pressure reading {raw} exceeds the {}/{} mmHg \
                         emergency threshold. Immediate cardiology evaluation required.",
                        cfg.systolic_above, cfg.diastolic_above
                    ),
                    cfg.confidence,
                    true,
                ))
            }

            TriageRule::Neurological(cfg) => {
                let marker = first_marker(&obs.transcript, &cfg.keywords);
                let trigger = match (marker, obs.payload.neuro_risk_detected) {
                    (Some(word), _) => format!("biomarker '{word}' detected in the symptom transcript"),
                    (None, true) => "neurological risk flag is set for this session".to_string(),
                    (None, false) => return None,
                };
                Some(TriageResult::new(
                    i64::from(cfg.risk_score),
                    Department::Neurology,
                    format!(
                        "Neurological emergency: {trigger}. Vocal and behavioral markers \
                         override otherwise stable vitals; urgent neurology assessment advised."
                    ),
                    cfg.confidence,
                    true,
                ))
            }

            TriageRule::MetabolicComorbidity(cfg) => {
                first_marker(&obs.history, &cfg.history_markers)?;
                let acute = if let Some(word) = first_marker(&obs.transcript, &cfg.fever_markers) {
                    format!("fever ('{word}')")
                } else if let Some(word) = first_marker(&obs.transcript, &cfg.abdominal_markers) {
                    format!("abdominal symptoms ('{word}')")
                } else {
                    return None;
                };

                let elder = obs.age >= cfg.elder_age;
                let score = if elder { cfg.elder_risk_score } else { cfg.risk_score };
                let age_note = if elder {
                    format!(" Age {} further raises the risk.", obs.age)
                } else {
                    String::new()
                };
                Some(TriageResult::new(
                    i64::from(score),
                    Department::GeneralMedicine,
                    format!(
                        "Moderate risk: diabetic history combined with acute {acute} can signal \
                         infection or metabolic decompensation.{age_note} Prompt general \
                         medicine review advised."
                    ),
                    cfg.confidence,
                    true,
                ))
            }

            TriageRule::ChronicHistory(cfg) => {
                if obs.age < cfg.min_age || obs.payload.ehr_history.trim().is_empty() {
                    return None;
                }
                Some(TriageResult::new(
                    i64::from(cfg.risk_score),
                    Department::GeneralMedicine,
                    format!(
                        "Moderate risk: age {} with a documented medical history. Vitals \
                         reviewed; general medicine follow-up recommended.",
                        obs.age
                    ),
                    cfg.confidence,
                    true,
                ))
            }
        }
    }
}

/// The result when no rule matches.
pub fn baseline_result(cfg: &BaselineConfig) -> TriageResult {
    TriageResult::new(
        i64::from(cfg.risk_score),
        Department::GeneralMedicine,
        "Low risk: vitals stable and no critical markers found in transcript or history.",
        cfg.confidence,
        true,
    )
}

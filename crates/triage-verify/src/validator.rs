//! Schema-based validation of remote triage answers.
//!
//! `RemoteResponseValidator` implements the `ResponseValidator` trait from
//! triage-core. Validation runs in two phases after extraction:
//!
//! 1. **Structural**: the decoded object is validated against
//!    [`assessment_schema`] with the `jsonschema` crate. Out-of-range scores
//!    and wrong-typed fields fail here.
//! 2. **Semantic**: the department must name one of the known departments.
//!
//! All failures are collected before returning so the decision ledger sees
//! every reason an answer was rejected, not just the first.

use serde_json::{json, Value};
use tracing::{debug, warn};

use triage_contracts::{
    remote::{RemoteAssessment, RemoteVerdict},
    result::{sanitize_text, Department},
};
use triage_core::traits::ResponseValidator;

use crate::extract::extract_json;

/// The JSON Schema every remote answer must satisfy.
///
/// `justification` is optional; an answer without one is still usable and
/// the result carries a placeholder.
pub fn assessment_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "risk_score": { "type": "number", "minimum": 0, "maximum": 100 },
            "department": { "type": "string", "minLength": 1, "pattern": "\\S" },
            "justification": { "type": "string" }
        },
        "required": ["risk_score", "department"]
    })
}

/// Validates raw provider text against [`assessment_schema`] plus the
/// department enumeration.
pub struct RemoteResponseValidator {
    schema: Value,
}

impl RemoteResponseValidator {
    pub fn new() -> Self {
        Self {
            schema: assessment_schema(),
        }
    }

    /// Phase 1. A schema that fails to compile is reported as a failure
    /// rather than trusted.
    fn structural_failures(&self, value: &Value) -> Vec<String> {
        match jsonschema::validator_for(&self.schema) {
            Ok(validator) => validator
                .iter_errors(value)
                .map(|error| {
                    let path = error.instance_path.to_string();
                    let at = if path.is_empty() { "/".to_string() } else { path };
                    format!("JSON Schema violation at {at}: {error}")
                })
                .collect(),
            Err(e) => vec![format!("invalid JSON Schema document: {e}")],
        }
    }
}

impl Default for RemoteResponseValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseValidator for RemoteResponseValidator {
    fn validate(&self, raw: &str) -> RemoteVerdict {
        let value = match extract_json(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "remote answer could not be extracted");
                return RemoteVerdict::Invalid {
                    failures: vec![e.to_string()],
                };
            }
        };

        // ── Phase 1: JSON Schema structural validation ────────────────────────
        let mut failures = self.structural_failures(&value);

        // ── Phase 2: Semantic checks ──────────────────────────────────────────
        let department = match value.get("department").and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => match name.parse::<Department>() {
                Ok(dept) => Some(dept),
                Err(message) => {
                    failures.push(format!("department {message}"));
                    None
                }
            },
            _ => None,
        };

        let risk_score = value
            .get("risk_score")
            .and_then(Value::as_f64)
            .filter(|score| (0.0..=100.0).contains(score))
            .map(|score| score.round() as u8);

        for failure in &failures {
            warn!(%failure, "remote answer failed validation");
        }

        match (risk_score, department, failures.is_empty()) {
            (Some(risk_score), Some(department), true) => {
                let justification = value
                    .get("justification")
                    .and_then(Value::as_str)
                    .map(sanitize_text)
                    .unwrap_or_default();
                debug!(risk_score, department = %department, "remote answer accepted");
                RemoteVerdict::Valid(RemoteAssessment {
                    risk_score,
                    department,
                    justification,
                })
            }
            _ => {
                if failures.is_empty() {
                    failures.push("risk_score or department could not be read".to_string());
                }
                RemoteVerdict::Invalid { failures }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Alerting trigger: decides when a result warrants notifying staff.
//!
//! Delivery (SMS, pager) lives elsewhere; this module only composes the
//! message.

use serde::{Deserialize, Serialize};
use tracing::info;

use triage_contracts::result::{sanitize_text, Department, RiskLevel, TriageResult};

/// Shown when the intake form carried no usable patient name.
pub const UNIDENTIFIED_PATIENT: &str = "Unidentified patient";

/// A composed, ready-to-send alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub patient: String,
    pub risk_score: u8,
    pub department: Department,
    pub justification: String,
    pub level: RiskLevel,
}

impl AlertMessage {
    /// Single-line text body suitable for SMS.
    pub fn body(&self) -> String {
        format!(
            "TRIAGE ALERT [{}] {}: risk {}/100, route to {}. {}",
            self.level, self.patient, self.risk_score, self.department, self.justification
        )
    }
}

/// Fires when a result's score reaches the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertTrigger {
    threshold: u8,
}

impl AlertTrigger {
    pub const DEFAULT_THRESHOLD: u8 = 75;

    pub fn new(threshold: u8) -> Self {
        Self {
            threshold: threshold.min(100),
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// `Some(message)` when `result.risk_score >= threshold`.
    pub fn evaluate(&self, patient: &str, result: &TriageResult) -> Option<AlertMessage> {
        if result.risk_score < self.threshold {
            return None;
        }

        let mut patient = sanitize_text(patient);
        if patient.is_empty() {
            patient = UNIDENTIFIED_PATIENT.to_string();
        }

        info!(
            patient = %patient,
            risk_score = result.risk_score,
            department = %result.department,
            "alert triggered"
        );

        Some(AlertMessage {
            patient,
            risk_score: result.risk_score,
            department: result.department,
            justification: result.justification.clone(),
            level: result.risk_level(),
        })
    }
}

impl Default for AlertTrigger {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

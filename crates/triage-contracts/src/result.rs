//! Triage output types and the display-level risk classification.
//!
//! `TriageResult` is the only thing the engine hands back. Its constructor
//! enforces the output invariants so that no caller, rule, or remote answer
//! can produce a result the alerting and export collaborators cannot use:
//! the score is clamped to 0..=100, the confidence to 0.0..=1.0, and the
//! justification is never empty and never carries control characters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of departments a triage result may route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Cardiology,
    Neurology,
    Pulmonology,
    #[serde(rename = "General Medicine")]
    GeneralMedicine,
    Gastroenterology,
    #[serde(rename = "Internal Medicine")]
    InternalMedicine,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Cardiology,
        Department::Neurology,
        Department::Pulmonology,
        Department::GeneralMedicine,
        Department::Gastroenterology,
        Department::InternalMedicine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Cardiology => "Cardiology",
            Department::Neurology => "Neurology",
            Department::Pulmonology => "Pulmonology",
            Department::GeneralMedicine => "General Medicine",
            Department::Gastroenterology => "Gastroenterology",
            Department::InternalMedicine => "Internal Medicine",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = String;

    /// Case-insensitive, whitespace-tolerant match against the display names.
    /// "general   medicine" and "GENERAL MEDICINE" both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.split_whitespace().collect::<Vec<_>>().join(" ");
        Department::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("'{}' is not a known department", s.trim()))
    }
}

/// Coarse label derived from a risk score for display and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const HIGH_THRESHOLD: i64 = 75;
    pub const MEDIUM_THRESHOLD: i64 = 40;

    /// Total mapping over any integer; out-of-range input is clamped to 0..=100 first.
    pub fn from_score(score: i64) -> Self {
        let score = score.clamp(0, 100);
        if score >= Self::HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Used when a justification comes out empty after sanitizing.
pub const FALLBACK_JUSTIFICATION: &str = "No justification provided.";

/// The engine's sole output for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub risk_score: u8,
    pub department: Department,
    pub justification: String,
    pub confidence: f32,
    /// True iff the deterministic rule engine, not the remote provider, produced this.
    pub fallback_used: bool,
}

impl TriageResult {
    pub fn new(
        risk_score: i64,
        department: Department,
        justification: impl AsRef<str>,
        confidence: f32,
        fallback_used: bool,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut justification = sanitize_text(justification.as_ref());
        if justification.is_empty() {
            justification = FALLBACK_JUSTIFICATION.to_string();
        }

        Self {
            risk_score: risk_score.clamp(0, 100) as u8,
            department,
            justification,
            confidence,
            fallback_used,
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(i64::from(self.risk_score))
    }
}

/// Collapse every run of whitespace or control characters into one space and trim.
///
/// Keeps result text safe to drop into a single CSV row or SMS body.
pub fn sanitize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() || ch.is_control() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

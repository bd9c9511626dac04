//! One-row CSV export of a triage decision.
//!
//! Fields are quoted per RFC 4180 when they contain a comma, quote, or line
//! break. Result text is already free of control characters; the patient
//! name is sanitized here.

use chrono::{DateTime, Utc};

use triage_contracts::result::{sanitize_text, TriageResult};

pub const CSV_HEADER: &str =
    "timestamp,patient,risk_score,risk_level,department,confidence,fallback_used,justification";

/// Format one decision as a CSV row (no trailing newline).
pub fn export_row(patient: &str, result: &TriageResult, timestamp: DateTime<Utc>) -> String {
    let fields = [
        timestamp.to_rfc3339(),
        sanitize_text(patient),
        result.risk_score.to_string(),
        result.risk_level().to_string(),
        result.department.to_string(),
        format!("{:.2}", result.confidence),
        result.fallback_used.to_string(),
        result.justification.clone(),
    ];
    fields
        .iter()
        .map(|f| quote_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

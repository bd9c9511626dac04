//! Recover the JSON object a model embedded in its answer.
//!
//! Models wrap their JSON in ```json fences, prefix it with a sentence, or
//! both. Extraction prefers a fenced block; otherwise it takes the span from
//! the first '{' to the last '}'.

use triage_contracts::error::{EngineResult, TriageError};

/// Decode the JSON object embedded in `raw`.
///
/// Returns `TriageError::MalformedResponse` when no object can be found or
/// the candidate text is not valid JSON.
pub fn extract_json(raw: &str) -> EngineResult<serde_json::Value> {
    let candidate = fenced_block(raw).unwrap_or(raw);
    let start = candidate.find('{');
    let end = candidate.rfind('}');
    let object = match (start, end) {
        (Some(start), Some(end)) if start < end => &candidate[start..=end],
        _ => {
            return Err(TriageError::MalformedResponse {
                reason: "no JSON object found in response".to_string(),
            })
        }
    };

    serde_json::from_str(object).map_err(|e| TriageError::MalformedResponse {
        reason: format!("response JSON did not decode: {e}"),
    })
}

/// Body of the first ``` fenced block, with an optional language tag removed.
fn fenced_block(raw: &str) -> Option<&str> {
    let open = raw.find("```")?;
    let after_open = &raw[open + 3..];
    // Skip the info string ("json", "JSON", ...) up to the end of its line.
    let body_start = after_open.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

//! The validated shape of a remote reasoning answer.

use serde::{Deserialize, Serialize};

use crate::result::Department;

/// A remote answer that passed extraction and schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAssessment {
    pub risk_score: u8,
    pub department: Department,
    pub justification: String,
}

/// Outcome of validating one raw provider response.
///
/// There is exactly one failure branch: any missing, wrong-typed, or
/// out-of-range field lands in `Invalid` with every failure listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteVerdict {
    Valid(RemoteAssessment),
    Invalid { failures: Vec<String> },
}

//! The deterministic triage rule engine.
//!
//! `TriageRuleEngine` implements `RuleEngine` from triage-core.
//!
//! Evaluation algorithm:
//!
//! 1. Normalize the payload once (lowercased text, parsed age and BP).
//! 2. Walk the rules in their fixed order; the first rule that matches
//!    builds the result and evaluation stops.
//! 3. If nothing matched, return the low-risk baseline.
//!
//! Every path returns a complete `TriageResult` with `fallback_used = true`.

use std::path::Path;

use tracing::debug;

use triage_contracts::{
    error::{EngineResult, TriageError},
    payload::ContextualPayload,
    result::TriageResult,
};
use triage_core::traits::RuleEngine;

use crate::rule::{baseline_result, first_marker, Observation, RuleConfig, TriageRule};

/// The shipped rule thresholds, identical to `RuleConfig::default()`.
pub const DEFAULT_RULES_TOML: &str = include_str!("../policies/triage-rules.toml");

/// A `RuleEngine` built from a `RuleConfig`.
///
/// ```rust,ignore
/// use triage_rules::TriageRuleEngine;
///
/// let engine = TriageRuleEngine::from_file(Path::new("policies/triage-rules.toml"))?;
/// let result = engine.fallback_analysis(&payload);
/// ```
#[derive(Debug, Clone)]
pub struct TriageRuleEngine {
    config: RuleConfig,
    rules: Vec<TriageRule>,
}

impl TriageRuleEngine {
    /// Build from an already-parsed config, validating it first.
    pub fn new(config: RuleConfig) -> EngineResult<Self> {
        config.validate()?;
        let rules = TriageRule::ordered(&config);
        Ok(Self { config, rules })
    }

    /// Parse `s` as TOML and build the engine.
    ///
    /// Returns `TriageError::Config` if the TOML is malformed, does not match
    /// `RuleConfig`, or fails validation.
    pub fn from_toml_str(s: &str) -> EngineResult<Self> {
        let config: RuleConfig = toml::from_str(s).map_err(|e| TriageError::Config {
            reason: format!("failed to parse rule TOML: {}", e),
        })?;
        Self::new(config)
    }

    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TriageError::Config {
            reason: format!("failed to read rule file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Rule ids in evaluation order.
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(TriageRule::id).collect()
    }
}

impl Default for TriageRuleEngine {
    fn default() -> Self {
        let config = RuleConfig::default();
        let rules = TriageRule::ordered(&config);
        Self { config, rules }
    }
}

impl RuleEngine for TriageRuleEngine {
    fn fallback_analysis(&self, payload: &ContextualPayload) -> TriageResult {
        let obs = Observation::new(payload);

        debug!(
            age = obs.age,
            bp_parsed = obs.blood_pressure.is_some(),
            neuro_risk_detected = payload.neuro_risk_detected,
            "evaluating triage rules"
        );

        for rule in &self.rules {
            if let Some(result) = rule.apply(&obs) {
                debug!(
                    rule_id = rule.id(),
                    risk_score = result.risk_score,
                    department = %result.department,
                    "rule matched"
                );
                return result;
            }
        }

        debug!("no triage rule matched; using baseline");
        baseline_result(&self.config.baseline)
    }

    fn neuro_marker(&self, transcript: &str) -> Option<String> {
        let text = transcript.to_lowercase();
        self.rules.iter().find_map(|rule| match rule {
            TriageRule::Neurological(cfg) => first_marker(&text, &cfg.keywords).map(str::to_string),
            _ => None,
        })
    }
}

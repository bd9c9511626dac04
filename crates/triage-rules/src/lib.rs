//! # triage-rules
//!
//! The deterministic rule engine behind every triage fallback.
//!
//! ## Overview
//!
//! This crate provides [`TriageRuleEngine`], which implements the
//! [`RuleEngine`](triage_core::traits::RuleEngine) trait. Rules run in a
//! fixed order and the first match wins:
//!
//! 1. Hypertensive crisis (systolic > 180 or diastolic > 110) → 95, Cardiology
//! 2. Neurological emergency (sticky flag or transcript keyword) → 88, Neurology
//! 3. Diabetic history with fever or abdominal symptoms → 48/52, General Medicine
//! 4. Age ≥ 50 with any documented history → 45, General Medicine
//! 5. Baseline → 15, General Medicine
//!
//! Thresholds, scores, and keyword lists are tunable from TOML; the order is not.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use triage_rules::TriageRuleEngine;
//! use triage_core::traits::RuleEngine;
//!
//! let engine = TriageRuleEngine::default();
//! let result = engine.fallback_analysis(&payload);
//! ```

pub mod engine;
pub mod rule;

pub use engine::{TriageRuleEngine, DEFAULT_RULES_TOML};
pub use rule::{RuleConfig, TriageRule};

// ── Tests ─────────────────────────────────────────────────────────────────────

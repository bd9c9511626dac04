//! # triage-core
//!
//! The triage decision engine's orchestration layer.
//!
//! This crate provides:
//! - The four seam traits (`RuleEngine`, `ReasoningProvider`,
//!   `ResponseValidator`, `DecisionRecorder`)
//! - The `Orchestrator` that tries the remote provider under a timeout and
//!   falls back to the rule engine on any failure
//! - `TriageSession`, holding the sticky neuro flag and the in-flight guard
//! - Prompt rendering and TOML engine configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use triage_core::Orchestrator;
//!
//! let orchestrator = Orchestrator::new(Box::new(rules), Box::new(validator), Box::new(ledger))
//!     .with_provider(Box::new(provider))
//!     .with_timeout(config.remote.timeout());
//! let result = orchestrator.evaluate(&payload).await;
//! ```

pub mod config;
pub mod orchestrator;
pub mod prompt;
pub mod session;
pub mod traits;

pub use orchestrator::Orchestrator;
pub use session::{IntakeDraft, NeuroRiskState, TriageSession};

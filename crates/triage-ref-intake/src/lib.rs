//! # triage-ref-intake
//!
//! Reference intake collaborators for the triage decision engine, plus the
//! scenarios the demo CLI runs.
//!
//! - [`vitals`]: `ManualVitals` and a seeded `SimulatedVitals` wearable
//! - [`alerting`]: the score threshold that turns a result into a staff alert
//! - [`export`]: one CSV row per decision
//! - [`mock_data`]: fictional patients for scenarios A–D
//! - [`scenarios`]: end-to-end walkthroughs with real components
//!
//! All data is hardcoded and fictional. No network calls are made; the
//! remote model is replaced by a scripted provider.

pub mod alerting;
pub mod export;
pub mod mock_data;
pub mod scenarios;
pub mod vitals;

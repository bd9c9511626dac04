//! # triage-contracts
//!
//! Shared types for the triage decision engine.
//!
//! Every crate in the workspace imports from here. No decision logic lives in
//! this crate, only data definitions, defensive parsing of form values, and
//! the invariants `TriageResult` guarantees to its consumers.

pub mod decision;
pub mod error;
pub mod patient;
pub mod payload;
pub mod remote;
pub mod result;

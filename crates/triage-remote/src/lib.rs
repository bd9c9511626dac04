//! # triage-remote
//!
//! The remote reasoning provider: an async HTTP client for an
//! Ollama-compatible `/api/generate` endpoint.
//!
//! [`OllamaProvider`] implements [`triage_core::traits::ReasoningProvider`].
//! It only moves text: the orchestrator owns the timeout budget and the
//! validator decides whether the answer is usable.

pub mod ollama;

pub use ollama::OllamaProvider;

//! # triage-verify
//!
//! The trusted gate between a remote model's raw text and a triage result.
//!
//! This crate provides [`RemoteResponseValidator`], which implements the
//! [`triage_core::traits::ResponseValidator`] trait. A raw answer goes
//! through three steps:
//!
//! 1. **Extraction**: strip Markdown code fences or surrounding prose and
//!    decode the embedded JSON object.
//! 2. **Structural**: validate the object against [`assessment_schema`]
//!    using the `jsonschema` crate.
//! 3. **Semantic**: the department must name a known department.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use triage_verify::RemoteResponseValidator;
//! use triage_core::traits::ResponseValidator;
//!
//! let verdict = RemoteResponseValidator::new().validate(raw_text);
//! ```

pub mod extract;
pub mod validator;

pub use extract::extract_json;
pub use validator::{assessment_schema, RemoteResponseValidator};

//! Domain layer for verdict
//!
//! This crate contains the core types shared by the session engine.
//! It has no dependencies on backends, HTTP or configuration files.
//!
//! # Core Concepts
//!
//! ## Sessions
//!
//! A session is addressed by a [`SessionKey`] of the form
//! `{external_id}_{role}`; one external conversation owns an `expert`
//! session that answers and a `judge` session that reviews.
//!
//! ## Review
//!
//! A reviewer's raw answer is turned into a [`ReviewDecision`] by a
//! [`ValidatorDecision`]. The bundled [`JudgeDecision`] understands the
//! [`JudgeVerdict`] JSON shape and never fails: undecodable answers fall back
//! to an approval.

pub mod config;
pub mod core;
pub mod prompt;
pub mod review;
pub mod session;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{error::DomainError, model::Model};
pub use prompt::{MESSAGE_PLACEHOLDER, PromptTemplate, RESPONSE_PLACEHOLDER};
pub use review::{
    JudgeDecision, JudgeVerdict, ReviewDecision, ValidatorDecision, Verdict, parse_judge_response,
};
pub use session::key::{SessionKey, SessionRole};

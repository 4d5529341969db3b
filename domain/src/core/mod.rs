//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] — generative backend models
//! - [`error::DomainError`] — domain-level errors
//! - [`string::truncate`] — log-friendly previews of long texts

pub mod error;
pub mod model;
pub mod string;

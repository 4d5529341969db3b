//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid session key: {0}")]
    InvalidSessionKey(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Invalid validator id: {0}")]
    InvalidValidatorId(String),
}

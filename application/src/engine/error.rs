//! Engine error types

use crate::ports::llm_gateway::GatewayError;
use thiserror::Error;

/// Errors that abort a [`Session::send`](super::Session::send) call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Backend call failed for session {session}: {source}")]
    Backend {
        session: String,
        #[source]
        source: GatewayError,
    },
}

impl SessionError {
    pub fn backend(session: impl Into<String>, source: GatewayError) -> Self {
        SessionError::Backend {
            session: session.into(),
            source,
        }
    }

    /// The underlying backend error
    pub fn gateway_error(&self) -> &GatewayError {
        match self {
            SessionError::Backend { source, .. } => source,
        }
    }
}

/// Errors raised when attaching a validator to a session
///
/// Duplicate registrations are not errors; they are ignored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Validator id must not be empty")]
    EmptyId,

    #[error("Validator '{validator}' would make session {session} validate itself")]
    Cycle { validator: String, session: String },
}

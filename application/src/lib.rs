//! Application layer for verdict
//!
//! This crate contains the session engine (registry, reviewed sessions and
//! validator fan-out), the ports it needs from the outside world, and the
//! expert/judge use case. It depends only on the domain layer.

pub mod config;
pub mod engine;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{DEFAULT_JUDGE_ID, PanelConfig, SessionParams};
pub use engine::{
    RegistrationError, SendOutcome, Session, SessionError, SessionRegistry, ValidatorBinding,
};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
};
pub use use_cases::ask_expert::{
    AskExpertError, AskExpertInput, AskExpertOutput, AskExpertUseCase,
};

//! Infrastructure layer for verdict
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Gemini REST gateway, configuration file
//! loading and the JSONL conversation transcript.

pub mod config;
pub mod gemini;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBackendConfig, FileConfig, FileLoggingConfig,
    FilePromptsConfig, FileServerConfig, FileSessionsConfig,
};
pub use gemini::{
    error::GeminiError,
    gateway::{GeminiConfig, GeminiGateway},
    session::GeminiSession,
};
pub use logging::JsonlConversationLogger;

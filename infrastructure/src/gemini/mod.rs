//! Gemini REST adapter
//!
//! Implements the [`LlmGateway`](verdict_application::LlmGateway) port on top
//! of the `generateContent` endpoint of the Gemini API.

pub mod error;
pub mod gateway;
pub mod session;
pub mod types;

//! Presentation layer for verdict
//!
//! This crate contains the CLI definition, the HTTP surface (axum router
//! with cookie sessions and CORS) and console output formatting.

pub mod cli;
pub mod output;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use server::{CookieSettings, ServerSettings, create_router};

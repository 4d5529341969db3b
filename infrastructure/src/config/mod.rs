//! Configuration file loading for verdict
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `VERDICT_*` environment variables (plus `GEMINI_API_KEY` / `API_KEY`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./verdict.toml` or `./.verdict.toml`
//! 4. Global: `~/.config/verdict/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBackendConfig, FileConfig, FileLoggingConfig, FilePromptsConfig,
    FileServerConfig, FileSessionsConfig,
};
pub use loader::ConfigLoader;

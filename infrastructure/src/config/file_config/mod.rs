//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section converts into the application type it configures.

mod backend;
mod logging;
mod prompts;
mod server;
mod sessions;

pub use backend::FileBackendConfig;
pub use logging::FileLoggingConfig;
pub use prompts::FilePromptsConfig;
pub use server::FileServerConfig;
pub use sessions::FileSessionsConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use verdict_domain::{MESSAGE_PLACEHOLDER, RESPONSE_PLACEHOLDER};

/// Problems found in a loaded configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("backend.api_key is not set (use API_KEY, GEMINI_API_KEY or VERDICT_BACKEND__API_KEY)")]
    MissingApiKey,

    #[error("backend.model cannot be empty")]
    EmptyModelName,

    #[error("sessions.ttl_secs cannot be 0")]
    ZeroTtl,

    #[error("prompts.judge_id cannot be empty")]
    EmptyJudgeId,

    #[error("prompts.validator_prompt does not contain {placeholder}")]
    MissingPlaceholder { placeholder: &'static str },

    #[error("server.allowed_origins is empty; browsers will not be able to call the API")]
    NoAllowedOrigins,
}

impl ConfigValidationError {
    /// Whether the application cannot run with this problem
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConfigValidationError::MissingApiKey
                | ConfigValidationError::EmptyModelName
                | ConfigValidationError::ZeroTtl
                | ConfigValidationError::EmptyJudgeId
        )
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Generative backend connection
    pub backend: FileBackendConfig,
    /// Session registry and send loop
    pub sessions: FileSessionsConfig,
    /// Expert/judge prompts
    pub prompts: FilePromptsConfig,
    /// HTTP surface
    pub server: FileServerConfig,
    /// Log output
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if !self.backend.has_api_key() {
            issues.push(ConfigValidationError::MissingApiKey);
        }
        if self.backend.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName);
        }
        if self.sessions.ttl_secs == 0 {
            issues.push(ConfigValidationError::ZeroTtl);
        }
        if self
            .prompts
            .judge_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            issues.push(ConfigValidationError::EmptyJudgeId);
        }
        if let Some(prompt) = &self.prompts.validator_prompt {
            for placeholder in [MESSAGE_PLACEHOLDER, RESPONSE_PLACEHOLDER] {
                if !prompt.contains(placeholder) {
                    issues.push(ConfigValidationError::MissingPlaceholder { placeholder });
                }
            }
        }
        if self.server.allowed_origins.is_empty() {
            issues.push(ConfigValidationError::NoAllowedOrigins);
        }

        issues
    }
}

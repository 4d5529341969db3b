//! Backend configuration from TOML (`[backend]` section)

use crate::gemini::gateway::{DEFAULT_BASE_URL, GeminiConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use verdict_domain::Model;

/// Raw backend configuration from TOML
///
/// # Example
///
/// ```toml
/// [backend]
/// api_key = "..."                # or API_KEY / GEMINI_API_KEY
/// model = "gemini-2.5-flash"
/// max_output_tokens = 2048
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_output_tokens: Option<u32>,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: Model::default().to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_output_tokens: None,
        }
    }
}

impl FileBackendConfig {
    pub fn model(&self) -> Model {
        Model::from(self.model.trim())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    pub fn to_gemini_config(&self, request_timeout: Option<Duration>) -> GeminiConfig {
        GeminiConfig::new(self.api_key.clone().unwrap_or_default())
            .with_base_url(self.base_url.clone())
            .with_max_output_tokens(self.max_output_tokens)
            .with_request_timeout(request_timeout)
    }
}

//! Gemini LLM Gateway implementation

use super::error::{GeminiError, Result};
use super::session::GeminiSession;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;
use verdict_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use verdict_domain::Model;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for the Gemini REST API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub max_output_tokens: Option<u32>,
    /// Transport-level timeout; `None` leaves timing to the session engine
    pub request_timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_output_tokens: None,
            request_timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_output_tokens(mut self, max: Option<u32>) -> Self {
        self.max_output_tokens = max;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// LLM Gateway implementation for the Gemini REST API
pub struct GeminiGateway {
    client: Client,
    config: GeminiConfig,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GeminiError::MissingApiKey);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        info!(base_url = %config.base_url, "GeminiGateway initialized");

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn open(&self, model: &Model, system_prompt: Option<&str>) -> GeminiSession {
        GeminiSession::new(
            self.client.clone(),
            &self.config.base_url,
            self.config.api_key.as_str(),
            model.clone(),
            system_prompt,
            self.config.max_output_tokens,
        )
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn create_session(&self, model: &Model) -> std::result::Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(self.open(model, None)))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> std::result::Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(self.open(model, Some(system_prompt))))
    }
}

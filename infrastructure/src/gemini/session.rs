//! Gemini conversation handle
//!
//! The `generateContent` endpoint is stateless, so the session keeps the
//! conversation history locally and sends all of it with every call. A turn
//! is appended only after the backend answered, so a failed call leaves the
//! history untouched and can be retried as is.

use super::error::{GeminiError, Result};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, error_message};
use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::debug;
use verdict_application::ports::llm_gateway::{GatewayError, LlmSession};
use verdict_domain::Model;

pub(crate) const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiSession {
    client: Client,
    endpoint: String,
    api_key: String,
    model: Model,
    system_instruction: Option<Content>,
    generation_config: Option<GenerationConfig>,
    /// Completed turns, alternating user and model
    history: Mutex<Vec<Content>>,
}

impl GeminiSession {
    pub fn new(
        client: Client,
        base_url: &str,
        api_key: impl Into<String>,
        model: Model,
        system_prompt: Option<&str>,
        max_output_tokens: Option<u32>,
    ) -> Self {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model.as_str()
        );

        Self {
            client,
            endpoint,
            api_key: api_key.into(),
            model,
            system_instruction: system_prompt
                .filter(|prompt| !prompt.trim().is_empty())
                .map(Content::system),
            generation_config: max_output_tokens.map(|max_output_tokens| GenerationConfig {
                max_output_tokens,
            }),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of completed turns (user and model messages)
    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    async fn generate(&self, contents: &[Content]) -> Result<String> {
        let request = GenerateContentRequest {
            contents,
            system_instruction: self.system_instruction.as_ref(),
            generation_config: self.generation_config,
        };

        debug!(
            model = %self.model,
            messages = contents.len(),
            "Calling Gemini generateContent"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GeminiError::Status {
                status,
                message: error_message(&body),
            });
        }

        serde_json::from_str::<GenerateContentResponse>(&body)
            .map_err(|e| GeminiError::ParseError(e.to_string()))?
            .into_text()
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> std::result::Result<String, GatewayError> {
        // Held across the call: turns of one conversation are strictly ordered
        let mut history = self.history.lock().await;

        let mut contents = Vec::with_capacity(history.len() + 1);
        contents.extend(history.iter().cloned());
        contents.push(Content::user(content));

        let reply = self.generate(&contents).await?;

        history.push(Content::user(content));
        history.push(Content::model(reply.as_str()));
        Ok(reply)
    }
}

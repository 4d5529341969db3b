//! Error types for the Gemini adapter

use reqwest::StatusCode;
use thiserror::Error;
use verdict_application::ports::llm_gateway::GatewayError;

/// Result type alias for Gemini operations
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors that can occur when talking to the Gemini REST API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Gemini API key is not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Gemini API returned no text in the response candidates")]
    EmptyResponse,

    #[error("Failed to parse Gemini response: {0}")]
    ParseError(String),
}

impl From<GeminiError> for GatewayError {
    fn from(error: GeminiError) -> Self {
        match error {
            GeminiError::MissingApiKey => GatewayError::SessionError(error.to_string()),
            GeminiError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            GeminiError::Http(e) if e.is_connect() => GatewayError::ConnectionError(e.to_string()),
            GeminiError::Http(e) => GatewayError::RequestFailed(e.to_string()),
            GeminiError::Status { status, message } => match status {
                StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited(message),
                StatusCode::NOT_FOUND => GatewayError::ModelNotAvailable(message),
                s if s.is_server_error() => GatewayError::Unavailable(format!("{}: {}", s, message)),
                s => GatewayError::RequestFailed(format!("{}: {}", s, message)),
            },
            GeminiError::EmptyResponse | GeminiError::ParseError(_) => {
                GatewayError::RequestFailed(error.to_string())
            }
        }
    }
}

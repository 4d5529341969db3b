//! HTTP error responses

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;
use verdict_application::AskExpertError;

/// JSON error body: `{error, message}`
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn status_for(error: &AskExpertError) -> StatusCode {
        match error {
            AskExpertError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AskExpertError::SessionUnavailable(_) | AskExpertError::Send(_) => {
                StatusCode::BAD_GATEWAY
            }
            AskExpertError::Registration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn from_error(error: &AskExpertError) -> (StatusCode, Json<ApiError>) {
        let code = match error {
            AskExpertError::InvalidInput(_) => "invalid_request",
            AskExpertError::SessionUnavailable(_) | AskExpertError::Send(_) => "backend_error",
            AskExpertError::Registration(_) => "internal_error",
        };
        (
            Self::status_for(error),
            Json(ApiError {
                error: code,
                message: error.to_string(),
            }),
        )
    }
}

//! HTTP surface
//!
//! - `POST /prompt` - send `{message}` through the caller's expert session
//! - `GET /health`  - liveness check
//!
//! The caller's conversation is identified by the session cookie; the
//! registry behind the use case is shared by all requests.

mod cookie;
mod error;

pub use cookie::CookieSettings;
pub use error::ApiError;

use crate::output::response::PromptResponse;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use verdict_application::{AskExpertInput, AskExpertUseCase, LlmGateway};

/// Settings of the HTTP surface
#[derive(Debug, Clone, Default)]
pub struct ServerSettings {
    /// Origins allowed to call the API with credentials
    pub allowed_origins: Vec<String>,
    pub cookie: CookieSettings,
}

/// Application state shared by all handlers
pub struct AppState<G: LlmGateway + 'static> {
    pub use_case: Arc<AskExpertUseCase<G>>,
    pub cookie: CookieSettings,
}

impl<G: LlmGateway + 'static> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            use_case: Arc::clone(&self.use_case),
            cookie: self.cookie.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Create the router
pub fn create_router<G: LlmGateway + 'static>(
    use_case: Arc<AskExpertUseCase<G>>,
    settings: &ServerSettings,
) -> Router {
    let state = AppState {
        use_case,
        cookie: settings.cookie.clone(),
    };

    Router::new()
        .route("/prompt", post(prompt::<G>))
        .route("/health", get(health_check))
        .layer(cors_layer(&settings.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Send one message through the caller's expert/judge pair
async fn prompt<G: LlmGateway + 'static>(
    State(state): State<AppState<G>>,
    headers: HeaderMap,
    Json(request): Json<PromptRequest>,
) -> Response {
    let (session_id, created) = state.cookie.read_or_create(&headers);
    if created {
        info!(session = %session_id, "New session cookie issued");
    }
    let set_cookie = [(header::SET_COOKIE, state.cookie.set_cookie(&session_id))];

    match state
        .use_case
        .execute(AskExpertInput::new(session_id.as_str(), request.message))
        .await
    {
        Ok(output) => (set_cookie, Json(PromptResponse::from(&output))).into_response(),
        Err(e) => {
            warn!(session = %session_id, "Prompt failed: {}", e);
            (set_cookie, ApiError::from_error(&e)).into_response()
        }
    }
}

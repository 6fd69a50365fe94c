//! HTTP surface: a health endpoint and the chat endpoint. Thin glue; all
//! decision logic lives in the orchestrator.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cbot_dispatch::Orchestrator;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use uuid::Uuid;

/// Session header; requests without it share the default session.
const SESSION_HEADER: &str = "x-session-id";
const DEFAULT_SESSION: &str = "default";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Chat request body. `test_address_override` substitutes the peer address
/// for geolocation (exercised by tests and local tooling).
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, alias = "testAddressOverride")]
    pub test_address_override: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Builds the router with CORS for the given origins.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/chat", post(chat))
        .layer(cors)
        .with_state(state)
}

async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": "Chatbot API is running!"}))
}

async fn chat(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Response {
    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_SESSION)
        .to_string();
    let client_addr = request
        .test_address_override
        .clone()
        .unwrap_or_else(|| addr.ip().to_string());
    let request_id = Uuid::new_v4();

    info!(
        request_id = %request_id,
        session_id = %session_id,
        message_len = request.message.len(),
        "received chat message"
    );

    match state
        .orchestrator
        .handle(&request.message, Some(&client_addr), &session_id)
        .await
    {
        Ok(text) => {
            info!(request_id = %request_id, reply_len = text.len(), "chat handled");
            (StatusCode::OK, Json(ChatResponse { response: text })).into_response()
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "chat request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Internal Server Error"})),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_accepts_snake_and_camel_case_override() {
        let snake: ChatRequest =
            serde_json::from_str(r#"{"message": "hi", "test_address_override": "1.2.3.4"}"#)
                .unwrap();
        assert_eq!(snake.test_address_override.as_deref(), Some("1.2.3.4"));

        let camel: ChatRequest =
            serde_json::from_str(r#"{"message": "hi", "testAddressOverride": "5.6.7.8"}"#)
                .unwrap();
        assert_eq!(camel.test_address_override.as_deref(), Some("5.6.7.8"));

        let plain: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert!(plain.test_address_override.is_none());
    }
}

//! Integration tests for the HTTP surface: health endpoint, chat routing
//! through the real component assembly (paths that need no network), and
//! request-shape validation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use cbot_dispatch::Orchestrator;
use cbot_server::{build_components, build_router, AppState, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_config() -> ServerConfig {
    ServerConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        allowed_origins: vec!["http://localhost:5173".to_string()],
        log_file: "logs/test.log".to_string(),
        openai_api_key: "test-key".to_string(),
        openai_base_url: None,
        model: "gpt-4".to_string(),
        weather_api_key: None,
        news_api_key: None,
        default_location: None,
    }
}

fn test_router() -> axum::Router {
    let components = build_components(&test_config()).expect("components must build");
    let state = AppState {
        orchestrator: Arc::new(Orchestrator::new(components)),
    };
    build_router(state, &["http://localhost:5173".to_string()])
}

fn chat_request(body: Value) -> Request<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request must build");
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));
    request
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body must read");
    serde_json::from_slice(&bytes).expect("body must be JSON")
}

/// **Test: the health endpoint reports the API is running.**
#[tokio::test]
async fn home_reports_running() {
    let response = test_router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Chatbot API is running!");
}

/// **Test: a market question routes to the stocks stub end to end.**
#[tokio::test]
async fn chat_routes_stocks_stub() {
    let response = test_router()
        .oneshot(chat_request(json!({"message": "How's the nasdaq doing?"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let reply = body["response"].as_str().unwrap();
    assert!(reply.contains("not yet implemented"), "reply: {reply}");
}

/// **Test: a weather question without a configured key reports it.**
#[tokio::test]
async fn chat_weather_without_key_reports_configuration() {
    let response = test_router()
        .oneshot(chat_request(json!({"message": "What's the weather in Phoenix?"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["response"],
        "Weather API key is missing. Please configure it."
    );
}

/// **Test: a body without a message is rejected before the orchestrator.**
#[tokio::test]
async fn chat_without_message_is_unprocessable() {
    let response = test_router()
        .oneshot(chat_request(json!({"testAddressOverride": "1.2.3.4"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

//! # cbot-server
//!
//! HTTP boundary for the chatbot backend: component assembly from config,
//! the axum router (CORS + `POST /chat`), and the serve loop.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use cbot_dispatch::{Components, Orchestrator};
use cbot_llm::{LlmClient, OpenAiChatClient};
use cbot_memory::SessionStore;
use cbot_nlu::{EntityExtractor, IntentDetector, KeywordIntentModel, PatternEntityModel};
use cbot_services::{GeoService, NewsService, WeatherService};
use tracing::info;

pub mod config;
pub mod routes;

pub use config::ServerConfig;
pub use routes::{build_router, AppState, ChatRequest, ChatResponse};

/// Builds the orchestrator's components from config. Fails fast when the
/// entity model cannot load; the server must not serve requests without it.
pub fn build_components(config: &ServerConfig) -> Result<Components> {
    let entity_model = Arc::new(PatternEntityModel::load()?);

    let llm: Arc<dyn LlmClient> = match &config.openai_base_url {
        Some(base_url) => Arc::new(OpenAiChatClient::with_base_url(
            config.openai_api_key.clone(),
            base_url.clone(),
            config.model.clone(),
        )),
        None => Arc::new(OpenAiChatClient::new(
            config.openai_api_key.clone(),
            config.model.clone(),
        )),
    };

    Ok(Components {
        intents: IntentDetector::new(Arc::new(KeywordIntentModel::new())),
        entities: EntityExtractor::new(entity_model),
        weather: WeatherService::new(config.weather_api_key.clone())?,
        news: NewsService::new(config.news_api_key.clone())?,
        geo: GeoService::new()?,
        llm,
        sessions: SessionStore::new(),
        default_location: config.default_location.clone(),
    })
}

/// Validates config, assembles components, and serves until shutdown.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    config.validate()?;
    let components = build_components(&config)?;
    let state = AppState {
        orchestrator: Arc::new(Orchestrator::new(components)),
    };
    let router = build_router(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "chatbot API listening");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

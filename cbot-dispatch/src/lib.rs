//! # cbot-dispatch
//!
//! The orchestrator: detects the intent of a user message, extracts
//! entities with that intent as a hint, and routes to the matching handler.
//! Expected failures (missing location, upstream fetch errors) come back as
//! displayable text; only capability errors propagate to the boundary.

use std::sync::Arc;

use cbot_core::{BotError, ChatTurn, EntityBag, EntityLabel, Intent, PeriodTag};
use cbot_llm::LlmClient;
use cbot_memory::SessionStore;
use cbot_nlu::{
    detect_news_category, detect_temperature_unit, detect_time_period, extract_news_query,
    normalize_period, EntityExtractor, IntentDetector,
};
use cbot_services::{GeoService, NewsService, WeatherService};
use tracing::{info, instrument};

const SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

const MSG_NEED_LOCATION: &str = "I need a location to fetch weather details.";
const MSG_STOCKS_STUB: &str =
    "Stock market lookups are not yet implemented. Check back soon!";

/// Everything the orchestrator needs; produced by the boundary layer at
/// startup so no handler reads ambient state.
pub struct Components {
    pub intents: IntentDetector,
    pub entities: EntityExtractor,
    pub weather: WeatherService,
    pub news: NewsService,
    pub geo: GeoService,
    pub llm: Arc<dyn LlmClient>,
    pub sessions: SessionStore,
    /// Fallback city when a weather request names none.
    pub default_location: Option<String>,
}

/// Routes one user message to the weather, news, stocks, or conversational
/// handler.
pub struct Orchestrator {
    components: Components,
}

impl Orchestrator {
    pub fn new(components: Components) -> Self {
        Self { components }
    }

    /// Handles one message. `client_addr` feeds the geolocation fallback;
    /// `session_id` scopes the conversational history.
    #[instrument(skip(self, message))]
    pub async fn handle(
        &self,
        message: &str,
        client_addr: Option<&str>,
        session_id: &str,
    ) -> cbot_core::Result<String> {
        let intent = self.components.intents.detect(message).await;
        let entities = self
            .components
            .entities
            .extract(message, Some(intent))
            .await?;
        info!(intent = %intent, entities = entities.total(), "routing request");

        match intent {
            Intent::Weather => Ok(self.handle_weather(message, &entities, client_addr).await),
            Intent::News => Ok(self.handle_news(message).await),
            Intent::Stocks => Ok(MSG_STOCKS_STUB.to_string()),
            Intent::Casual | Intent::General => self.handle_chat(message, session_id).await,
        }
    }

    async fn handle_weather(
        &self,
        message: &str,
        entities: &EntityBag,
        client_addr: Option<&str>,
    ) -> String {
        let Some(city) = self.resolve_location(entities, client_addr).await else {
            info!("no location resolved for weather request");
            return MSG_NEED_LOCATION.to_string();
        };
        let unit = detect_temperature_unit(message).unwrap_or_default();
        let period = resolve_period(entities, message);
        info!(city = %city, unit = %unit.api_value(), period = ?period.map(|p| p.as_str()), "handling weather request");
        self.components.weather.weather_reply(&city, unit, period).await
    }

    /// Location fallback chain: entity span, configured default, then
    /// geolocation of the client address.
    async fn resolve_location(
        &self,
        entities: &EntityBag,
        client_addr: Option<&str>,
    ) -> Option<String> {
        if let Some(city) = entities.first(EntityLabel::Gpe) {
            return Some(city.to_string());
        }
        if let Some(city) = &self.components.default_location {
            info!(city = %city, "using configured default location");
            return Some(city.clone());
        }
        let addr = client_addr?;
        self.components
            .geo
            .lookup(addr)
            .await
            .and_then(|location| location.city)
    }

    async fn handle_news(&self, message: &str) -> String {
        let category = detect_news_category(message);
        let query = extract_news_query(message);
        info!(category = ?category.map(|c| c.as_str()), query = ?query, "handling news request");
        self.components
            .news
            .headlines_reply(category, query.as_deref())
            .await
    }

    async fn handle_chat(&self, message: &str, session_id: &str) -> cbot_core::Result<String> {
        let sessions = &self.components.sessions;
        if sessions.is_empty(session_id).await {
            sessions.append(session_id, ChatTurn::system(SYSTEM_PROMPT)).await;
        }
        sessions.append(session_id, ChatTurn::user(message)).await;

        let history = sessions.history(session_id).await;
        let reply = self
            .components
            .llm
            .complete(history)
            .await
            .map_err(|e| BotError::Llm(e.to_string()))?;

        sessions
            .append(session_id, ChatTurn::assistant(reply.clone()))
            .await;
        Ok(reply)
    }
}

/// Resolves the forecast period: the first DATE span that normalizes, then
/// the first TIME span, then the raw text. A date or time span that names no
/// known period still means a forecast was asked for, so it falls back to
/// tomorrow rather than current conditions.
pub fn resolve_period(entities: &EntityBag, text: &str) -> Option<PeriodTag> {
    for span in entities.spans(EntityLabel::Date) {
        if let Some(tag) = normalize_period(span) {
            return Some(tag);
        }
    }
    for span in entities.spans(EntityLabel::Time) {
        if let Some(tag) = normalize_period(span) {
            return Some(tag);
        }
    }
    if let Some(period) = detect_time_period(text) {
        return Some(period.tag);
    }
    if !entities.spans(EntityLabel::Date).is_empty()
        || !entities.spans(EntityLabel::Time).is_empty()
    {
        info!("unrecognized time span; defaulting to tomorrow forecast");
        return Some(PeriodTag::Tomorrow);
    }
    None
}

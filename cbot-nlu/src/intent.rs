//! Intent detection: an ordered rule cascade with a statistical-classifier
//! seam behind it.
//!
//! The cascade is first-match-wins and entirely table-driven so the ordering
//! stays auditable: market markers, then the "news" literal, then simple
//! weather phrases, then the per-intent keyword table. Only when every rule
//! misses is the classifier consulted, and its prediction is logged rather
//! than routed on.

use std::sync::Arc;

use cbot_core::Intent;
use tracing::{debug, warn};

use crate::model::IntentModel;

/// Literal substrings that always mean a market request.
const STOCK_MARKERS: &[&str] = &["nasdaq", "dow", "s&p"];

/// Simple weather phrasings checked before the keyword table.
const WEATHER_PHRASES: &[&str] = &[
    "what's the weather",
    "whats the weather",
    "how is the weather",
    "how's the weather",
    "current weather",
    "weather forecast",
    "temperature in",
    "temperature today",
    "is it raining",
];

/// Per-intent keyword table, evaluated in order. Keywords with a space match
/// as substrings; single words must appear as a whole token.
pub(crate) const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Weather,
        &[
            "weather",
            "temperature",
            "forecast",
            "rain",
            "snow",
            "sunny",
            "cloudy",
            "humid",
            "windy",
        ],
    ),
    (
        Intent::News,
        &["news", "headline", "headlines", "breaking", "current events"],
    ),
    (
        Intent::Casual,
        &[
            "how are you",
            "tell me a joke",
            "who are you",
            "hello",
            "hi",
            "hey",
            "thanks",
            "thank you",
            "joke",
        ],
    ),
    (
        Intent::Stocks,
        &["stock", "stocks", "share price", "market", "ticker"],
    ),
];

/// Applies the rule cascade to lowercased text. `None` means no rule matched
/// and the caller should fall back to the default intent.
pub fn rule_intent(lower: &str) -> Option<Intent> {
    if STOCK_MARKERS.iter().any(|m| lower.contains(m)) {
        return Some(Intent::Stocks);
    }
    if lower.contains("news") {
        return Some(Intent::News);
    }
    if WEATHER_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some(Intent::Weather);
    }

    let tokens: Vec<&str> = lower
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .collect();
    for (intent, keywords) in INTENT_KEYWORDS {
        for keyword in *keywords {
            let hit = if keyword.contains(' ') {
                lower.contains(keyword)
            } else {
                tokens.iter().any(|t| t == keyword)
            };
            if hit {
                return Some(*intent);
            }
        }
    }
    None
}

/// Intent detector: rule cascade first, then the classifier seam for
/// observability, then the `general` default.
#[derive(Clone)]
pub struct IntentDetector {
    model: Arc<dyn IntentModel>,
}

impl IntentDetector {
    pub fn new(model: Arc<dyn IntentModel>) -> Self {
        Self { model }
    }

    /// Detects the intent for `text`. Never fails: a classifier error is
    /// logged and the result falls back to [`Intent::General`].
    pub async fn detect(&self, text: &str) -> Intent {
        let lower = text.to_lowercase();
        if let Some(intent) = rule_intent(&lower) {
            debug!(intent = %intent, "intent matched by rule cascade");
            return intent;
        }

        match self.model.classify(text).await {
            Ok(prediction) => {
                debug!(
                    label = %prediction.label,
                    confidence = prediction.confidence,
                    "classifier prediction (observational only)"
                );
            }
            Err(e) => {
                warn!(error = %e, "intent classifier failed; defaulting to general");
            }
        }
        Intent::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cbot_core::BotError;

    use crate::model::{IntentPrediction, KeywordIntentModel};

    struct FailingModel;

    #[async_trait]
    impl IntentModel for FailingModel {
        async fn classify(&self, _text: &str) -> Result<IntentPrediction, BotError> {
            Err(BotError::IntentModel("model not loaded".to_string()))
        }
    }

    fn detector() -> IntentDetector {
        IntentDetector::new(Arc::new(KeywordIntentModel::new()))
    }

    #[tokio::test]
    async fn market_markers_win_over_everything() {
        let d = detector();
        assert_eq!(d.detect("Any news on the Nasdaq today?").await, Intent::Stocks);
        assert_eq!(d.detect("how did the S&P close").await, Intent::Stocks);
    }

    #[tokio::test]
    async fn news_literal_matches() {
        let d = detector();
        assert_eq!(d.detect("Tell me the latest news!").await, Intent::News);
    }

    #[tokio::test]
    async fn weather_phrases_match() {
        let d = detector();
        assert_eq!(d.detect("What's the weather in Phoenix?").await, Intent::Weather);
        assert_eq!(
            d.detect("What is the temperature in London?").await,
            Intent::Weather
        );
    }

    #[tokio::test]
    async fn keyword_table_matches_whole_tokens() {
        let d = detector();
        // "stock" as a whole token
        assert_eq!(
            d.detect("What's the stock price of Apple?").await,
            Intent::Stocks
        );
        // "hi" must not match inside "this"
        assert_eq!(d.detect("is this sentence plain?").await, Intent::General);
    }

    #[tokio::test]
    async fn casual_phrases_match_as_substrings() {
        let d = detector();
        assert_eq!(d.detect("Who are you?").await, Intent::Casual);
        assert_eq!(d.detect("hey, tell me a joke").await, Intent::Casual);
    }

    #[tokio::test]
    async fn unmatched_text_defaults_to_general() {
        let d = detector();
        assert_eq!(d.detect("I love programming!").await, Intent::General);
    }

    #[tokio::test]
    async fn classifier_failure_is_never_fatal() {
        let d = IntentDetector::new(Arc::new(FailingModel));
        assert_eq!(d.detect("I love programming!").await, Intent::General);
    }

    #[test]
    fn rule_cascade_order_is_stocks_news_weather() {
        // "news" literal beats the weather keyword table...
        assert_eq!(rule_intent("weather news roundup"), Some(Intent::News));
        // ...and market markers beat the news literal.
        assert_eq!(rule_intent("dow jones news"), Some(Intent::Stocks));
    }
}

//! Capability seams for the NLU models.
//!
//! The extractor and detector do not know how spans or labels are produced;
//! they depend on these traits. Production wiring uses [`PatternEntityModel`]
//! and [`KeywordIntentModel`]; tests substitute hand-written mocks.
//!
//! [`PatternEntityModel`]: crate::pattern::PatternEntityModel

use async_trait::async_trait;
use cbot_core::{BotError, Intent};

use crate::intent::INTENT_KEYWORDS;

/// A labeled span of input text as produced by the entity model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub text: String,
    /// Tagset name ("GPE", "PERSON", ...); labels outside the tracked set are
    /// dropped by the extractor.
    pub label: String,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Named-entity recognition capability: text in, labeled spans out, in order
/// of appearance.
#[async_trait]
pub trait EntityModel: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Vec<EntitySpan>, BotError>;
}

/// A label with a confidence score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentPrediction {
    pub label: String,
    pub confidence: f32,
}

/// Statistical intent-classification capability. The detector consults it
/// only after every rule missed; its output is logged but does not change
/// the routed intent.
#[async_trait]
pub trait IntentModel: Send + Sync {
    async fn classify(&self, text: &str) -> Result<IntentPrediction, BotError>;
}

/// Keyword-overlap classifier: scores each intent by how many of its
/// keywords occur in the text and reports the best as label + confidence.
/// Stands in for a trained model in default wiring.
#[derive(Debug, Clone, Default)]
pub struct KeywordIntentModel;

impl KeywordIntentModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IntentModel for KeywordIntentModel {
    async fn classify(&self, text: &str) -> Result<IntentPrediction, BotError> {
        let lower = text.to_lowercase();
        let mut best: (Intent, usize, usize) = (Intent::General, 0, 1);
        for (intent, keywords) in INTENT_KEYWORDS {
            let hits = keywords.iter().filter(|k| lower.contains(*k)).count();
            if hits > best.1 {
                best = (*intent, hits, keywords.len());
            }
        }
        let (intent, hits, total) = best;
        let confidence = if hits == 0 {
            0.0
        } else {
            (hits as f32 / total as f32).min(1.0)
        };
        Ok(IntentPrediction {
            label: intent.as_str().to_string(),
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keyword_model_scores_weather_text() {
        let model = KeywordIntentModel::new();
        let prediction = model
            .classify("will it rain or snow this weekend")
            .await
            .unwrap();
        assert_eq!(prediction.label, "weather");
        assert!(prediction.confidence > 0.0);
    }

    #[tokio::test]
    async fn keyword_model_defaults_to_general_with_zero_confidence() {
        let model = KeywordIntentModel::new();
        let prediction = model.classify("I enjoy painting landscapes").await.unwrap();
        assert_eq!(prediction.label, "general");
        assert_eq!(prediction.confidence, 0.0);
    }
}

//! # cbot-nlu
//!
//! Language understanding for the chatbot backend: intent detection (rule
//! cascade with a statistical-classifier seam), entity extraction (with
//! weather-specific gazetteer disambiguation), and slot detectors for news
//! category, news query, temperature unit, and forecast time period.

pub mod entity;
pub mod intent;
pub mod model;
pub mod pattern;
pub mod slots;
pub mod time;

pub use entity::EntityExtractor;
pub use intent::{rule_intent, IntentDetector};
pub use model::{EntityModel, EntitySpan, IntentModel, IntentPrediction, KeywordIntentModel};
pub use pattern::PatternEntityModel;
pub use slots::{detect_news_category, detect_temperature_unit, extract_news_query};
pub use time::{detect_time_period, normalize_period};

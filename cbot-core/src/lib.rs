//! # cbot-core
//!
//! Shared types and infrastructure for the chatbot backend: intent and entity
//! vocabulary, conversation turns, the error taxonomy, and tracing setup.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{BotError, Result};
pub use types::{
    weekday_name, ChatTurn, EntityBag, EntityLabel, Intent, NewsCategory, PeriodTag, Role,
    TemperatureUnit, TimePeriod,
};

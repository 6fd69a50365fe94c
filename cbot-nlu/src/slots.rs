//! Slot detectors: secondary parameters derived from raw text beyond the
//! top-level intent. All pure functions over fixed priority tables.

use cbot_core::{NewsCategory, TemperatureUnit};

/// Per-category keyword table, evaluated in insertion order; the first
/// category with any substring hit wins.
const NEWS_CATEGORY_KEYWORDS: &[(NewsCategory, &[&str])] = &[
    (
        NewsCategory::Business,
        &["business", "economy", "economic", "finance", "financial"],
    ),
    (
        NewsCategory::Technology,
        &["technology", "tech", "gadget", "software", "hardware", "ai "],
    ),
    (
        NewsCategory::Health,
        &["health", "medical", "medicine", "disease", "wellness"],
    ),
    (
        NewsCategory::Science,
        &["science", "scientific", "research", "space", "astronomy"],
    ),
    (
        NewsCategory::Sports,
        &["sports", "sport", "football", "basketball", "baseball", "soccer"],
    ),
    (
        NewsCategory::Entertainment,
        &["entertainment", "movie", "movies", "music", "celebrity", "film"],
    ),
];

/// Phrases that introduce a free-text news topic, in priority order.
const QUERY_INDICATORS: &[&str] = &[
    "about",
    "on",
    "regarding",
    "related to",
    "search for",
    "find",
    "look up",
    "tell me about",
];

/// Substrings that signal a Celsius preference. Checked before Fahrenheit.
const CELSIUS_MARKERS: &[&str] = &["celsius", "centigrade", "°c", "metric"];

/// Substrings that signal a Fahrenheit preference.
const FAHRENHEIT_MARKERS: &[&str] = &["fahrenheit", "°f", "imperial"];

/// Returns the first news category whose keyword list has a substring hit.
pub fn detect_news_category(text: &str) -> Option<NewsCategory> {
    let lower = text.to_lowercase();
    for (category, keywords) in NEWS_CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| lower.contains(k)) {
            return Some(*category);
        }
    }
    None
}

/// Extracts a free-text news topic: the trimmed remainder after the first
/// indicator phrase found in the text. Indicators match as whole words so
/// that "on" cannot fire inside "London".
pub fn extract_news_query(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    for indicator in QUERY_INDICATORS {
        let padded = format!(" {} ", indicator);
        if let Some(pos) = lower.find(&padded) {
            let remainder = lower[pos + padded.len()..].trim();
            if !remainder.is_empty() {
                return Some(remainder.to_string());
            }
        }
    }
    None
}

/// Detects an explicit temperature-unit preference; `None` when the text
/// names neither scale.
pub fn detect_temperature_unit(text: &str) -> Option<TemperatureUnit> {
    let lower = text.to_lowercase();
    if CELSIUS_MARKERS.iter().any(|m| lower.contains(m)) {
        return Some(TemperatureUnit::Metric);
    }
    if FAHRENHEIT_MARKERS.iter().any(|m| lower.contains(m)) {
        return Some(TemperatureUnit::Imperial);
    }
    None
}

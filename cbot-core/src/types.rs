//! Core vocabulary: intents, entity labels and bags, time periods, units, and
//! conversation turns.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Coarse category of a user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Weather,
    News,
    Casual,
    Stocks,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Weather => "weather",
            Intent::News => "news",
            Intent::Casual => "casual",
            Intent::Stocks => "stocks",
            Intent::General => "general",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity categories tracked by the extractor. Other labels produced by the
/// underlying model are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityLabel {
    Gpe,
    Person,
    Time,
    Date,
    Org,
}

impl EntityLabel {
    /// All tracked labels, in the order the bag reports them.
    pub const ALL: [EntityLabel; 5] = [
        EntityLabel::Gpe,
        EntityLabel::Person,
        EntityLabel::Time,
        EntityLabel::Date,
        EntityLabel::Org,
    ];

    /// Tagset name as produced by the entity model ("GPE", "PERSON", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLabel::Gpe => "GPE",
            EntityLabel::Person => "PERSON",
            EntityLabel::Time => "TIME",
            EntityLabel::Date => "DATE",
            EntityLabel::Org => "ORG",
        }
    }

    /// Parses a model tagset name; `None` for labels we do not track.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "GPE" => Some(EntityLabel::Gpe),
            "PERSON" => Some(EntityLabel::Person),
            "TIME" => Some(EntityLabel::Time),
            "DATE" => Some(EntityLabel::Date),
            "ORG" => Some(EntityLabel::Org),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted entity spans grouped by label. Every tracked label is always
/// present, possibly with an empty list; duplicates are kept in order of
/// appearance in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityBag {
    spans: BTreeMap<EntityLabel, Vec<String>>,
}

impl EntityBag {
    /// An empty bag with all tracked labels present.
    pub fn new() -> Self {
        let mut spans = BTreeMap::new();
        for label in EntityLabel::ALL {
            spans.insert(label, Vec::new());
        }
        Self { spans }
    }

    /// Appends a span under `label`, preserving insertion order.
    pub fn push(&mut self, label: EntityLabel, span: impl Into<String>) {
        self.spans.entry(label).or_default().push(span.into());
    }

    /// All spans for `label`, in order of appearance.
    pub fn spans(&self, label: EntityLabel) -> &[String] {
        self.spans.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First span for `label`, if any.
    pub fn first(&self, label: EntityLabel) -> Option<&str> {
        self.spans(label).first().map(String::as_str)
    }

    /// Removes the first span under `label` equal to `span`. Returns whether
    /// anything was removed.
    pub fn remove_span(&mut self, label: EntityLabel, span: &str) -> bool {
        if let Some(list) = self.spans.get_mut(&label) {
            if let Some(pos) = list.iter().position(|s| s == span) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Labels present in the bag (always all five tracked labels).
    pub fn labels(&self) -> impl Iterator<Item = EntityLabel> + '_ {
        self.spans.keys().copied()
    }

    /// Total number of spans across all labels.
    pub fn total(&self) -> usize {
        self.spans.values().map(Vec::len).sum()
    }
}

impl Default for EntityBag {
    fn default() -> Self {
        Self::new()
    }
}

/// Temperature unit for weather replies. Maps one-to-one onto the weather
/// API's `units` query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Celsius.
    Metric,
    /// Fahrenheit.
    Imperial,
}

impl TemperatureUnit {
    /// Value of the weather API's `units` query parameter.
    pub fn api_value(&self) -> &'static str {
        match self {
            TemperatureUnit::Metric => "metric",
            TemperatureUnit::Imperial => "imperial",
        }
    }

    /// Degree symbol for rendered temperatures.
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Metric => "°C",
            TemperatureUnit::Imperial => "°F",
        }
    }
}

impl Default for TemperatureUnit {
    fn default() -> Self {
        TemperatureUnit::Imperial
    }
}

/// Normalized forecast period tag. Selects the weather formatting branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodTag {
    Now,
    Today,
    LaterToday,
    Tomorrow,
    Weekday(Weekday),
    Week,
    FiveDay,
}

impl PeriodTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodTag::Now => "now",
            PeriodTag::Today => "today",
            PeriodTag::LaterToday => "later today",
            PeriodTag::Tomorrow => "tomorrow",
            PeriodTag::Weekday(day) => weekday_name(*day),
            PeriodTag::Week => "week",
            PeriodTag::FiveDay => "5 day",
        }
    }
}

impl std::fmt::Display for PeriodTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full lowercase weekday name ("monday" ... "sunday").
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// A detected forecast period: the normalized tag plus which entity category
/// it came from (DATE or TIME).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePeriod {
    pub tag: PeriodTag,
    pub source: EntityLabel,
}

impl TimePeriod {
    pub fn new(tag: PeriodTag, source: EntityLabel) -> Self {
        Self { tag, source }
    }
}

/// News categories supported by the headlines collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Business,
    Technology,
    Health,
    Science,
    Sports,
    Entertainment,
}

impl NewsCategory {
    /// Value of the news API's `category` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Business => "business",
            NewsCategory::Technology => "technology",
            NewsCategory::Health => "health",
            NewsCategory::Science => "science",
            NewsCategory::Sports => "sports",
            NewsCategory::Entertainment => "entertainment",
        }
    }
}

impl std::fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a conversation turn, one-to-one with chat-completion API roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

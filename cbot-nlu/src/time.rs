//! Forecast time-period detection and normalization.
//!
//! Special cases run first (evening-of-today phrasing, explicit 5-day
//! requests, a bare "forecast"), then an ordered base-period table. Single
//! word variations match as whole tokens so "now" cannot fire inside "snow".

use cbot_core::{EntityLabel, PeriodTag, TimePeriod};
use chrono::Weekday;

/// Phrasings that mean the rest of today.
const LATER_TODAY_PHRASES: &[&str] = &["later today", "this evening", "tonight"];

/// Explicit multi-day forecast phrasings.
const FIVE_DAY_PHRASES: &[&str] = &["5 day", "5-day", "five day", "next 5 days", "next five days"];

/// Base period table: tag, source entity type, variation phrases.
const PERIOD_TABLE: &[(PeriodTag, EntityLabel, &[&str])] = &[
    (
        PeriodTag::Now,
        EntityLabel::Time,
        &["right now", "currently", "at the moment", "now"],
    ),
    (PeriodTag::Today, EntityLabel::Date, &["today"]),
    (PeriodTag::Tomorrow, EntityLabel::Date, &["tomorrow"]),
    (
        PeriodTag::Weekday(Weekday::Mon),
        EntityLabel::Date,
        &["monday"],
    ),
    (
        PeriodTag::Weekday(Weekday::Tue),
        EntityLabel::Date,
        &["tuesday"],
    ),
    (
        PeriodTag::Weekday(Weekday::Wed),
        EntityLabel::Date,
        &["wednesday"],
    ),
    (
        PeriodTag::Weekday(Weekday::Thu),
        EntityLabel::Date,
        &["thursday"],
    ),
    (
        PeriodTag::Weekday(Weekday::Fri),
        EntityLabel::Date,
        &["friday"],
    ),
    (
        PeriodTag::Weekday(Weekday::Sat),
        EntityLabel::Date,
        &["saturday"],
    ),
    (
        PeriodTag::Weekday(Weekday::Sun),
        EntityLabel::Date,
        &["sunday"],
    ),
    (
        PeriodTag::Week,
        EntityLabel::Time,
        &["this week", "the week", "week"],
    ),
];

/// Detects the forecast period named in `text`, if any.
pub fn detect_time_period(text: &str) -> Option<TimePeriod> {
    let lower = text.to_lowercase();

    if LATER_TODAY_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some(TimePeriod::new(PeriodTag::LaterToday, EntityLabel::Date));
    }
    if FIVE_DAY_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some(TimePeriod::new(PeriodTag::FiveDay, EntityLabel::Time));
    }
    // A bare "forecast" with no 5-day qualifier means the week ahead.
    if lower.contains("forecast") {
        return Some(TimePeriod::new(PeriodTag::Week, EntityLabel::Time));
    }

    let tokens: Vec<&str> = lower
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .collect();
    for (tag, source, phrases) in PERIOD_TABLE {
        for phrase in *phrases {
            let hit = if phrase.contains(' ') {
                lower.contains(phrase)
            } else {
                tokens.iter().any(|t| t == phrase)
            };
            if hit {
                return Some(TimePeriod::new(*tag, *source));
            }
        }
    }
    None
}

/// Normalizes an entity span ("tomorrow", "Monday", "tonight") to a period
/// tag. Spans that name no known period yield `None`.
pub fn normalize_period(span: &str) -> Option<PeriodTag> {
    detect_time_period(span).map(|p| p.tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tomorrow_is_a_date_period() {
        assert_eq!(
            detect_time_period("What's the weather tomorrow?"),
            Some(TimePeriod::new(PeriodTag::Tomorrow, EntityLabel::Date))
        );
    }

    #[test]
    fn week_is_a_time_period() {
        assert_eq!(
            detect_time_period("What's the weather for the week?"),
            Some(TimePeriod::new(PeriodTag::Week, EntityLabel::Time))
        );
    }

    #[test]
    fn plain_location_question_has_no_period() {
        assert_eq!(detect_time_period("What's the weather in New York?"), None);
    }

    #[test]
    fn evening_phrasings_mean_later_today() {
        for text in ["later today?", "will it rain tonight", "weather this evening"] {
            let period = detect_time_period(text).unwrap();
            assert_eq!(period.tag, PeriodTag::LaterToday);
            assert_eq!(period.source, EntityLabel::Date);
        }
    }

    #[test]
    fn five_day_phrasings_beat_bare_forecast() {
        assert_eq!(
            detect_time_period("show me the 5-day forecast").unwrap().tag,
            PeriodTag::FiveDay
        );
        assert_eq!(
            detect_time_period("what's the forecast").unwrap().tag,
            PeriodTag::Week
        );
    }

    #[test]
    fn weekday_names_normalize() {
        assert_eq!(
            detect_time_period("weather on Friday please").unwrap().tag,
            PeriodTag::Weekday(Weekday::Fri)
        );
        assert_eq!(normalize_period("Monday"), Some(PeriodTag::Weekday(Weekday::Mon)));
    }

    #[test]
    fn now_matches_whole_tokens_only() {
        assert_eq!(
            detect_time_period("weather right now").unwrap().tag,
            PeriodTag::Now
        );
        // "now" inside "snow" must not match
        assert_eq!(detect_time_period("will it snow in Denver"), None);
    }

    #[test]
    fn entity_spans_normalize_or_yield_none() {
        assert_eq!(normalize_period("tomorrow"), Some(PeriodTag::Tomorrow));
        assert_eq!(normalize_period("tonight"), Some(PeriodTag::LaterToday));
        assert_eq!(normalize_period("March 5"), None);
        assert_eq!(normalize_period("3 PM"), None);
    }
}

//! Pattern-based entity tagger: the default [`EntityModel`] wiring.
//!
//! Tags spans with lexicon lookups (weekdays, months, day parts, known
//! cities, regions, organizations), a clock-time regex, and a
//! capitalized-run heuristic for remaining proper nouns. Unknown capitalized
//! runs default to PERSON; the extractor's gazetteer pass corrects the ones
//! that are actually cities.

use async_trait::async_trait;
use cbot_core::BotError;
use regex::Regex;

use crate::model::{EntityModel, EntitySpan};

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const RELATIVE_DAYS: &[&str] = &["today", "tomorrow", "tonight", "yesterday"];

const MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const DAY_PARTS: &[&str] = &["morning", "afternoon", "evening", "noon", "midnight"];

const WORLD_CITIES: &[&str] = &[
    "phoenix",
    "tucson",
    "new york",
    "los angeles",
    "san francisco",
    "las vegas",
    "chicago",
    "boston",
    "seattle",
    "portland",
    "denver",
    "dallas",
    "houston",
    "austin",
    "atlanta",
    "miami",
    "london",
    "paris",
    "berlin",
    "madrid",
    "rome",
    "dublin",
    "tokyo",
    "sydney",
    "toronto",
    "vancouver",
];

const REGIONS: &[&str] = &[
    "arizona",
    "california",
    "texas",
    "nevada",
    "oregon",
    "washington",
    "colorado",
    "utah",
    "florida",
    "united states",
    "united kingdom",
    "france",
    "germany",
    "spain",
    "italy",
    "japan",
    "china",
    "canada",
    "australia",
    "mexico",
];

const ORG_NAMES: &[&str] = &[
    "google",
    "nasa",
    "microsoft",
    "amazon",
    "apple",
    "tesla",
    "netflix",
    "openai",
    "spacex",
    "ibm",
    "intel",
];

/// Capitalized words that are sentence furniture, never proper nouns.
const STOP_WORDS: &[&str] = &[
    "what",
    "what's",
    "whats",
    "who",
    "who's",
    "how",
    "how's",
    "when",
    "where",
    "why",
    "which",
    "is",
    "are",
    "was",
    "were",
    "will",
    "would",
    "can",
    "could",
    "should",
    "do",
    "does",
    "did",
    "the",
    "a",
    "an",
    "i",
    "i'm",
    "im",
    "it",
    "it's",
    "its",
    "my",
    "your",
    "me",
    "this",
    "that",
    "there",
    "tell",
    "show",
    "give",
    "remind",
    "please",
    "hey",
    "hi",
    "hello",
    "and",
    "or",
    "but",
    "for",
    "in",
    "at",
    "on",
    "of",
    "to",
    "about",
    "with",
    "from",
    "near",
];

/// A token with its byte offset and punctuation-trimmed form.
struct Token<'a> {
    start: usize,
    word: &'a str,
}

/// Lexicon- and heuristic-based tagger. Construction compiles the patterns;
/// a compile failure is a startup-fatal model error.
pub struct PatternEntityModel {
    token_re: Regex,
    clock_re: Regex,
}

impl PatternEntityModel {
    pub fn load() -> Result<Self, BotError> {
        let token_re =
            Regex::new(r"\S+").map_err(|e| BotError::EntityModel(e.to_string()))?;
        let clock_re = Regex::new(r"(?i)\b\d{1,2}(?::\d{2})?\s*(?:am|pm)\b|\b\d{1,2}:\d{2}\b")
            .map_err(|e| BotError::EntityModel(e.to_string()))?;
        Ok(Self { token_re, clock_re })
    }

    fn tag(&self, text: &str) -> Vec<(usize, EntitySpan)> {
        let mut spans: Vec<(usize, EntitySpan)> = Vec::new();
        let mut covered: Vec<(usize, usize)> = Vec::new();

        for m in self.clock_re.find_iter(text) {
            covered.push((m.start(), m.end()));
            spans.push((m.start(), EntitySpan::new(m.as_str(), "TIME")));
        }

        let tokens: Vec<Token> = self
            .token_re
            .find_iter(text)
            .map(|m| Token {
                start: m.start(),
                word: m.as_str().trim_matches(|c: char| !c.is_alphanumeric() && c != '\''),
            })
            .filter(|t| !t.word.is_empty())
            .collect();

        let in_clock =
            |start: usize| covered.iter().any(|&(s, e)| start >= s && start < e);

        // Lexicon pass: dates and day parts by single token; a month joins a
        // following day number into one span ("March 5").
        let mut consumed = vec![false; tokens.len()];
        let mut idx = 0;
        while idx < tokens.len() {
            let token = &tokens[idx];
            if in_clock(token.start) {
                consumed[idx] = true;
                idx += 1;
                continue;
            }
            let lower = token.word.to_lowercase();
            if WEEKDAYS.contains(&lower.as_str()) || RELATIVE_DAYS.contains(&lower.as_str()) {
                spans.push((token.start, EntitySpan::new(token.word, "DATE")));
                consumed[idx] = true;
            } else if MONTHS.contains(&lower.as_str()) {
                let span_text = match tokens.get(idx + 1) {
                    Some(next) if next.word.chars().all(|c| c.is_ascii_digit()) => {
                        consumed[idx + 1] = true;
                        format!("{} {}", token.word, next.word)
                    }
                    _ => token.word.to_string(),
                };
                spans.push((token.start, EntitySpan::new(span_text, "DATE")));
                consumed[idx] = true;
            } else if DAY_PARTS.contains(&lower.as_str()) {
                spans.push((token.start, EntitySpan::new(token.word, "TIME")));
                consumed[idx] = true;
            }
            idx += 1;
        }

        // Capitalized-run pass over what's left.
        let mut idx = 0;
        while idx < tokens.len() {
            let token = &tokens[idx];
            let lower = token.word.to_lowercase();
            let is_candidate = !consumed[idx]
                && !in_clock(token.start)
                && token.word.chars().next().is_some_and(char::is_uppercase)
                && !STOP_WORDS.contains(&lower.as_str());
            if !is_candidate {
                idx += 1;
                continue;
            }

            let run_start = idx;
            let mut run_end = idx + 1;
            while run_end < tokens.len() {
                let next = &tokens[run_end];
                let next_lower = next.word.to_lowercase();
                let extend = !consumed[run_end]
                    && !in_clock(next.start)
                    && next.word.chars().next().is_some_and(char::is_uppercase)
                    && !STOP_WORDS.contains(&next_lower.as_str());
                if !extend {
                    break;
                }
                run_end += 1;
            }

            let words: Vec<&str> = tokens[run_start..run_end].iter().map(|t| t.word).collect();
            let span_text = words.join(" ");
            let joined_lower = span_text.to_lowercase();
            let label = if WORLD_CITIES.contains(&joined_lower.as_str())
                || REGIONS.contains(&joined_lower.as_str())
            {
                "GPE"
            } else if ORG_NAMES.contains(&joined_lower.as_str()) {
                "ORG"
            } else {
                "PERSON"
            };
            spans.push((tokens[run_start].start, EntitySpan::new(span_text, label)));
            idx = run_end;
        }

        spans.sort_by_key(|(start, _)| *start);
        spans
    }
}

#[async_trait]
impl EntityModel for PatternEntityModel {
    async fn analyze(&self, text: &str) -> Result<Vec<EntitySpan>, BotError> {
        Ok(self.tag(text).into_iter().map(|(_, span)| span).collect())
    }
}

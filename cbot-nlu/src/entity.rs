//! Entity extraction: delegates span tagging to the [`EntityModel`] seam,
//! keeps the five tracked labels, and for weather requests runs a gazetteer
//! disambiguation pass over the result.

use std::sync::Arc;

use cbot_core::{BotError, EntityBag, EntityLabel, Intent};
use tracing::{debug, info};

use crate::model::EntityModel;

/// City names the entity model tends to tag as PERSON. Used to reclassify
/// PERSON spans and to scan raw text when no location was found.
pub const CITY_GAZETTEER: &[&str] = &[
    "mesa",
    "chandler",
    "gilbert",
    "tempe",
    "scottsdale",
    "glendale",
    "peoria",
    "surprise",
    "avondale",
    "goodyear",
    "buckeye",
    "casa grande",
    "flagstaff",
    "prescott",
    "kingman",
    "bullhead city",
    "lake havasu city",
    "yuma",
    "sierra vista",
    "sedona",
    "paradise valley",
    "fountain hills",
    "oro valley",
    "marana",
    "sahuarita",
    "queen creek",
    "apache junction",
    "maricopa",
    "eloy",
    "coolidge",
    "florence",
    "globe",
    "miami",
    "payson",
    "show low",
    "snowflake",
    "winslow",
    "holbrook",
    "page",
    "williams",
    "cottonwood",
    "camp verde",
    "wickenburg",
    "parker",
    "bisbee",
    "douglas",
    "nogales",
    "safford",
    "thatcher",
    "clifton",
    "willcox",
    "benson",
    "tombstone",
];

/// Prepositions that introduce a location in weather phrasing.
const LOCATION_INDICATORS: &[&str] = &["in ", "for ", "at ", "near "];

/// Extractor over an [`EntityModel`]. Stateless apart from the model handle;
/// identical input always yields an identical bag.
#[derive(Clone)]
pub struct EntityExtractor {
    model: Arc<dyn EntityModel>,
}

impl EntityExtractor {
    pub fn new(model: Arc<dyn EntityModel>) -> Self {
        Self { model }
    }

    /// Extracts the tracked entities from `text`. A model failure propagates;
    /// the caller treats it as fatal for the request.
    ///
    /// With a weather `intent_hint`, PERSON spans matching the gazetteer are
    /// reclassified to GPE, and if GPE is still empty the raw text is scanned
    /// for `in`/`for`/`at`/`near` followed by a gazetteer city.
    pub async fn extract(
        &self,
        text: &str,
        intent_hint: Option<Intent>,
    ) -> Result<EntityBag, BotError> {
        let mut bag = EntityBag::new();
        for span in self.model.analyze(text).await? {
            if let Some(label) = EntityLabel::parse(&span.label) {
                debug!(span = %span.text, label = %label, "found entity");
                bag.push(label, span.text);
            }
        }

        if intent_hint == Some(Intent::Weather) {
            disambiguate_weather(text, &mut bag);
        }

        debug!(total = bag.total(), "extracted entities");
        Ok(bag)
    }
}

/// Weather disambiguation: PERSON-to-GPE reclassification by gazetteer, then
/// a preposition scan of the raw text when no location was recognized.
fn disambiguate_weather(text: &str, bag: &mut EntityBag) {
    let persons: Vec<String> = bag.spans(EntityLabel::Person).to_vec();
    for person in persons {
        if CITY_GAZETTEER.contains(&person.to_lowercase().as_str()) {
            info!(span = %person, "reclassifying PERSON to GPE via city gazetteer");
            bag.remove_span(EntityLabel::Person, &person);
            bag.push(EntityLabel::Gpe, person);
        }
    }

    if !bag.spans(EntityLabel::Gpe).is_empty() {
        return;
    }

    let lower = text.to_lowercase();
    for indicator in LOCATION_INDICATORS {
        for (pos, _) in lower.match_indices(indicator) {
            let tail = &lower[pos + indicator.len()..];
            let Some(candidate) = tail.split_whitespace().next() else {
                continue;
            };
            // Either side may be truncated ("scotts" vs "scottsdale", "mesa?" vs "mesa").
            if let Some(city) = CITY_GAZETTEER
                .iter()
                .find(|city| city.starts_with(candidate) || candidate.starts_with(*city))
            {
                info!(city = %city, "found gazetteer city after location indicator");
                bag.push(EntityLabel::Gpe, title_case(city));
                return;
            }
        }
    }
}

/// Uppercases the first letter of each whitespace-separated word.
fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

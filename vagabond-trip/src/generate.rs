//! Data contracts for the generative-AI collaborator.
//!
//! The transport, prompt text, and schema wiring live outside this crate;
//! these are the shapes the engine consumes once a response has parsed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::edit::ActivityDraft;

/// Minimum place-query length before the engine will consult the source at
/// all; shorter queries complete to nothing.
pub const PLACE_QUERY_MIN_CHARS: usize = 3;

/// Response language requested from the generator. Indonesian is the
/// launch-market default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Id,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Id => "id",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "id" => Ok(Self::Id),
            _ => Err(()),
        }
    }
}

/// What a place-name completion should search over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceKind {
    /// Specific real-world places, scoped to the trip destination when set.
    #[default]
    Any,
    /// Cities, regions, or countries, searched worldwide.
    City,
}

/// One AI-suggested activity for a day theme. Three are requested per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedActivity {
    #[serde(rename = "activity")]
    pub name: String,
    pub description: String,
    pub emoji: String,
    pub cost: String,
}

impl SuggestedActivity {
    /// Turn the suggestion into an add-activity draft. Time and location are
    /// left empty for the caller (or the add fallbacks) to fill.
    #[must_use]
    pub fn into_draft(self) -> ActivityDraft {
        ActivityDraft {
            time: String::new(),
            name: self.name,
            location: String::new(),
            description: self.description,
            emoji: self.emoji,
            cost: self.cost,
        }
    }
}

/// One AI-suggested packing item; five to seven are requested per call, each
/// tied to the destination's climate or a planned activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedPackingItem {
    pub name: String,
    pub category: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tags_match_the_wire() {
        assert_eq!(Language::En.as_str(), "en");
        assert_eq!(Language::Id.as_str(), "id");
        assert_eq!("id".parse::<Language>(), Ok(Language::Id));
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::Id);
        assert_eq!(serde_json::to_string(&Language::Id).unwrap(), "\"id\"");
    }

    #[test]
    fn suggested_activity_uses_wire_field_name() {
        let json = r#"{"activity":"Night market","description":"Snacks","emoji":"🍢","cost":"Rp 75.000"}"#;
        let s: SuggestedActivity = serde_json::from_str(json).unwrap();
        assert_eq!(s.name, "Night market");
        let back = serde_json::to_string(&s).unwrap();
        assert!(back.contains("\"activity\":\"Night market\""));
    }

    #[test]
    fn suggestion_becomes_a_draft_with_open_time_and_location() {
        let s = SuggestedActivity {
            name: "Sunrise hike".to_string(),
            description: "Catch the first light".to_string(),
            emoji: "🌄".to_string(),
            cost: "Free".to_string(),
        };
        let draft = s.into_draft();
        assert_eq!(draft.name, "Sunrise hike");
        assert_eq!(draft.cost, "Free");
        assert!(draft.time.is_empty());
        assert!(draft.location.is_empty());
    }
}

//! Assigns stable identities to a freshly generated itinerary.
//!
//! The generator returns day and activity payloads without identities; the
//! rest of the engine refuses to touch a plan until every entity has one.
//! Normalization happens exactly once per generation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ident::IdSource;
use crate::trip::{
    Activity, CostBreakdown, DayPlan, Itinerary, LocalPhrase, PackingCategory, TravelAdvisory,
    TravelPreferences,
};

/// A generation response shaped like an itinerary but with no identities.
/// The `days` and per-day `activities` sequences are optional on the wire so
/// a truncated or malformed response is detectable instead of collapsing to
/// an empty plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItinerary {
    pub title: String,
    pub destination: String,
    pub total_days: u32,
    pub budget_level: String,
    #[serde(default)]
    pub estimated_cost: CostBreakdown,
    pub summary: String,
    pub weather_forecast: String,
    #[serde(default)]
    pub packing_list: Vec<PackingCategory>,
    #[serde(default)]
    pub local_phrases: Vec<LocalPhrase>,
    pub playlist_vibe: String,
    #[serde(default)]
    pub days: Option<Vec<RawDayPlan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_prefs: Option<TravelPreferences>,
    #[serde(default)]
    pub travel_advisories: Vec<TravelAdvisory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDayPlan {
    pub day: u32,
    pub theme: String,
    #[serde(default)]
    pub activities: Option<Vec<RawActivity>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawActivity {
    pub time: String,
    #[serde(rename = "activity")]
    pub name: String,
    pub location: String,
    pub description: String,
    pub emoji: String,
    pub cost: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("malformed generation response: {reason}")]
    MalformedResponse { reason: &'static str },
}

/// Convert a raw generation response into a fully identified itinerary.
///
/// Every day and every activity receives a fresh identity, in input order;
/// all other fields pass through unchanged.
///
/// # Errors
///
/// [`NormalizeError::MalformedResponse`] if the response lacks a days
/// sequence or any day lacks an activities sequence. This is a non-retryable
/// generation failure; the caller surfaces it rather than coercing to an
/// empty plan.
pub fn normalize(raw: RawItinerary, ids: &mut IdSource) -> Result<Itinerary, NormalizeError> {
    let raw_days = raw.days.ok_or(NormalizeError::MalformedResponse {
        reason: "response carries no days sequence",
    })?;
    let mut days = Vec::with_capacity(raw_days.len());
    for raw_day in raw_days {
        let raw_activities = raw_day
            .activities
            .ok_or(NormalizeError::MalformedResponse {
                reason: "a day carries no activities sequence",
            })?;
        let activities = raw_activities
            .into_iter()
            .map(|a| Activity {
                id: ids.next_id(),
                time: a.time,
                name: a.name,
                location: a.location,
                description: a.description,
                emoji: a.emoji,
                cost: a.cost,
            })
            .collect();
        days.push(DayPlan {
            id: ids.next_id(),
            day: raw_day.day,
            theme: raw_day.theme,
            activities,
        });
    }
    Ok(Itinerary {
        title: raw.title,
        destination: raw.destination,
        total_days: raw.total_days,
        budget_level: raw.budget_level,
        estimated_cost: raw.estimated_cost,
        summary: raw.summary,
        weather_forecast: raw.weather_forecast,
        packing_list: raw.packing_list,
        local_phrases: raw.local_phrases,
        playlist_vibe: raw.playlist_vibe,
        days,
        original_prefs: raw.original_prefs,
        travel_advisories: raw.travel_advisories,
    })
}

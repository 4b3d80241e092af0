//! Local durable mirroring of the preferences draft and the active result.
//!
//! Every blob is a self-contained snapshot under its own key, re-validated
//! on every read. Corrupt or legacy-shaped data never surfaces as an error:
//! reads fall back to documented defaults, writes log and move on, and the
//! in-memory state stays the source of truth.

use serde_json::Value;

use crate::DraftStore;
use crate::trip::{BudgetTier, Itinerary, TravelPreferences};

pub const DRAFT_KEY: &str = "vagabond_trip_draft";
pub const RESULT_KEY: &str = "vagabond_current_result";
pub const VAULT_KEY: &str = "vagabond_saved_itineraries";

/// Draft persistence bridge over a platform storage backend.
pub struct DraftVault<S>
where
    S: DraftStore,
{
    store: S,
}

impl<S> DraftVault<S>
where
    S: DraftStore,
{
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Mirror the current preferences draft.
    pub fn save_draft(&self, prefs: &TravelPreferences) {
        self.write_json(DRAFT_KEY, prefs);
    }

    /// Restore the preferences draft, coercing field-by-field so a legacy or
    /// partially written blob still yields a usable draft.
    #[must_use]
    pub fn load_draft(&self) -> TravelPreferences {
        let Some(text) = self.read_key(DRAFT_KEY) else {
            return TravelPreferences::default();
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => prefs_from_value(&value),
            Err(err) => {
                log::warn!("discarding corrupt preferences draft: {err}");
                TravelPreferences::default()
            }
        }
    }

    /// Mirror the active itinerary.
    pub fn save_result(&self, itinerary: &Itinerary) {
        self.write_json(RESULT_KEY, itinerary);
    }

    /// Drop the mirrored itinerary entirely. Called when the active
    /// itinerary is cleared; the key is removed rather than overwritten with
    /// a null placeholder.
    pub fn clear_result(&self) {
        if let Err(err) = self.store.remove(RESULT_KEY) {
            log::warn!("failed to clear mirrored result: {err}");
        }
    }

    /// Restore the mirrored itinerary, if a parseable one is stored.
    #[must_use]
    pub fn load_result(&self) -> Option<Itinerary> {
        let text = self.read_key(RESULT_KEY)?;
        match serde_json::from_str::<Itinerary>(&text) {
            Ok(itinerary) => Some(itinerary),
            Err(err) => {
                log::warn!("discarding corrupt mirrored result: {err}");
                None
            }
        }
    }

    /// Append the itinerary to the locally saved list unless an entry with
    /// the same destination and title is already there. Returns whether the
    /// itinerary was added.
    ///
    /// # Errors
    ///
    /// Propagates a storage write failure; the caller decides how to surface
    /// it.
    pub fn save_to_vault(&self, itinerary: &Itinerary) -> Result<bool, S::Error> {
        let mut saved = self.load_vault();
        let exists = saved
            .iter()
            .any(|i| i.destination == itinerary.destination && i.title == itinerary.title);
        if exists {
            return Ok(false);
        }
        saved.push(itinerary.clone());
        match serde_json::to_string(&saved) {
            Ok(json) => self.store.set(VAULT_KEY, &json)?,
            Err(err) => log::warn!("failed to serialize saved itineraries: {err}"),
        }
        Ok(true)
    }

    /// The locally saved itinerary list; unreadable data reads as empty.
    #[must_use]
    pub fn load_vault(&self) -> Vec<Itinerary> {
        let Some(text) = self.read_key(VAULT_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<Itinerary>>(&text) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("discarding corrupt saved-itinerary list: {err}");
                Vec::new()
            }
        }
    }

    fn write_json<T: serde::Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => {
                if let Err(err) = self.store.set(key, &json) {
                    log::warn!("failed to mirror {key}: {err}");
                }
            }
            Err(err) => log::warn!("failed to serialize {key}: {err}"),
        }
    }

    fn read_key(&self, key: &str) -> Option<String> {
        let text = match self.store.get(key) {
            Ok(text) => text?,
            Err(err) => {
                log::warn!("failed to read {key}: {err}");
                return None;
            }
        };
        // Older builds sometimes wrote the literal strings below.
        if text == "undefined" || text == "null" {
            return None;
        }
        Some(text)
    }
}

fn prefs_from_value(value: &Value) -> TravelPreferences {
    let defaults = TravelPreferences::default();
    let Some(map) = value.as_object() else {
        return defaults;
    };
    let non_empty_string = |key: &str, fallback: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };
    let positive_int = |key: &str, fallback: u32| {
        map.get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n >= 1)
            .unwrap_or(fallback)
    };
    TravelPreferences {
        origin: map
            .get("origin")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        destination: map
            .get("destination")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        days: positive_int("days", defaults.days),
        budget: map
            .get("budget")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<BudgetTier>().ok())
            .unwrap_or(defaults.budget),
        interests: map
            .get("interests")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        travelers: positive_int("travelers", defaults.travelers),
        transport_mode: non_empty_string("transportMode", &defaults.transport_mode),
        travel_style: non_empty_string("travelStyle", &defaults.travel_style),
    }
}

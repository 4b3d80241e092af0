//! Shared doubles the scenarios run the engine against: an in-process
//! draft store and a canned generation source.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use vagabond_trip::{
    Account, DraftStore, ItinerarySource, Language, MemoryBackend, PlaceKind, PlannerEngine,
    RawActivity, RawDayPlan, RawItinerary, SuggestedActivity, SuggestedPackingItem,
    TravelPreferences,
};

pub type TesterEngine = PlannerEngine<CannedSource, MemoryStore, MemoryBackend>;

/// Thread-safe in-memory stand-in for browser localStorage.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite a key directly, bypassing the vault.
    pub fn put(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }
}

impl DraftStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Generation source that always returns the same canned response.
#[derive(Clone)]
pub struct CannedSource {
    raw: RawItinerary,
}

impl CannedSource {
    #[must_use]
    pub fn new(raw: RawItinerary) -> Self {
        Self { raw }
    }
}

#[async_trait]
impl ItinerarySource for CannedSource {
    type Error = Infallible;

    async fn generate(
        &self,
        _prefs: &TravelPreferences,
        _language: Language,
    ) -> Result<RawItinerary, Self::Error> {
        Ok(self.raw.clone())
    }

    async fn suggest_activities(
        &self,
        _destination: &str,
        day_theme: &str,
        _language: Language,
    ) -> Result<Vec<SuggestedActivity>, Self::Error> {
        Ok(vec![SuggestedActivity {
            name: format!("More of {day_theme}"),
            description: "Canned suggestion".to_string(),
            emoji: "🌟".to_string(),
            cost: "Free".to_string(),
        }])
    }

    async fn suggest_packing(
        &self,
        _destination: &str,
        _weather: &str,
        _activity_names: &[String],
        _language: Language,
    ) -> Result<Vec<SuggestedPackingItem>, Self::Error> {
        Ok(vec![SuggestedPackingItem {
            name: "Power bank".to_string(),
            category: "Electronics".to_string(),
            reason: "Long days out".to_string(),
        }])
    }

    async fn suggest_places(
        &self,
        query: &str,
        _context: &str,
        _language: Language,
        _kind: PlaceKind,
    ) -> Result<Vec<String>, Self::Error> {
        Ok(vec![format!("{query} City")])
    }
}

/// A plausible generation response, sized by the seed so iterations differ.
#[must_use]
pub fn canned_trip(seed: u64) -> RawItinerary {
    let day_count = 2 + (seed % 3) as u32;
    RawItinerary {
        title: format!("{day_count} days in Kyoto"),
        destination: "Kyoto, Japan".to_string(),
        total_days: day_count,
        budget_level: "Moderate".to_string(),
        summary: "Temples, markets, and a river walk.".to_string(),
        weather_forecast: "Mild and clear".to_string(),
        playlist_vibe: "Lo-fi with koto samples".to_string(),
        days: Some(
            (1..=day_count)
                .map(|day| RawDayPlan {
                    day,
                    theme: format!("Day {day}"),
                    activities: Some(
                        (0..2)
                            .map(|slot| RawActivity {
                                time: format!("{}:00 AM", 8 + slot),
                                name: format!("Stop {day}.{slot}"),
                                location: "Old town".to_string(),
                                description: String::new(),
                                emoji: "📍".to_string(),
                                cost: "Rp 50.000".to_string(),
                            })
                            .collect(),
                    ),
                })
                .collect(),
        ),
        ..RawItinerary::default()
    }
}

#[must_use]
pub fn trip_prefs() -> TravelPreferences {
    TravelPreferences {
        origin: "Jakarta, Indonesia".to_string(),
        destination: "Kyoto, Japan".to_string(),
        days: 3,
        travelers: 2,
        ..TravelPreferences::default()
    }
}

/// Engine over fresh doubles, with every random stream pinned to `seed`.
#[must_use]
pub fn planner(seed: u64) -> (TesterEngine, MemoryStore) {
    let store = MemoryStore::default();
    let engine = PlannerEngine::seeded(
        CannedSource::new(canned_trip(seed)),
        store.clone(),
        MemoryBackend::new(),
        seed,
    );
    (engine, store)
}

/// Create a backend profile and sign the session in as that user.
pub fn sign_in(engine: &mut TesterEngine, email: &str) -> String {
    let profile = engine.remote().backend().create_profile(email, None);
    let user_id = profile.id.clone();
    engine.session_mut().sign_in(Account {
        user_id: user_id.clone(),
        name: email.split('@').next().unwrap_or_default().to_string(),
        email: profile.email,
        credits: profile.credits,
    });
    user_id
}

use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use chrono::Utc;
use vagabond_trip::{
    BudgetTier, CreditTransaction, DRAFT_KEY, DraftStore, DraftVault, IdSource, Itinerary,
    ItineraryData, NewItineraryRecord, RawItinerary, TransactionKind, TravelPreferences, normalize,
};

#[derive(Clone, Default)]
struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl DraftStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// A generation response the way the collaborator actually emits it:
/// camelCase keys, `activity` for the activity name, no identities anywhere.
fn wire_response() -> String {
    json!({
        "title": "3 Days of Temples and Tea in Kyoto",
        "destination": "Kyoto, Japan",
        "totalDays": 2,
        "budgetLevel": "Moderate",
        "estimatedCost": {
            "total": "Rp 15.000.000",
            "accommodation": "Rp 6.000.000",
            "food": "Rp 3.000.000",
            "activities": "Rp 2.500.000",
            "transport": "Rp 1.500.000",
            "flights": "Rp 2.000.000",
            "explanation": "Mid-range stays near Gion."
        },
        "summary": "Slow mornings, shrines, and kaiseki evenings.",
        "weatherForecast": "Mild and clear, 18-24C",
        "packingList": [
            {
                "category": "Clothing",
                "items": [
                    { "name": "Light jacket", "reason": "Cool evenings" },
                    { "name": "Walking shoes", "reason": "Temple paths" }
                ]
            }
        ],
        "localPhrases": [
            {
                "original": "Arigatou gozaimasu",
                "translation": "Thank you very much",
                "pronunciation": "ah-ree-gah-toh goh-zai-mas"
            }
        ],
        "playlistVibe": "Lo-fi with koto samples",
        "days": [
            {
                "day": 1,
                "theme": "Eastern Hills",
                "activities": [
                    {
                        "time": "9:00 AM",
                        "activity": "Kiyomizu-dera",
                        "location": "Higashiyama",
                        "description": "Wooden stage over the valley.",
                        "emoji": "⛩️",
                        "cost": "Rp 60.000"
                    },
                    {
                        "time": "1:00 PM",
                        "activity": "Nishiki Market lunch",
                        "location": "Nakagyo",
                        "description": "",
                        "emoji": "🍜",
                        "cost": "Rp 150.000"
                    }
                ]
            },
            {
                "day": 2,
                "theme": "Bamboo and River",
                "activities": [
                    {
                        "time": "8:30 AM",
                        "activity": "Arashiyama Grove",
                        "location": "Arashiyama",
                        "description": "Beat the crowds.",
                        "emoji": "🎋",
                        "cost": "Free"
                    }
                ]
            }
        ],
        "travelAdvisories": [
            {
                "severity": "Low",
                "title": "Crowds at peak hours",
                "description": "Popular temples fill up after 10 AM."
            }
        ]
    })
    .to_string()
}

#[test]
fn generation_wire_format_parses_and_normalizes() {
    let raw: RawItinerary = serde_json::from_str(&wire_response()).unwrap();
    assert_eq!(raw.destination, "Kyoto, Japan");
    assert_eq!(raw.days.as_ref().map(Vec::len), Some(2));

    let mut ids = IdSource::seeded(11);
    let planned = normalize(raw, &mut ids).unwrap();
    assert_eq!(planned.days[0].activities[0].name, "Kiyomizu-dera");
    assert_eq!(planned.packing_list[0].items[1].name, "Walking shoes");
    assert_eq!(planned.local_phrases[0].translation, "Thank you very much");
    assert_eq!(planned.estimated_cost.transport, "Rp 1.500.000");

    let mut seen = std::collections::HashSet::new();
    for day in &planned.days {
        assert!(seen.insert(day.id.clone()), "duplicate day id");
        for activity in &day.activities {
            assert!(seen.insert(activity.id.clone()), "duplicate activity id");
        }
    }
}

#[test]
fn stored_itinerary_keeps_the_wire_spelling() {
    let raw: RawItinerary = serde_json::from_str(&wire_response()).unwrap();
    let mut ids = IdSource::seeded(12);
    let planned = normalize(raw, &mut ids).unwrap();

    let value = serde_json::to_value(&planned).unwrap();
    assert!(value.get("weatherForecast").is_some());
    assert!(value.get("playlistVibe").is_some());
    assert!(value.get("weather_forecast").is_none());

    let first_activity = &value["days"][0]["activities"][0];
    assert!(first_activity.get("activity").is_some(), "renamed key");
    assert!(first_activity.get("name").is_none());
    assert!(first_activity.get("id").is_some());

    let reread: Itinerary = serde_json::from_value(value).unwrap();
    assert_eq!(reread, planned);
}

#[test]
fn preferences_serialize_camel_case() {
    let prefs = TravelPreferences {
        origin: "Jakarta, Indonesia".to_string(),
        destination: "Kyoto, Japan".to_string(),
        days: 4,
        budget: BudgetTier::Luxury,
        interests: vec!["Food".to_string(), "History".to_string()],
        travelers: 2,
        transport_mode: "Trains".to_string(),
        travel_style: "Packed Schedule".to_string(),
    };

    let value = serde_json::to_value(&prefs).unwrap();
    assert_eq!(value["transportMode"], json!("Trains"));
    assert_eq!(value["travelStyle"], json!("Packed Schedule"));
    assert_eq!(value["budget"], json!("Luxury"));

    let reread: TravelPreferences = serde_json::from_value(value).unwrap();
    assert_eq!(reread, prefs);
}

#[test]
fn backend_records_use_column_spelling() {
    let record = NewItineraryRecord {
        user_id: "usr-1".to_string(),
        title: "Weekend in Lisbon".to_string(),
        destination: "Lisbon, Portugal".to_string(),
        origin: Some("London, UK".to_string()),
        total_days: 2,
        budget_level: "Budget".to_string(),
        travel_style: Some("Relaxed".to_string()),
        travelers: 1,
        transport_mode: Some("Public Transport".to_string()),
        summary: None,
        weather_forecast: None,
        playlist_vibe: None,
        itinerary_data: ItineraryData::default(),
        estimated_cost: Default::default(),
        packing_list: Vec::new(),
        local_phrases: Vec::new(),
        travel_advisories: Vec::new(),
    };

    let value = serde_json::to_value(&record).unwrap();
    assert!(value.get("budget_level").is_some());
    assert!(value.get("itinerary_data").is_some());
    assert!(value.get("budgetLevel").is_none());
}

#[test]
fn ledger_entries_expose_kind_as_type() {
    let entry = CreditTransaction {
        id: "txn-9".to_string(),
        user_id: "usr-1".to_string(),
        amount: -5,
        kind: TransactionKind::TripGeneration,
        description: None,
        reference_id: None,
        created_at: Utc::now(),
    };

    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(value["type"], json!("trip_generation"));
    assert_eq!(value["amount"], json!(-5));
    assert!(value.get("kind").is_none());

    let reread: CreditTransaction = serde_json::from_value(value).unwrap();
    assert_eq!(reread.kind, TransactionKind::TripGeneration);
}

#[test]
fn legacy_draft_blobs_coerce_field_by_field() {
    let store = MemoryStore::default();
    store
        .set(
            DRAFT_KEY,
            &json!({
                "origin": "Jakarta, Indonesia",
                "destination": "Kyoto, Japan",
                "days": "a week",
                "budget": "Extravagant",
                "interests": "Food",
                "travelers": 0,
                "transportMode": "",
                "travelStyle": "Relaxed"
            })
            .to_string(),
        )
        .unwrap();

    let prefs = DraftVault::new(store).load_draft();
    assert_eq!(prefs.destination, "Kyoto, Japan");
    assert_eq!(prefs.days, 3);
    assert_eq!(prefs.budget, BudgetTier::Moderate);
    assert!(prefs.interests.is_empty());
    assert_eq!(prefs.travelers, 1);
    assert_eq!(prefs.transport_mode, "Public Transport");
    assert_eq!(prefs.travel_style, "Relaxed");
}

#[test]
fn draft_key_rejects_literal_undefined() {
    let store = MemoryStore::default();
    store.set(DRAFT_KEY, "undefined").unwrap();

    let prefs = DraftVault::new(store).load_draft();
    assert_eq!(prefs, TravelPreferences::default());
}

#[test]
fn unknown_wire_fields_are_ignored() {
    let mut value: Value = serde_json::from_str(&wire_response()).unwrap();
    value["somethingNew"] = json!({ "nested": true });
    value["days"][0]["mood"] = json!("calm");

    let raw: RawItinerary = serde_json::from_value(value).unwrap();
    assert_eq!(raw.days.as_ref().map(Vec::len), Some(2));
}

use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use async_trait::async_trait;
use vagabond_trip::{
    Account, ActivityDraft, ActivityField, DraftStore, GenerateOutcome, ItinerarySource, Language,
    MemoryBackend, PlaceKind, PlanError, PlannerEngine, RawActivity, RawDayPlan, RawItinerary,
    ResultTab, SuggestedActivity, SuggestedPackingItem, TRIP_COST, TransactionKind,
    TravelPreferences, WELCOME_CREDITS,
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

#[derive(Clone)]
struct CannedSource {
    raw: RawItinerary,
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
        _day_theme: &str,
        _language: Language,
    ) -> Result<Vec<SuggestedActivity>, Self::Error> {
        Ok(Vec::new())
    }

    async fn suggest_packing(
        &self,
        _destination: &str,
        _weather: &str,
        _activity_names: &[String],
        _language: Language,
    ) -> Result<Vec<SuggestedPackingItem>, Self::Error> {
        Ok(Vec::new())
    }

    async fn suggest_places(
        &self,
        _query: &str,
        _context: &str,
        _language: Language,
        _kind: PlaceKind,
    ) -> Result<Vec<String>, Self::Error> {
        Ok(Vec::new())
    }
}

fn kyoto_response() -> RawItinerary {
    RawItinerary {
        title: "Two Days in Kyoto".to_string(),
        destination: "Kyoto, Japan".to_string(),
        total_days: 2,
        budget_level: "Moderate".to_string(),
        summary: "Temples, markets, and a quiet river walk.".to_string(),
        weather_forecast: "Mild and clear".to_string(),
        playlist_vibe: "Lo-fi with koto samples".to_string(),
        days: Some(vec![
            RawDayPlan {
                day: 1,
                theme: "Eastern Hills".to_string(),
                activities: Some(vec![
                    RawActivity {
                        time: "9:00 AM".to_string(),
                        name: "Kiyomizu-dera".to_string(),
                        location: "Higashiyama".to_string(),
                        description: "Wooden stage over the valley.".to_string(),
                        emoji: "⛩️".to_string(),
                        cost: "Rp 60.000".to_string(),
                    },
                    RawActivity {
                        time: "1:00 PM".to_string(),
                        name: "Nishiki Market lunch".to_string(),
                        location: "Nakagyo".to_string(),
                        description: String::new(),
                        emoji: "🍜".to_string(),
                        cost: "Rp 150.000".to_string(),
                    },
                ]),
            },
            RawDayPlan {
                day: 2,
                theme: "Bamboo and River".to_string(),
                activities: Some(vec![RawActivity {
                    time: "8:30 AM".to_string(),
                    name: "Arashiyama Grove".to_string(),
                    location: "Arashiyama".to_string(),
                    description: "Beat the crowds.".to_string(),
                    emoji: "🎋".to_string(),
                    cost: "Free".to_string(),
                }]),
            },
        ]),
        ..RawItinerary::default()
    }
}

fn trip_prefs() -> TravelPreferences {
    TravelPreferences {
        origin: "Jakarta, Indonesia".to_string(),
        destination: "Kyoto, Japan".to_string(),
        days: 2,
        travelers: 2,
        ..TravelPreferences::default()
    }
}

type Engine = PlannerEngine<CannedSource, MemoryStore, MemoryBackend>;

fn planner(store: MemoryStore, seed: u64) -> Engine {
    PlannerEngine::seeded(
        CannedSource {
            raw: kyoto_response(),
        },
        store,
        MemoryBackend::new(),
        seed,
    )
}

fn sign_in(engine: &mut Engine, email: &str) -> String {
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

#[tokio::test]
async fn a_full_planning_session_survives_a_restart() {
    let store = MemoryStore::default();
    let mut engine = planner(store.clone(), 21);

    engine.restore();
    assert_eq!(engine.session().active_tab(), ResultTab::Config);

    engine.update_prefs(|p| {
        p.origin = "Jakarta, Indonesia".to_string();
        p.destination = "Kyoto, Japan".to_string();
        p.days = 2;
    });
    engine.toggle_interest("Food");
    sign_in(&mut engine, "mira@example.com");

    let outcome = engine.generate_trip().await.unwrap();
    assert!(matches!(outcome, GenerateOutcome::Planned { .. }));

    // The sort of touch-ups an owner actually makes before sharing.
    let moved = engine.session().itinerary().unwrap().days[0].activities[0]
        .id
        .clone();
    engine
        .update_activity_field(0, &moved, ActivityField::Time, "10:00 AM")
        .unwrap();
    engine.move_activity(0, &moved, 2).unwrap();
    let added = engine
        .add_activity(
            1,
            ActivityDraft {
                name: "Evening onsen".to_string(),
                ..ActivityDraft::default()
            },
        )
        .unwrap()
        .expect("an itinerary is active");
    engine.add_packing_category("Documents");

    let record = engine.save_to_account().await.unwrap().unwrap();
    assert_eq!(record.destination, "Kyoto, Japan");
    assert_eq!(record.travelers, 2);
    assert_eq!(record.origin.as_deref(), Some("Jakarta, Indonesia"));

    let pushed = engine.push_trip_edits(&record.id).await.unwrap().unwrap();
    assert_eq!(pushed.itinerary_data.days[0].activities.len(), 1);
    let last_day = &pushed.itinerary_data.days[1];
    assert!(last_day.activities.iter().any(|a| a.id == moved));
    assert!(last_day.activities.iter().any(|a| a.id == added));
    assert_eq!(
        pushed
            .packing_list
            .iter()
            .filter(|c| c.category == "Documents")
            .count(),
        1
    );

    // Same browser, next visit: a fresh engine over the same storage.
    let mut resumed = planner(store, 22);
    resumed.restore();
    assert_eq!(resumed.session().active_tab(), ResultTab::Itinerary);
    assert_eq!(resumed.session().prefs().destination, "Kyoto, Japan");
    assert_eq!(
        resumed.session().itinerary(),
        engine.session().itinerary(),
        "the mirrored result should carry every edit"
    );
}

#[tokio::test]
async fn credits_run_dry_and_recover_through_a_purchase() {
    let mut engine = planner(MemoryStore::default(), 23);
    engine.set_prefs(trip_prefs());
    let user_id = sign_in(&mut engine, "devi@example.com");

    // The welcome grant covers exactly two generations.
    let _ = engine.generate_trip().await.unwrap();
    assert_eq!(engine.session().balance(), WELCOME_CREDITS - TRIP_COST);
    let _ = engine.generate_trip().await.unwrap();
    assert_eq!(engine.session().balance(), 0);

    assert!(matches!(
        engine.generate_trip().await,
        Err(PlanError::InsufficientBalance { balance: 0, .. })
    ));

    let balance = engine.purchase_credits(50).await.unwrap();
    assert_eq!(balance, 50);
    let _ = engine.generate_trip().await.unwrap();
    assert_eq!(engine.session().balance(), 50 - TRIP_COST);

    let ledger = engine.remote().backend().transactions_for_user(&user_id);
    assert_eq!(ledger.len(), 5, "welcome, three debits, one purchase");
    assert_eq!(
        ledger
            .iter()
            .filter(|t| t.kind == TransactionKind::TripGeneration)
            .count(),
        3
    );
    assert_eq!(
        ledger
            .iter()
            .filter(|t| t.kind == TransactionKind::Purchase)
            .map(|t| t.amount)
            .sum::<i64>(),
        50
    );
}

#[tokio::test]
async fn refresh_balance_reconciles_an_out_of_date_cache() {
    let mut engine = planner(MemoryStore::default(), 24);
    let user_id = sign_in(&mut engine, "rafi@example.com");

    // Another device spends credits behind this session's back.
    let outcome = engine.remote().debit_credits(&user_id, 4).await.unwrap();
    assert!(outcome.is_debited());
    assert_eq!(engine.session().balance(), WELCOME_CREDITS);

    let balance = engine.refresh_balance().await.unwrap();
    assert_eq!(balance, WELCOME_CREDITS - 4);
    assert_eq!(engine.session().balance(), WELCOME_CREDITS - 4);
}

#[tokio::test]
async fn stored_trips_list_newest_first_and_delete_cleanly() {
    let mut engine = planner(MemoryStore::default(), 25);
    engine.set_prefs(trip_prefs());
    sign_in(&mut engine, "sari@example.com");
    let _ = engine.generate_trip().await.unwrap();

    let first = engine.save_to_account().await.unwrap().unwrap();
    let second = engine.save_to_account().await.unwrap().unwrap();

    let listed = engine.account_trips().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);

    engine.delete_account_trip(&first.id).await.unwrap();
    let listed = engine.account_trips().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, second.id);
}

#[tokio::test]
async fn signing_out_keeps_the_local_draft_and_result() {
    let store = MemoryStore::default();
    let mut engine = planner(store.clone(), 26);
    engine.set_prefs(trip_prefs());
    sign_in(&mut engine, "tomo@example.com");
    let _ = engine.generate_trip().await.unwrap();

    engine.session_mut().sign_out();
    assert_eq!(engine.session().balance(), 0);
    assert!(engine.session().itinerary().is_some());
    assert!(matches!(
        engine.generate_trip().await,
        Err(PlanError::SignedOut)
    ));

    // The local mirror is account-independent.
    let mut resumed = planner(store, 27);
    resumed.restore();
    assert!(resumed.session().itinerary().is_some());
}

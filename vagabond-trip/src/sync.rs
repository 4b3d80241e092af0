//! Account-linked persistence of itineraries, profiles, and the credit
//! ledger.
//!
//! The backend is modeled as a record store keyed by opaque ids. The bridge
//! owns the projection from the in-memory [`Itinerary`] to the denormalized
//! record shape; everything else passes through to the backend unchanged.
//! Credit debits are a single conditional decrement at the backend so two
//! near-simultaneous debits can never both pass the balance check.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TripBackend;
use crate::trip::{
    CostBreakdown, DayPlan, Itinerary, LocalPhrase, PackingCategory, TravelAdvisory,
    TravelPreferences,
};

/// Credits granted when a profile is created.
pub const WELCOME_CREDITS: u32 = 10;

/// A stored account profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub credits: u32,
    pub is_pro: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The day/activity blob stored inside an itinerary record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryData {
    pub days: Vec<DayPlan>,
}

/// A stored itinerary, denormalized for listing without touching the blob
/// columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryRecord {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub destination: String,
    pub origin: Option<String>,
    pub total_days: u32,
    pub budget_level: String,
    pub travel_style: Option<String>,
    pub travelers: u32,
    pub transport_mode: Option<String>,
    pub summary: Option<String>,
    pub weather_forecast: Option<String>,
    pub playlist_vibe: Option<String>,
    pub itinerary_data: ItineraryData,
    pub estimated_cost: CostBreakdown,
    pub packing_list: Vec<PackingCategory>,
    pub local_phrases: Vec<LocalPhrase>,
    pub travel_advisories: Vec<TravelAdvisory>,
    pub is_public: bool,
    pub shared_link_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new itinerary record. The backend mints the id,
/// timestamps, and visibility defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItineraryRecord {
    pub user_id: String,
    pub title: String,
    pub destination: String,
    pub origin: Option<String>,
    pub total_days: u32,
    pub budget_level: String,
    pub travel_style: Option<String>,
    pub travelers: u32,
    pub transport_mode: Option<String>,
    pub summary: Option<String>,
    pub weather_forecast: Option<String>,
    pub playlist_vibe: Option<String>,
    pub itinerary_data: ItineraryData,
    pub estimated_cost: CostBreakdown,
    pub packing_list: Vec<PackingCategory>,
    pub local_phrases: Vec<LocalPhrase>,
    pub travel_advisories: Vec<TravelAdvisory>,
}

/// Partial update of an itinerary record. Only the structured-data fields
/// can change after insert; identity and ownership never do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItineraryPatch {
    pub days: Option<Vec<DayPlan>>,
    pub estimated_cost: Option<CostBreakdown>,
    pub packing_list: Option<Vec<PackingCategory>>,
    pub local_phrases: Option<Vec<LocalPhrase>>,
}

impl ItineraryPatch {
    /// Patch carrying every editable field of the given itinerary. Used
    /// after local edits to push the whole edited state.
    #[must_use]
    pub fn from_trip(itinerary: &Itinerary) -> Self {
        Self {
            days: Some(itinerary.days.clone()),
            estimated_cost: Some(itinerary.estimated_cost.clone()),
            packing_list: Some(itinerary.packing_list.clone()),
            local_phrases: Some(itinerary.local_phrases.clone()),
        }
    }
}

/// Ledger entry category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    WelcomeBonus,
    #[default]
    Purchase,
    TripGeneration,
    Refund,
    AdminAdjustment,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WelcomeBonus => "welcome_bonus",
            Self::Purchase => "purchase",
            Self::TripGeneration => "trip_generation",
            Self::Refund => "refund",
            Self::AdminAdjustment => "admin_adjustment",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "welcome_bonus" => Ok(Self::WelcomeBonus),
            "purchase" => Ok(Self::Purchase),
            "trip_generation" => Ok(Self::TripGeneration),
            "refund" => Ok(Self::Refund),
            "admin_adjustment" => Ok(Self::AdminAdjustment),
            _ => Err(format!("Unknown transaction kind: {s}")),
        }
    }
}

/// One credit ledger entry. Debits carry negative amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub reference_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of a conditional credit debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum DebitOutcome {
    /// The debit went through; `balance` is the post-debit balance.
    Debited { balance: u32 },
    /// The balance was below the requested amount; nothing changed.
    Insufficient { balance: u32 },
}

impl DebitOutcome {
    #[must_use]
    pub const fn is_debited(&self) -> bool {
        matches!(self, Self::Debited { .. })
    }

    #[must_use]
    pub const fn balance(&self) -> u32 {
        match self {
            Self::Debited { balance } | Self::Insufficient { balance } => *balance,
        }
    }
}

/// Remote sync bridge over an account backend.
pub struct SyncBridge<B>
where
    B: TripBackend,
{
    backend: B,
}

impl<B> SyncBridge<B>
where
    B: TripBackend,
{
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Store the itinerary under the user's account, projecting the
    /// preference-derived fields alongside it.
    ///
    /// # Errors
    ///
    /// Propagates a backend failure unchanged; nothing is retried here.
    pub async fn save(
        &self,
        user_id: &str,
        itinerary: &Itinerary,
        prefs: &TravelPreferences,
    ) -> Result<ItineraryRecord, B::Error> {
        let record = NewItineraryRecord {
            user_id: user_id.to_string(),
            title: itinerary.title.clone(),
            destination: itinerary.destination.clone(),
            origin: Some(prefs.origin.clone()),
            total_days: itinerary.total_days,
            budget_level: itinerary.budget_level.clone(),
            travel_style: Some(prefs.travel_style.clone()),
            travelers: prefs.travelers,
            transport_mode: Some(prefs.transport_mode.clone()),
            summary: Some(itinerary.summary.clone()),
            weather_forecast: Some(itinerary.weather_forecast.clone()),
            playlist_vibe: Some(itinerary.playlist_vibe.clone()),
            itinerary_data: ItineraryData {
                days: itinerary.days.clone(),
            },
            estimated_cost: itinerary.estimated_cost.clone(),
            packing_list: itinerary.packing_list.clone(),
            local_phrases: itinerary.local_phrases.clone(),
            travel_advisories: itinerary.travel_advisories.clone(),
        };
        self.backend.insert_itinerary(record).await
    }

    /// All of the user's stored itineraries, newest first.
    ///
    /// # Errors
    ///
    /// Propagates a backend failure unchanged.
    pub async fn load_all(&self, user_id: &str) -> Result<Vec<ItineraryRecord>, B::Error> {
        self.backend.itineraries_for_user(user_id).await
    }

    /// Remove one stored itinerary. The caller confirms intent first.
    ///
    /// # Errors
    ///
    /// Propagates a backend failure unchanged.
    pub async fn delete(&self, record_id: &str) -> Result<(), B::Error> {
        self.backend.delete_itinerary(record_id).await
    }

    /// Push edited structured data to one stored itinerary. Returns `None`
    /// if the record no longer exists.
    ///
    /// # Errors
    ///
    /// Propagates a backend failure unchanged.
    pub async fn update(
        &self,
        record_id: &str,
        patch: ItineraryPatch,
    ) -> Result<Option<ItineraryRecord>, B::Error> {
        self.backend.update_itinerary(record_id, patch).await
    }

    /// Fetch the user's profile, if one exists.
    ///
    /// # Errors
    ///
    /// Propagates a backend failure unchanged.
    pub async fn profile(&self, user_id: &str) -> Result<Option<ProfileRecord>, B::Error> {
        self.backend.profile(user_id).await
    }

    /// Conditionally debit credits. The balance check, decrement, and
    /// ledger append happen atomically at the backend; an insufficient
    /// balance changes nothing.
    ///
    /// # Errors
    ///
    /// Propagates a backend failure unchanged.
    pub async fn debit_credits(
        &self,
        user_id: &str,
        amount: u32,
    ) -> Result<DebitOutcome, B::Error> {
        self.backend.debit_credits(user_id, amount).await
    }

    /// Grant credits and append the matching ledger entry. Returns the new
    /// balance.
    ///
    /// # Errors
    ///
    /// Propagates a backend failure unchanged.
    pub async fn credit_credits(
        &self,
        user_id: &str,
        amount: u32,
        kind: TransactionKind,
        description: Option<&str>,
    ) -> Result<u32, B::Error> {
        self.backend.credit_credits(user_id, amount, kind, description).await
    }
}

/// In-memory reference backend. Single-process, safe to share across tasks;
/// debits are atomic under the interior lock.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    profiles: HashMap<String, ProfileRecord>,
    itineraries: Vec<ItineraryRecord>,
    transactions: Vec<CreditTransaction>,
    next_id: u64,
}

impl MemoryState {
    fn mint_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn push_transaction(
        &mut self,
        user_id: &str,
        amount: i64,
        kind: TransactionKind,
        description: Option<&str>,
    ) {
        let id = self.mint_id("txn");
        self.transactions.push(CreditTransaction {
            id,
            user_id: user_id.to_string(),
            amount,
            kind,
            description: description.map(str::to_string),
            reference_id: None,
            created_at: Utc::now(),
        });
    }
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profile with the welcome credit grant already applied and
    /// recorded in the ledger.
    pub fn create_profile(&self, email: &str, username: Option<&str>) -> ProfileRecord {
        let mut state = self.lock();
        let id = state.mint_id("usr");
        let now = Utc::now();
        let profile = ProfileRecord {
            id: id.clone(),
            email: email.to_string(),
            username: username.map(str::to_string),
            full_name: None,
            avatar_url: None,
            credits: WELCOME_CREDITS,
            is_pro: false,
            created_at: now,
            updated_at: now,
        };
        state.profiles.insert(id.clone(), profile.clone());
        state.push_transaction(
            &id,
            i64::from(WELCOME_CREDITS),
            TransactionKind::WelcomeBonus,
            Some("Welcome bonus"),
        );
        profile
    }

    /// Ledger entries for one user, oldest first.
    #[must_use]
    pub fn transactions_for_user(&self, user_id: &str) -> Vec<CreditTransaction> {
        self.lock()
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl TripBackend for MemoryBackend {
    type Error = std::convert::Infallible;

    async fn insert_itinerary(
        &self,
        record: NewItineraryRecord,
    ) -> Result<ItineraryRecord, Self::Error> {
        let mut state = self.lock();
        let id = state.mint_id("itin");
        let now = Utc::now();
        let stored = ItineraryRecord {
            id,
            user_id: record.user_id,
            title: record.title,
            destination: record.destination,
            origin: record.origin,
            total_days: record.total_days,
            budget_level: record.budget_level,
            travel_style: record.travel_style,
            travelers: record.travelers,
            transport_mode: record.transport_mode,
            summary: record.summary,
            weather_forecast: record.weather_forecast,
            playlist_vibe: record.playlist_vibe,
            itinerary_data: record.itinerary_data,
            estimated_cost: record.estimated_cost,
            packing_list: record.packing_list,
            local_phrases: record.local_phrases,
            travel_advisories: record.travel_advisories,
            is_public: false,
            shared_link_id: None,
            created_at: now,
            updated_at: now,
        };
        state.itineraries.push(stored.clone());
        Ok(stored)
    }

    async fn itineraries_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<ItineraryRecord>, Self::Error> {
        let state = self.lock();
        // Insertion order is creation order, so newest-first is a reverse
        // scan even when timestamps collide.
        Ok(state
            .itineraries
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_itinerary(&self, itinerary_id: &str) -> Result<(), Self::Error> {
        self.lock().itineraries.retain(|r| r.id != itinerary_id);
        Ok(())
    }

    async fn update_itinerary(
        &self,
        itinerary_id: &str,
        patch: ItineraryPatch,
    ) -> Result<Option<ItineraryRecord>, Self::Error> {
        let mut state = self.lock();
        let Some(record) = state.itineraries.iter_mut().find(|r| r.id == itinerary_id) else {
            return Ok(None);
        };
        if let Some(days) = patch.days {
            record.itinerary_data = ItineraryData { days };
        }
        if let Some(cost) = patch.estimated_cost {
            record.estimated_cost = cost;
        }
        if let Some(packing) = patch.packing_list {
            record.packing_list = packing;
        }
        if let Some(phrases) = patch.local_phrases {
            record.local_phrases = phrases;
        }
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn profile(&self, user_id: &str) -> Result<Option<ProfileRecord>, Self::Error> {
        Ok(self.lock().profiles.get(user_id).cloned())
    }

    async fn debit_credits(
        &self,
        user_id: &str,
        amount: u32,
    ) -> Result<DebitOutcome, Self::Error> {
        let mut state = self.lock();
        let Some(balance) = state.profiles.get(user_id).map(|p| p.credits) else {
            return Ok(DebitOutcome::Insufficient { balance: 0 });
        };
        if balance < amount {
            return Ok(DebitOutcome::Insufficient { balance });
        }
        let balance = balance - amount;
        if let Some(profile) = state.profiles.get_mut(user_id) {
            profile.credits = balance;
            profile.updated_at = Utc::now();
        }
        state.push_transaction(
            user_id,
            -i64::from(amount),
            TransactionKind::TripGeneration,
            None,
        );
        Ok(DebitOutcome::Debited { balance })
    }

    async fn credit_credits(
        &self,
        user_id: &str,
        amount: u32,
        kind: TransactionKind,
        description: Option<&str>,
    ) -> Result<u32, Self::Error> {
        let mut state = self.lock();
        let Some(balance) = state.profiles.get(user_id).map(|p| p.credits) else {
            return Ok(0);
        };
        let balance = balance + amount;
        if let Some(profile) = state.profiles.get_mut(user_id) {
            profile.credits = balance;
            profile.updated_at = Utc::now();
        }
        state.push_transaction(user_id, i64::from(amount), kind, description);
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::IdSource;
    use crate::normalize::{RawActivity, RawDayPlan, RawItinerary, normalize};
    use crate::trip::BudgetTier;

    fn sample_trip() -> Itinerary {
        let raw = RawItinerary {
            title: "Three Days in Lisbon".to_string(),
            destination: "Lisbon, Portugal".to_string(),
            total_days: 2,
            budget_level: "Moderate".to_string(),
            summary: "Hills, tiles, custard tarts".to_string(),
            weather_forecast: "Mild and sunny".to_string(),
            playlist_vibe: "Fado and indie".to_string(),
            days: Some(
                (1..=2)
                    .map(|day| RawDayPlan {
                        day,
                        theme: format!("Day {day}"),
                        activities: Some(vec![RawActivity {
                            time: "9:00 AM".to_string(),
                            name: format!("Stop {day}"),
                            location: "Alfama".to_string(),
                            description: String::new(),
                            emoji: "🚋".to_string(),
                            cost: "Rp 150.000".to_string(),
                        }]),
                    })
                    .collect(),
            ),
            ..RawItinerary::default()
        };
        let mut ids = IdSource::seeded(41);
        normalize(raw, &mut ids).unwrap()
    }

    fn sample_prefs() -> TravelPreferences {
        TravelPreferences {
            origin: "Jakarta, Indonesia".to_string(),
            destination: "Lisbon, Portugal".to_string(),
            days: 2,
            budget: BudgetTier::Moderate,
            interests: vec!["Food".to_string()],
            travelers: 2,
            transport_mode: "Trams".to_string(),
            travel_style: "Relaxed".to_string(),
        }
    }

    #[tokio::test]
    async fn save_projects_trip_and_preference_fields() {
        let bridge = SyncBridge::new(MemoryBackend::new());
        let user = bridge.backend().create_profile("ana@example.com", Some("ana"));

        let trip = sample_trip();
        let record = bridge.save(&user.id, &trip, &sample_prefs()).await.unwrap();

        assert_eq!(record.user_id, user.id);
        assert_eq!(record.title, "Three Days in Lisbon");
        assert_eq!(record.origin.as_deref(), Some("Jakarta, Indonesia"));
        assert_eq!(record.travel_style.as_deref(), Some("Relaxed"));
        assert_eq!(record.transport_mode.as_deref(), Some("Trams"));
        assert_eq!(record.travelers, 2);
        assert_eq!(record.itinerary_data.days, trip.days);
        assert!(!record.is_public);
    }

    #[tokio::test]
    async fn load_all_is_newest_first_and_scoped_to_user() {
        let bridge = SyncBridge::new(MemoryBackend::new());
        let ana = bridge.backend().create_profile("ana@example.com", None);
        let ben = bridge.backend().create_profile("ben@example.com", None);

        let mut first = sample_trip();
        first.title = "First".to_string();
        let mut second = sample_trip();
        second.title = "Second".to_string();
        let prefs = sample_prefs();

        bridge.save(&ana.id, &first, &prefs).await.unwrap();
        bridge.save(&ana.id, &second, &prefs).await.unwrap();
        bridge.save(&ben.id, &sample_trip(), &prefs).await.unwrap();

        let titles: Vec<String> = bridge
            .load_all(&ana.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Second".to_string(), "First".to_string()]);

        assert!(bridge.load_all("usr-none").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_touches_only_supplied_fields() {
        let bridge = SyncBridge::new(MemoryBackend::new());
        let user = bridge.backend().create_profile("ana@example.com", None);
        let trip = sample_trip();
        let record = bridge.save(&user.id, &trip, &sample_prefs()).await.unwrap();

        let mut edited = trip.clone();
        edited.days[0].theme = "Azulejos all day".to_string();
        let patch = ItineraryPatch {
            days: Some(edited.days.clone()),
            ..ItineraryPatch::default()
        };

        let updated = bridge.update(&record.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.itinerary_data.days[0].theme, "Azulejos all day");
        assert_eq!(updated.title, record.title);
        assert_eq!(updated.estimated_cost, record.estimated_cost);

        assert!(bridge.update("itin-none", ItineraryPatch::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let bridge = SyncBridge::new(MemoryBackend::new());
        let user = bridge.backend().create_profile("ana@example.com", None);
        let record = bridge
            .save(&user.id, &sample_trip(), &sample_prefs())
            .await
            .unwrap();

        bridge.delete(&record.id).await.unwrap();
        assert!(bridge.load_all(&user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_creation_grants_welcome_credits_once() {
        let backend = MemoryBackend::new();
        let user = backend.create_profile("ana@example.com", Some("ana"));
        assert_eq!(user.credits, WELCOME_CREDITS);

        let ledger = backend.transactions_for_user(&user.id);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].kind, TransactionKind::WelcomeBonus);
        assert_eq!(ledger[0].amount, i64::from(WELCOME_CREDITS));
    }

    #[tokio::test]
    async fn debit_below_balance_changes_nothing() {
        let bridge = SyncBridge::new(MemoryBackend::new());
        let user = bridge.backend().create_profile("ana@example.com", None);
        bridge.debit_credits(&user.id, 7).await.unwrap();

        let outcome = bridge.debit_credits(&user.id, 5).await.unwrap();
        assert_eq!(outcome, DebitOutcome::Insufficient { balance: 3 });

        let profile = bridge.profile(&user.id).await.unwrap().unwrap();
        assert_eq!(profile.credits, 3);
        // Only the welcome bonus and the one successful debit are recorded.
        assert_eq!(bridge.backend().transactions_for_user(&user.id).len(), 2);
    }

    #[tokio::test]
    async fn debit_records_a_negative_trip_generation_entry() {
        let bridge = SyncBridge::new(MemoryBackend::new());
        let user = bridge.backend().create_profile("ana@example.com", None);

        let outcome = bridge.debit_credits(&user.id, 5).await.unwrap();
        assert_eq!(outcome, DebitOutcome::Debited { balance: 5 });

        let ledger = bridge.backend().transactions_for_user(&user.id);
        let debit = ledger.last().unwrap();
        assert_eq!(debit.kind, TransactionKind::TripGeneration);
        assert_eq!(debit.amount, -5);
    }

    #[tokio::test]
    async fn concurrent_debits_cannot_both_pass_the_check() {
        let bridge = SyncBridge::new(MemoryBackend::new());
        let user = bridge.backend().create_profile("ana@example.com", None);

        let (a, b) = tokio::join!(
            bridge.debit_credits(&user.id, 7),
            bridge.debit_credits(&user.id, 7)
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert!(a.is_debited() ^ b.is_debited());
        let profile = bridge.profile(&user.id).await.unwrap().unwrap();
        assert_eq!(profile.credits, 3);
    }

    #[tokio::test]
    async fn credit_grant_appends_positive_ledger_entry() {
        let bridge = SyncBridge::new(MemoryBackend::new());
        let user = bridge.backend().create_profile("ana@example.com", None);

        let balance = bridge
            .credit_credits(&user.id, 50, TransactionKind::Purchase, Some("Pack of 50"))
            .await
            .unwrap();
        assert_eq!(balance, WELCOME_CREDITS + 50);

        let ledger = bridge.backend().transactions_for_user(&user.id);
        let purchase = ledger.last().unwrap();
        assert_eq!(purchase.kind, TransactionKind::Purchase);
        assert_eq!(purchase.amount, 50);
        assert_eq!(purchase.description.as_deref(), Some("Pack of 50"));
    }

    #[tokio::test]
    async fn debit_for_unknown_user_is_insufficient_at_zero() {
        let bridge = SyncBridge::new(MemoryBackend::new());
        let outcome = bridge.debit_credits("usr-none", 1).await.unwrap();
        assert_eq!(outcome, DebitOutcome::Insufficient { balance: 0 });
    }

    #[test]
    fn transaction_kind_round_trips_through_strings() {
        for kind in [
            TransactionKind::WelcomeBonus,
            TransactionKind::Purchase,
            TransactionKind::TripGeneration,
            TransactionKind::Refund,
            TransactionKind::AdminAdjustment,
        ] {
            assert_eq!(kind.as_str().parse::<TransactionKind>().unwrap(), kind);
        }
        assert!("mystery".parse::<TransactionKind>().is_err());

        let json = serde_json::to_string(&TransactionKind::TripGeneration).unwrap();
        assert_eq!(json, "\"trip_generation\"");
    }
}

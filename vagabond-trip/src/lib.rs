//! Vagabond Trip Engine
//!
//! Platform-agnostic core for the Vagabond AI trip planner. This crate owns
//! the itinerary data model, every structural edit over it, and the bridges
//! to local draft storage and the account backend, without UI or
//! platform-specific dependencies.

use async_trait::async_trait;

pub mod cost;
pub mod draft;
pub mod edit;
pub mod generate;
pub mod ident;
pub mod links;
pub mod normalize;
pub mod schedule;
pub mod session;
pub mod sync;
pub mod trip;

// Re-export commonly used types
pub use cost::{BudgetSlice, CostKind, budget_slices, chart_ceiling, format_idr, magnitude};
pub use draft::{DRAFT_KEY, DraftVault, RESULT_KEY, VAULT_KEY};
pub use edit::{ActivityDraft, ActivityField, EditError};
pub use generate::{
    Language, PLACE_QUERY_MIN_CHARS, PlaceKind, SuggestedActivity, SuggestedPackingItem,
};
pub use ident::{EntityId, IdSource};
pub use links::{map_url, playlist_search_url};
pub use normalize::{NormalizeError, RawActivity, RawDayPlan, RawItinerary, normalize};
pub use schedule::{COMMON_EMOJIS, TimeOfDay, time_of_day, time_slots};
pub use session::{
    Account, FeedbackState, ResultTab, SURPRISE_DESTINATIONS, SURPRISE_ORIGINS, TripSession,
};
pub use sync::{
    CreditTransaction, DebitOutcome, ItineraryData, ItineraryPatch, ItineraryRecord,
    MemoryBackend, NewItineraryRecord, ProfileRecord, SyncBridge, TransactionKind,
    WELCOME_CREDITS,
};
pub use trip::{
    Activity, AdvisorySeverity, BudgetTier, CostBreakdown, DEFAULT_TRANSPORT_MODE,
    DEFAULT_TRAVEL_STYLE, DEFAULT_TRIP_DAYS, DayPlan, Itinerary, LocalPhrase, PackingCategory,
    PackingItem, TravelAdvisory, TravelPreferences,
};

/// Credits one trip generation costs.
pub const TRIP_COST: u32 = 5;

/// Trait for abstracting the AI trip collaborator.
/// Platform-specific implementations should provide this.
#[async_trait]
pub trait ItinerarySource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a full itinerary for the preferences, in the language.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator is unreachable or its response
    /// does not parse.
    async fn generate(
        &self,
        prefs: &TravelPreferences,
        language: Language,
    ) -> Result<RawItinerary, Self::Error>;

    /// Three activity suggestions for one day's theme.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator is unreachable or its response
    /// does not parse.
    async fn suggest_activities(
        &self,
        destination: &str,
        day_theme: &str,
        language: Language,
    ) -> Result<Vec<SuggestedActivity>, Self::Error>;

    /// Five to seven packing suggestions for the destination, its weather,
    /// and the planned activities.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator is unreachable or its response
    /// does not parse.
    async fn suggest_packing(
        &self,
        destination: &str,
        weather: &str,
        activity_names: &[String],
        language: Language,
    ) -> Result<Vec<SuggestedPackingItem>, Self::Error>;

    /// Up to five place-name completions for a partial query.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator is unreachable or its response
    /// does not parse.
    async fn suggest_places(
        &self,
        query: &str,
        context: &str,
        language: Language,
        kind: PlaceKind,
    ) -> Result<Vec<String>, Self::Error>;
}

/// Trait for abstracting local durable key/value storage.
/// Platform-specific implementations should provide this.
pub trait DraftStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the string stored under the key, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store a string under the key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove the key entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Trait for abstracting the account backend's record store and credit
/// ledger. Platform-specific implementations should provide this.
#[async_trait]
pub trait TripBackend {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert one itinerary record, returning it with backend-minted id and
    /// timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error on a backend I/O failure.
    async fn insert_itinerary(
        &self,
        record: NewItineraryRecord,
    ) -> Result<ItineraryRecord, Self::Error>;

    /// All itinerary records owned by the user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error on a backend I/O failure.
    async fn itineraries_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<ItineraryRecord>, Self::Error>;

    /// Delete one itinerary record. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error on a backend I/O failure.
    async fn delete_itinerary(&self, itinerary_id: &str) -> Result<(), Self::Error>;

    /// Apply a partial update to one record's structured-data fields,
    /// returning the updated record, or `None` if the record is gone.
    ///
    /// # Errors
    ///
    /// Returns an error on a backend I/O failure.
    async fn update_itinerary(
        &self,
        itinerary_id: &str,
        patch: ItineraryPatch,
    ) -> Result<Option<ItineraryRecord>, Self::Error>;

    /// Fetch one profile, or `None` if the user is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error on a backend I/O failure.
    async fn profile(&self, user_id: &str) -> Result<Option<ProfileRecord>, Self::Error>;

    /// Atomically debit credits: check the balance, decrement it, and append
    /// a negative `trip_generation` ledger entry in one step. An
    /// insufficient balance (or unknown user) changes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error on a backend I/O failure.
    async fn debit_credits(
        &self,
        user_id: &str,
        amount: u32,
    ) -> Result<DebitOutcome, Self::Error>;

    /// Grant credits and append the matching positive ledger entry,
    /// returning the new balance. Unknown users are a no-op reported as a
    /// zero balance.
    ///
    /// # Errors
    ///
    /// Returns an error on a backend I/O failure.
    async fn credit_credits(
        &self,
        user_id: &str,
        amount: u32,
        kind: TransactionKind,
        description: Option<&str>,
    ) -> Result<u32, Self::Error>;
}

/// Errors surfaced by [`PlannerEngine`] operations that go beyond a single
/// structural edit.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("sign in before planning trips")]
    SignedOut,
    #[error("destination and origin are both required")]
    MissingPreferences,
    #[error("insufficient credits: balance {balance}, requested {requested}")]
    InsufficientBalance { balance: u32, requested: u32 },
    #[error("trip generation failed")]
    GenerationFailed(#[source] anyhow::Error),
    #[error("account backend request failed")]
    Backend(#[source] anyhow::Error),
}

/// Everything a caller needs to run one generation request out-of-band:
/// the staleness token plus a snapshot of who asked and for what.
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub token: u64,
    pub user_id: String,
    pub prefs: TravelPreferences,
    pub language: Language,
}

/// How a completed generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum GenerateOutcome {
    /// The trip was installed and the debit went through; `balance` is the
    /// post-debit credit balance.
    Planned { balance: u32 },
    /// A newer request started while this one was in flight; its response
    /// was discarded unapplied.
    Superseded,
}

/// Main planning engine for one user session.
///
/// Owns the session state and routes every mutation through the local draft
/// mirror, so storage never lags the in-memory itinerary.
pub struct PlannerEngine<A, D, B>
where
    A: ItinerarySource,
    D: DraftStore,
    B: TripBackend,
{
    source: A,
    vault: DraftVault<D>,
    remote: SyncBridge<B>,
    session: TripSession,
    language: Language,
}

impl<A, D, B> PlannerEngine<A, D, B>
where
    A: ItinerarySource,
    D: DraftStore,
    B: TripBackend,
{
    /// Create an engine with a fresh session and entropy-seeded identities.
    pub fn new(source: A, store: D, backend: B) -> Self {
        Self::with_session(source, store, backend, TripSession::default())
    }

    /// Create an engine whose identity stream is reproducible from `seed`.
    pub fn seeded(source: A, store: D, backend: B, seed: u64) -> Self {
        Self::with_session(
            source,
            store,
            backend,
            TripSession::new(IdSource::seeded(seed)),
        )
    }

    pub fn with_session(source: A, store: D, backend: B, session: TripSession) -> Self {
        Self {
            source,
            vault: DraftVault::new(store),
            remote: SyncBridge::new(backend),
            session,
            language: Language::default(),
        }
    }

    #[must_use]
    pub const fn session(&self) -> &TripSession {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut TripSession {
        &mut self.session
    }

    #[must_use]
    pub const fn vault(&self) -> &DraftVault<D> {
        &self.vault
    }

    #[must_use]
    pub const fn remote(&self) -> &SyncBridge<B> {
        &self.remote
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    pub const fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Rehydrate the session from local storage: the preference draft, the
    /// mirrored result, and the tab to land on.
    pub fn restore(&mut self) {
        let prefs = self.vault.load_draft();
        let result = self.vault.load_result();
        self.session
            .set_active_tab(ResultTab::initial(result.is_some()));
        self.session.set_prefs(prefs);
        self.session.set_itinerary(result);
    }

    /// Replace the preference draft and mirror it.
    pub fn set_prefs(&mut self, prefs: TravelPreferences) {
        self.session.set_prefs(prefs);
        self.vault.save_draft(self.session.prefs());
    }

    /// Edit the preference draft in place and mirror the result.
    pub fn update_prefs(&mut self, f: impl FnOnce(&mut TravelPreferences)) {
        f(self.session.prefs_mut());
        self.vault.save_draft(self.session.prefs());
    }

    /// Toggle one interest chip on the draft.
    pub fn toggle_interest(&mut self, interest: &str) {
        self.session.toggle_interest(interest);
        self.vault.save_draft(self.session.prefs());
    }

    /// Roll a random destination and origin into the draft.
    pub fn surprise_me(&mut self) {
        self.session.surprise_me();
        self.vault.save_draft(self.session.prefs());
    }

    /// Gate and start a generation request: requires a destination and
    /// origin, a signed-in account, and a cached balance covering
    /// [`TRIP_COST`]. Clears the active trip and its mirror, bumps the
    /// staleness token, and returns the request snapshot the source call
    /// needs.
    ///
    /// # Errors
    ///
    /// [`PlanError::MissingPreferences`], [`PlanError::SignedOut`], or
    /// [`PlanError::InsufficientBalance`] when a gate fails; the session is
    /// untouched in those cases.
    pub fn begin_trip_request(&mut self) -> Result<TripRequest, PlanError> {
        let prefs = self.session.prefs();
        if prefs.destination.is_empty() || prefs.origin.is_empty() {
            return Err(PlanError::MissingPreferences);
        }
        let Some(account) = self.session.account() else {
            return Err(PlanError::SignedOut);
        };
        if account.credits < TRIP_COST {
            return Err(PlanError::InsufficientBalance {
                balance: account.credits,
                requested: TRIP_COST,
            });
        }
        let user_id = account.user_id.clone();
        let prefs = prefs.clone();
        let token = self.session.begin_generation();
        self.vault.clear_result();
        Ok(TripRequest {
            token,
            user_id,
            prefs,
            language: self.language,
        })
    }

    /// Install a generation response for the given request. Returns `false`
    /// without touching anything if a newer request has started since; on
    /// install the trip gets identities, the request's preferences ride
    /// along for later reloads, and the itinerary tab comes to the front.
    ///
    /// # Errors
    ///
    /// [`PlanError::GenerationFailed`] if the response is malformed; the
    /// session stays cleared.
    pub fn install_trip(
        &mut self,
        request: &TripRequest,
        raw: RawItinerary,
    ) -> Result<bool, PlanError> {
        if request.token != self.session.generation() {
            return Ok(false);
        }
        let mut planned = normalize(raw, self.session.ids_mut())
            .map_err(|e| PlanError::GenerationFailed(e.into()))?;
        planned.original_prefs = Some(request.prefs.clone());
        self.session.set_itinerary(Some(planned));
        self.session.set_active_tab(ResultTab::Itinerary);
        self.mirror_result();
        Ok(true)
    }

    /// Run a full generation: gate, call the source, install the response,
    /// then debit [`TRIP_COST`] from the account. The debit happens after a
    /// successful install; a failed generation costs nothing. If the atomic
    /// debit loses a concurrent race the trip stays installed and the
    /// shortfall is surfaced once.
    ///
    /// # Errors
    ///
    /// The gate errors from [`Self::begin_trip_request`],
    /// [`PlanError::GenerationFailed`] for source or shape failures, and
    /// [`PlanError::Backend`] / [`PlanError::InsufficientBalance`] from the
    /// debit.
    pub async fn generate_trip(&mut self) -> Result<GenerateOutcome, PlanError>
    where
        A::Error: Into<anyhow::Error>,
        B::Error: Into<anyhow::Error>,
    {
        let request = self.begin_trip_request()?;
        let raw = self
            .source
            .generate(&request.prefs, request.language)
            .await
            .map_err(|e| PlanError::GenerationFailed(e.into()))?;
        if !self.install_trip(&request, raw)? {
            return Ok(GenerateOutcome::Superseded);
        }
        let outcome = self
            .remote
            .debit_credits(&request.user_id, TRIP_COST)
            .await
            .map_err(|e| PlanError::Backend(e.into()))?;
        if let Some(account) = self.session.account_mut() {
            account.credits = outcome.balance();
        }
        match outcome {
            DebitOutcome::Debited { balance } => Ok(GenerateOutcome::Planned { balance }),
            DebitOutcome::Insufficient { balance } => Err(PlanError::InsufficientBalance {
                balance,
                requested: TRIP_COST,
            }),
        }
    }

    /// Reorder whole days by identity; day numbers are reassigned 1..N in
    /// the new order. Without an active itinerary this is a no-op.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidOperand`] unless the order is a permutation of
    /// the current day identities.
    pub fn reorder_days(&mut self, new_order: &[EntityId]) -> Result<(), EditError> {
        let Some(planned) = self.session.itinerary_mut() else {
            return Ok(());
        };
        planned.reorder_days(new_order)?;
        self.mirror_result();
        Ok(())
    }

    /// Reorder one day's activities by identity.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] or [`EditError::InvalidOperand`] per
    /// [`Itinerary::reorder_activities`].
    pub fn reorder_activities(
        &mut self,
        day_index: usize,
        new_order: &[EntityId],
    ) -> Result<(), EditError> {
        let Some(planned) = self.session.itinerary_mut() else {
            return Ok(());
        };
        planned.reorder_activities(day_index, new_order)?;
        self.mirror_result();
        Ok(())
    }

    /// Move one activity to the end of another day.
    ///
    /// # Errors
    ///
    /// Per [`Itinerary::move_activity`].
    pub fn move_activity(
        &mut self,
        from_day_index: usize,
        activity_id: &EntityId,
        to_day_number: u32,
    ) -> Result<(), EditError> {
        let Some(planned) = self.session.itinerary_mut() else {
            return Ok(());
        };
        planned.move_activity(from_day_index, activity_id, to_day_number)?;
        self.mirror_result();
        Ok(())
    }

    /// Edit a single field of one activity in place.
    ///
    /// # Errors
    ///
    /// Per [`Itinerary::update_activity_field`].
    pub fn update_activity_field(
        &mut self,
        day_index: usize,
        activity_id: &EntityId,
        field: ActivityField,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let Some(planned) = self.session.itinerary_mut() else {
            return Ok(());
        };
        planned.update_activity_field(day_index, activity_id, field, value)?;
        self.mirror_result();
        Ok(())
    }

    /// Replace one day's theme.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `day_index`.
    pub fn update_day_theme(
        &mut self,
        day_index: usize,
        theme: impl Into<String>,
    ) -> Result<(), EditError> {
        let Some(planned) = self.session.itinerary_mut() else {
            return Ok(());
        };
        planned.update_day_theme(day_index, theme)?;
        self.mirror_result();
        Ok(())
    }

    /// Append a drafted activity to one day, returning its fresh identity,
    /// or `None` when no itinerary is active.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `day_index`.
    pub fn add_activity(
        &mut self,
        day_index: usize,
        activity: ActivityDraft,
    ) -> Result<Option<EntityId>, EditError> {
        let Some(added) = self
            .session
            .with_trip_and_ids(|planned, ids| planned.add_activity(day_index, activity, ids))
        else {
            return Ok(None);
        };
        let id = added?;
        self.mirror_result();
        Ok(Some(id))
    }

    /// Delete one activity; deleting an id that is already gone is a no-op.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `day_index`.
    pub fn delete_activity(
        &mut self,
        day_index: usize,
        activity_id: &EntityId,
    ) -> Result<(), EditError> {
        let Some(planned) = self.session.itinerary_mut() else {
            return Ok(());
        };
        planned.delete_activity(day_index, activity_id)?;
        self.mirror_result();
        Ok(())
    }

    /// Append an empty packing category; blank names are silently ignored.
    pub fn add_packing_category(&mut self, name: impl Into<String>) {
        if let Some(planned) = self.session.itinerary_mut() {
            planned.add_packing_category(name);
            self.mirror_result();
        }
    }

    /// Remove one packing category and everything in it.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `category_index`.
    pub fn delete_packing_category(&mut self, category_index: usize) -> Result<(), EditError> {
        let Some(planned) = self.session.itinerary_mut() else {
            return Ok(());
        };
        planned.delete_packing_category(category_index)?;
        self.mirror_result();
        Ok(())
    }

    /// Append a named packing item; blank names are silently ignored.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `category_index`.
    pub fn add_packing_item(
        &mut self,
        category_index: usize,
        name: impl Into<String>,
    ) -> Result<(), EditError> {
        let Some(planned) = self.session.itinerary_mut() else {
            return Ok(());
        };
        planned.add_packing_item(category_index, name)?;
        self.mirror_result();
        Ok(())
    }

    /// Remove one packing item by position.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for either index.
    pub fn remove_packing_item(
        &mut self,
        category_index: usize,
        item_index: usize,
    ) -> Result<(), EditError> {
        let Some(planned) = self.session.itinerary_mut() else {
            return Ok(());
        };
        planned.remove_packing_item(category_index, item_index)?;
        self.mirror_result();
        Ok(())
    }

    /// Merge one accepted packing suggestion; accepting the same suggestion
    /// twice adds exactly one item.
    pub fn merge_suggested_packing_item(&mut self, suggestion: &SuggestedPackingItem) {
        if let Some(planned) = self.session.itinerary_mut() {
            planned.merge_suggested_packing_item(suggestion);
            self.mirror_result();
        }
    }

    /// Save the active itinerary to the local vault. Returns whether it was
    /// added; an already-saved trip (same destination and title) or an
    /// empty session adds nothing.
    ///
    /// # Errors
    ///
    /// Propagates a storage write failure.
    pub fn save_active_to_vault(&self) -> Result<bool, D::Error> {
        let Some(planned) = self.session.itinerary() else {
            return Ok(false);
        };
        self.vault.save_to_vault(planned)
    }

    /// The locally saved itineraries.
    #[must_use]
    pub fn saved_trips(&self) -> Vec<Itinerary> {
        self.vault.load_vault()
    }

    /// Bring a previously saved itinerary back as the active one. Its
    /// embedded preferences, when present, replace the draft so the config
    /// form matches the loaded trip.
    pub fn open_itinerary(&mut self, planned: Itinerary) {
        if let Some(prefs) = planned.original_prefs.clone() {
            self.session.set_prefs(prefs);
            self.vault.save_draft(self.session.prefs());
        }
        self.session.set_itinerary(Some(planned));
        self.session.set_active_tab(ResultTab::Itinerary);
        self.mirror_result();
    }

    /// Persist the active itinerary under the signed-in account. Returns
    /// `None` when there is nothing active to save.
    ///
    /// # Errors
    ///
    /// [`PlanError::SignedOut`] without an account, [`PlanError::Backend`]
    /// on a backend failure.
    pub async fn save_to_account(&self) -> Result<Option<ItineraryRecord>, PlanError>
    where
        B::Error: Into<anyhow::Error>,
    {
        let Some(account) = self.session.account() else {
            return Err(PlanError::SignedOut);
        };
        let Some(planned) = self.session.itinerary() else {
            return Ok(None);
        };
        self.remote
            .save(&account.user_id, planned, self.session.prefs())
            .await
            .map(Some)
            .map_err(|e| PlanError::Backend(e.into()))
    }

    /// The signed-in account's stored itineraries, newest first.
    ///
    /// # Errors
    ///
    /// [`PlanError::SignedOut`] without an account, [`PlanError::Backend`]
    /// on a backend failure.
    pub async fn account_trips(&self) -> Result<Vec<ItineraryRecord>, PlanError>
    where
        B::Error: Into<anyhow::Error>,
    {
        let Some(account) = self.session.account() else {
            return Err(PlanError::SignedOut);
        };
        self.remote
            .load_all(&account.user_id)
            .await
            .map_err(|e| PlanError::Backend(e.into()))
    }

    /// Delete one of the account's stored itineraries.
    ///
    /// # Errors
    ///
    /// [`PlanError::Backend`] on a backend failure.
    pub async fn delete_account_trip(&self, record_id: &str) -> Result<(), PlanError>
    where
        B::Error: Into<anyhow::Error>,
    {
        self.remote
            .delete(record_id)
            .await
            .map_err(|e| PlanError::Backend(e.into()))
    }

    /// Push the active itinerary's edited fields to one stored record.
    /// Returns `None` when nothing is active or the record is gone.
    ///
    /// # Errors
    ///
    /// [`PlanError::Backend`] on a backend failure.
    pub async fn push_trip_edits(
        &self,
        record_id: &str,
    ) -> Result<Option<ItineraryRecord>, PlanError>
    where
        B::Error: Into<anyhow::Error>,
    {
        let Some(planned) = self.session.itinerary() else {
            return Ok(None);
        };
        self.remote
            .update(record_id, ItineraryPatch::from_trip(planned))
            .await
            .map_err(|e| PlanError::Backend(e.into()))
    }

    /// Re-fetch the authoritative balance into the cached account.
    ///
    /// # Errors
    ///
    /// [`PlanError::SignedOut`] without an account, [`PlanError::Backend`]
    /// on a backend failure.
    pub async fn refresh_balance(&mut self) -> Result<u32, PlanError>
    where
        B::Error: Into<anyhow::Error>,
    {
        let Some(account) = self.session.account() else {
            return Err(PlanError::SignedOut);
        };
        let profile = self
            .remote
            .profile(&account.user_id)
            .await
            .map_err(|e| PlanError::Backend(e.into()))?;
        let balance = profile.map_or(0, |p| p.credits);
        if let Some(account) = self.session.account_mut() {
            account.credits = balance;
        }
        Ok(balance)
    }

    /// Buy a credit pack: grants the credits, records the purchase, and
    /// updates the cached balance.
    ///
    /// # Errors
    ///
    /// [`PlanError::SignedOut`] without an account, [`PlanError::Backend`]
    /// on a backend failure.
    pub async fn purchase_credits(&mut self, amount: u32) -> Result<u32, PlanError>
    where
        B::Error: Into<anyhow::Error>,
    {
        let Some(account) = self.session.account() else {
            return Err(PlanError::SignedOut);
        };
        let user_id = account.user_id.clone();
        let balance = self
            .remote
            .credit_credits(&user_id, amount, TransactionKind::Purchase, None)
            .await
            .map_err(|e| PlanError::Backend(e.into()))?;
        if let Some(account) = self.session.account_mut() {
            account.credits = balance;
        }
        Ok(balance)
    }

    /// Activity suggestions for one day of the active trip. An empty
    /// session or out-of-range day completes to nothing.
    ///
    /// # Errors
    ///
    /// [`PlanError::GenerationFailed`] if the source call fails.
    pub async fn suggest_activities(
        &self,
        day_index: usize,
    ) -> Result<Vec<SuggestedActivity>, PlanError>
    where
        A::Error: Into<anyhow::Error>,
    {
        let Some(planned) = self.session.itinerary() else {
            return Ok(Vec::new());
        };
        let Some(day) = planned.days.get(day_index) else {
            return Ok(Vec::new());
        };
        self.source
            .suggest_activities(&planned.destination, &day.theme, self.language)
            .await
            .map_err(|e| PlanError::GenerationFailed(e.into()))
    }

    /// Packing suggestions for the active trip, keyed off its weather and
    /// every planned activity name.
    ///
    /// # Errors
    ///
    /// [`PlanError::GenerationFailed`] if the source call fails.
    pub async fn suggest_packing(&self) -> Result<Vec<SuggestedPackingItem>, PlanError>
    where
        A::Error: Into<anyhow::Error>,
    {
        let Some(planned) = self.session.itinerary() else {
            return Ok(Vec::new());
        };
        let names: Vec<String> = planned
            .days
            .iter()
            .flat_map(|d| d.activities.iter().map(|a| a.name.clone()))
            .collect();
        self.source
            .suggest_packing(
                &planned.destination,
                &planned.weather_forecast,
                &names,
                self.language,
            )
            .await
            .map_err(|e| PlanError::GenerationFailed(e.into()))
    }

    /// Place-name completions. Queries shorter than
    /// [`PLACE_QUERY_MIN_CHARS`] complete to nothing without consulting the
    /// source.
    ///
    /// # Errors
    ///
    /// [`PlanError::GenerationFailed`] if the source call fails.
    pub async fn suggest_places(
        &self,
        query: &str,
        context: &str,
        kind: PlaceKind,
    ) -> Result<Vec<String>, PlanError>
    where
        A::Error: Into<anyhow::Error>,
    {
        if query.trim().chars().count() < PLACE_QUERY_MIN_CHARS {
            return Ok(Vec::new());
        }
        self.source
            .suggest_places(query, context, self.language, kind)
            .await
            .map_err(|e| PlanError::GenerationFailed(e.into()))
    }

    fn mirror_result(&self) {
        if let Some(planned) = self.session.itinerary() {
            self.vault.save_result(planned);
        } else {
            self.vault.clear_result();
        }
    }
}

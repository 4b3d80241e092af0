//! Per-user planning session.
//!
//! Owns the preference draft, the active itinerary, the signed-in account,
//! and the small set of interaction flags the result screens key off. One
//! session per user context; nothing here is global.

use std::collections::HashSet;

use crate::ident::IdSource;
use crate::trip::{Itinerary, TravelPreferences};

pub const SURPRISE_DESTINATIONS: [&str; 6] = [
    "Kyoto, Japan",
    "Reykjavik, Iceland",
    "Marrakech, Morocco",
    "Buenos Aires, Argentina",
    "Cape Town, South Africa",
    "Lisbon, Portugal",
];

pub const SURPRISE_ORIGINS: [&str; 5] = [
    "Jakarta, Indonesia",
    "Singapore",
    "Kuala Lumpur",
    "Sydney, Australia",
    "London, UK",
];

/// Which result tab is in front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultTab {
    Itinerary,
    Essentials,
    #[default]
    Config,
}

impl ResultTab {
    /// Tab to show when a session starts: the itinerary if one was
    /// restored, otherwise the trip configuration form.
    #[must_use]
    pub const fn initial(has_result: bool) -> Self {
        if has_result { Self::Itinerary } else { Self::Config }
    }
}

/// Where the post-trip feedback prompt is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedbackState {
    #[default]
    Idle,
    Positive,
    NegativeInput,
    Submitted,
}

/// The signed-in account as the session sees it. The credit balance here is
/// a cached copy; the backend owns the authoritative one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub credits: u32,
}

/// Session state for one user.
pub struct TripSession {
    prefs: TravelPreferences,
    active: Option<Itinerary>,
    account: Option<Account>,
    active_tab: ResultTab,
    feedback: FeedbackState,
    edit_mode: bool,
    packing_edit_mode: bool,
    packed: HashSet<(usize, usize)>,
    generation: u64,
    ids: IdSource,
}

impl TripSession {
    #[must_use]
    pub fn new(ids: IdSource) -> Self {
        Self {
            prefs: TravelPreferences::default(),
            active: None,
            account: None,
            active_tab: ResultTab::default(),
            feedback: FeedbackState::default(),
            edit_mode: false,
            packing_edit_mode: false,
            packed: HashSet::new(),
            generation: 0,
            ids,
        }
    }

    #[must_use]
    pub const fn prefs(&self) -> &TravelPreferences {
        &self.prefs
    }

    pub const fn prefs_mut(&mut self) -> &mut TravelPreferences {
        &mut self.prefs
    }

    pub fn set_prefs(&mut self, prefs: TravelPreferences) {
        self.prefs = prefs;
    }

    /// Toggle one interest in the draft, preserving the order of the rest.
    pub fn toggle_interest(&mut self, interest: &str) {
        if self.prefs.interests.iter().any(|i| i == interest) {
            self.prefs.interests.retain(|i| i != interest);
        } else {
            self.prefs.interests.push(interest.to_string());
        }
    }

    /// Fill destination and origin with a random pick from the curated
    /// lists, leaving the rest of the draft alone.
    pub fn surprise_me(&mut self) {
        let dest = self.ids.pick_index(SURPRISE_DESTINATIONS.len());
        let origin = self.ids.pick_index(SURPRISE_ORIGINS.len());
        self.prefs.destination = SURPRISE_DESTINATIONS[dest].to_string();
        self.prefs.origin = SURPRISE_ORIGINS[origin].to_string();
    }

    #[must_use]
    pub const fn itinerary(&self) -> Option<&Itinerary> {
        self.active.as_ref()
    }

    pub const fn itinerary_mut(&mut self) -> Option<&mut Itinerary> {
        self.active.as_mut()
    }

    pub fn set_itinerary(&mut self, itinerary: Option<Itinerary>) {
        self.active = itinerary;
    }

    /// Run a closure over the active itinerary together with the identity
    /// source. Returns `None` without calling the closure when no itinerary
    /// is active.
    pub fn with_trip_and_ids<R>(
        &mut self,
        f: impl FnOnce(&mut Itinerary, &mut IdSource) -> R,
    ) -> Option<R> {
        let Self { active, ids, .. } = self;
        active.as_mut().map(|trip| f(trip, ids))
    }

    #[must_use]
    pub const fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub const fn account_mut(&mut self) -> Option<&mut Account> {
        self.account.as_mut()
    }

    pub fn sign_in(&mut self, account: Account) {
        self.account = Some(account);
    }

    pub fn sign_out(&mut self) {
        self.account = None;
    }

    /// Cached credit balance; zero when signed out.
    #[must_use]
    pub fn balance(&self) -> u32 {
        self.account.as_ref().map_or(0, |a| a.credits)
    }

    #[must_use]
    pub const fn active_tab(&self) -> ResultTab {
        self.active_tab
    }

    pub const fn set_active_tab(&mut self, tab: ResultTab) {
        self.active_tab = tab;
    }

    #[must_use]
    pub const fn feedback(&self) -> FeedbackState {
        self.feedback
    }

    pub const fn set_feedback(&mut self, state: FeedbackState) {
        self.feedback = state;
    }

    #[must_use]
    pub const fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub const fn toggle_edit_mode(&mut self) {
        self.edit_mode = !self.edit_mode;
    }

    #[must_use]
    pub const fn packing_edit_mode(&self) -> bool {
        self.packing_edit_mode
    }

    pub const fn toggle_packing_edit_mode(&mut self) {
        self.packing_edit_mode = !self.packing_edit_mode;
    }

    /// Whether the packing checklist entry at the position is ticked.
    #[must_use]
    pub fn is_packed(&self, category_index: usize, item_index: usize) -> bool {
        self.packed.contains(&(category_index, item_index))
    }

    pub fn toggle_packed(&mut self, category_index: usize, item_index: usize) {
        let key = (category_index, item_index);
        if !self.packed.insert(key) {
            self.packed.remove(&key);
        }
    }

    /// Current generation token. A response whose token no longer matches
    /// arrived after a newer request started and must be discarded.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new generation: clears the active itinerary and every
    /// per-trip flag, bumps the token, and returns it. The tab is left
    /// alone until a result actually arrives.
    pub fn begin_generation(&mut self) -> u64 {
        self.active = None;
        self.feedback = FeedbackState::Idle;
        self.edit_mode = false;
        self.packing_edit_mode = false;
        self.packed.clear();
        self.generation += 1;
        self.generation
    }

    pub const fn ids_mut(&mut self) -> &mut IdSource {
        &mut self.ids
    }
}

impl Default for TripSession {
    fn default() -> Self {
        Self::new(IdSource::from_entropy())
    }
}

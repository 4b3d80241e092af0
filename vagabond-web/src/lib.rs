#![forbid(unsafe_code)]

//! Vagabond web adapter
//!
//! Browser-side implementations of the trip planner's platform traits,
//! plus a constructor wiring them into the engine.

pub mod storage;

pub use storage::{WebDraftStore, WebStorageError};

use vagabond_trip::{ItinerarySource, PlannerEngine, TripBackend};

/// Create a planner engine that persists drafts to browser `localStorage`.
#[must_use]
pub fn create_web_planner<A, B>(source: A, backend: B) -> PlannerEngine<A, WebDraftStore, B>
where
    A: ItinerarySource,
    B: TripBackend,
{
    PlannerEngine::new(source, WebDraftStore, backend)
}

//! Structural edit operations over the active itinerary.
//!
//! Every operation either completes fully or returns an error with the plan
//! untouched; validation happens before the first mutation. Operations the
//! caller may legitimately repeat (deleting an already-deleted activity,
//! merging a suggestion twice) are no-ops rather than errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generate::SuggestedPackingItem;
use crate::ident::{EntityId, IdSource};
use crate::trip::{Activity, Itinerary, PackingCategory, PackingItem};

pub const FALLBACK_TIME: &str = "TBD";
pub const FALLBACK_NAME: &str = "New Activity";
pub const FALLBACK_LOCATION: &str = "TBD";
pub const FALLBACK_COST: &str = "TBD";
pub const NEUTRAL_EMOJI: &str = "✨";
pub const USER_ADDED_REASON: &str = "User added";

/// Local, recoverable failures of the edit operations. None of these are
/// fatal to the session; the plan is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no activity {id} in day at index {day_index}")]
    NotFound { day_index: usize, id: EntityId },
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("{reason}")]
    InvalidOperand { reason: &'static str },
}

/// Selects which activity field an in-place edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityField {
    Time,
    Name,
    Location,
    Description,
    Emoji,
    Cost,
}

impl ActivityField {
    fn apply(self, activity: &mut Activity, value: String) {
        match self {
            Self::Time => activity.time = value,
            Self::Name => activity.name = value,
            Self::Location => activity.location = value,
            Self::Description => activity.description = value,
            Self::Emoji => activity.emoji = value,
            Self::Cost => activity.cost = value,
        }
    }
}

/// Field values for a user-added activity. Empty fields get the documented
/// fallbacks when the activity is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityDraft {
    pub time: String,
    #[serde(rename = "activity")]
    pub name: String,
    pub location: String,
    pub description: String,
    pub emoji: String,
    pub cost: String,
}

fn or_fallback(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

impl Itinerary {
    /// Reorder whole days into the order given by `new_order`, then re-derive
    /// the 1-based day numbers.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidOperand`] unless `new_order` is exactly a
    /// permutation of the current day identities.
    pub fn reorder_days(&mut self, new_order: &[EntityId]) -> Result<(), EditError> {
        let positions = self.permutation_positions(new_order)?;
        let old = std::mem::take(&mut self.days);
        self.days = positions.into_iter().map(|i| old[i].clone()).collect();
        for (i, day) in self.days.iter_mut().enumerate() {
            day.day = i as u32 + 1;
        }
        Ok(())
    }

    fn permutation_positions(&self, new_order: &[EntityId]) -> Result<Vec<usize>, EditError> {
        if new_order.len() != self.days.len() {
            return Err(EditError::InvalidOperand {
                reason: "day order must list every existing day exactly once",
            });
        }
        let mut taken = vec![false; self.days.len()];
        let mut positions = Vec::with_capacity(new_order.len());
        for id in new_order {
            let pos = self.day_position(id).ok_or(EditError::InvalidOperand {
                reason: "day order names an unknown day",
            })?;
            if taken[pos] {
                return Err(EditError::InvalidOperand {
                    reason: "day order repeats a day",
                });
            }
            taken[pos] = true;
            positions.push(pos);
        }
        Ok(positions)
    }

    /// Reorder the activities of one day. Identities are untouched; only the
    /// sequence changes.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `day_index`;
    /// [`EditError::InvalidOperand`] unless `new_order` is a permutation of
    /// that day's activity identities.
    pub fn reorder_activities(
        &mut self,
        day_index: usize,
        new_order: &[EntityId],
    ) -> Result<(), EditError> {
        let day_count = self.days.len();
        let day = self
            .days
            .get(day_index)
            .ok_or(EditError::IndexOutOfRange {
                index: day_index,
                len: day_count,
            })?;
        if new_order.len() != day.activities.len() {
            return Err(EditError::InvalidOperand {
                reason: "activity order must list every activity exactly once",
            });
        }
        let mut taken = vec![false; day.activities.len()];
        let mut positions = Vec::with_capacity(new_order.len());
        for id in new_order {
            let pos = day.activity_position(id).ok_or(EditError::InvalidOperand {
                reason: "activity order names an unknown activity",
            })?;
            if taken[pos] {
                return Err(EditError::InvalidOperand {
                    reason: "activity order repeats an activity",
                });
            }
            taken[pos] = true;
            positions.push(pos);
        }
        let day = &mut self.days[day_index];
        let old = std::mem::take(&mut day.activities);
        day.activities = positions.into_iter().map(|i| old[i].clone()).collect();
        Ok(())
    }

    /// Move one activity to the end of the day whose display number is
    /// `to_day_number`. Moving to the activity's current day is a no-op.
    /// The activity keeps its identity and every field; it is appended, not
    /// re-sorted by time.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `from_day_index`;
    /// [`EditError::InvalidOperand`] if no day carries `to_day_number`;
    /// [`EditError::NotFound`] if the activity is not in the source day.
    pub fn move_activity(
        &mut self,
        from_day_index: usize,
        activity_id: &EntityId,
        to_day_number: u32,
    ) -> Result<(), EditError> {
        let day_count = self.days.len();
        if from_day_index >= day_count {
            return Err(EditError::IndexOutOfRange {
                index: from_day_index,
                len: day_count,
            });
        }
        let target_index = self
            .days
            .iter()
            .position(|d| d.day == to_day_number)
            .ok_or(EditError::InvalidOperand {
                reason: "no day carries the requested day number",
            })?;
        if target_index == from_day_index {
            return Ok(());
        }
        let source = &mut self.days[from_day_index];
        let pos = source
            .activity_position(activity_id)
            .ok_or_else(|| EditError::NotFound {
                day_index: from_day_index,
                id: activity_id.clone(),
            })?;
        let activity = source.activities.remove(pos);
        self.days[target_index].activities.push(activity);
        Ok(())
    }

    /// In-place single-field edit of one activity. No validation beyond
    /// presence; time, cost, and location stay free text.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `day_index`;
    /// [`EditError::NotFound`] if the activity is not in that day.
    pub fn update_activity_field(
        &mut self,
        day_index: usize,
        activity_id: &EntityId,
        field: ActivityField,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let day_count = self.days.len();
        let day = self
            .days
            .get_mut(day_index)
            .ok_or(EditError::IndexOutOfRange {
                index: day_index,
                len: day_count,
            })?;
        let pos = day
            .activity_position(activity_id)
            .ok_or_else(|| EditError::NotFound {
                day_index,
                id: activity_id.clone(),
            })?;
        field.apply(&mut day.activities[pos], value.into());
        Ok(())
    }

    /// Replace one day's theme text.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `day_index`.
    pub fn update_day_theme(
        &mut self,
        day_index: usize,
        theme: impl Into<String>,
    ) -> Result<(), EditError> {
        let day_count = self.days.len();
        let day = self
            .days
            .get_mut(day_index)
            .ok_or(EditError::IndexOutOfRange {
                index: day_index,
                len: day_count,
            })?;
        day.theme = theme.into();
        Ok(())
    }

    /// Append a user-drafted activity to one day, assigning a fresh identity
    /// and filling empty fields with the documented fallbacks. Returns the
    /// new activity's identity.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `day_index`.
    pub fn add_activity(
        &mut self,
        day_index: usize,
        draft: ActivityDraft,
        ids: &mut IdSource,
    ) -> Result<EntityId, EditError> {
        let day_count = self.days.len();
        let day = self
            .days
            .get_mut(day_index)
            .ok_or(EditError::IndexOutOfRange {
                index: day_index,
                len: day_count,
            })?;
        let id = ids.next_id();
        day.activities.push(Activity {
            id: id.clone(),
            time: or_fallback(draft.time, FALLBACK_TIME),
            name: or_fallback(draft.name, FALLBACK_NAME),
            location: or_fallback(draft.location, FALLBACK_LOCATION),
            description: draft.description,
            emoji: or_fallback(draft.emoji, NEUTRAL_EMOJI),
            cost: or_fallback(draft.cost, FALLBACK_COST),
        });
        Ok(id)
    }

    /// Delete one activity by identity. Deleting an id that is already gone
    /// is a no-op, so a double-delete never errors.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `day_index`.
    pub fn delete_activity(
        &mut self,
        day_index: usize,
        activity_id: &EntityId,
    ) -> Result<(), EditError> {
        let day_count = self.days.len();
        let day = self
            .days
            .get_mut(day_index)
            .ok_or(EditError::IndexOutOfRange {
                index: day_index,
                len: day_count,
            })?;
        day.activities.retain(|a| a.id != *activity_id);
        Ok(())
    }

    /// Append an empty packing category. Blank or whitespace-only names are
    /// silently ignored.
    pub fn add_packing_category(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name.trim().is_empty() {
            return;
        }
        self.packing_list.push(PackingCategory {
            category: name,
            items: Vec::new(),
        });
    }

    /// Remove a packing category and everything in it.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `category_index`.
    pub fn delete_packing_category(&mut self, category_index: usize) -> Result<(), EditError> {
        if category_index >= self.packing_list.len() {
            return Err(EditError::IndexOutOfRange {
                index: category_index,
                len: self.packing_list.len(),
            });
        }
        self.packing_list.remove(category_index);
        Ok(())
    }

    /// Append a user-added item to a packing category. Blank names are
    /// silently ignored.
    ///
    /// # Errors
    ///
    /// [`EditError::IndexOutOfRange`] for a bad `category_index`.
    pub fn add_packing_item(
        &mut self,
        category_index: usize,
        name: impl Into<String>,
    ) -> Result<(), EditError> {
        let len = self.packing_list.len();
        let category =
            self.packing_list
                .get_mut(category_index)
                .ok_or(EditError::IndexOutOfRange {
                    index: category_index,
                    len,
                })?;
        let name = name.into();
        if name.trim().is_empty() {
            return Ok(());
        }
        category.items.push(PackingItem {
            name,
            reason: USER_ADDED_REASON.to_string(),
        });
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
        let len = self.packing_list.len();
        let category =
            self.packing_list
                .get_mut(category_index)
                .ok_or(EditError::IndexOutOfRange {
                    index: category_index,
                    len,
                })?;
        if item_index >= category.items.len() {
            return Err(EditError::IndexOutOfRange {
                index: item_index,
                len: category.items.len(),
            });
        }
        category.items.remove(item_index);
        Ok(())
    }

    /// Merge one AI packing suggestion into the list. The category is matched
    /// case-insensitively and created (with the suggested label) when absent;
    /// an item whose name already exists in that category, compared
    /// case-insensitively, makes the merge a no-op. Accepting the same
    /// suggestion twice therefore adds exactly one item.
    pub fn merge_suggested_packing_item(&mut self, suggestion: &SuggestedPackingItem) {
        let category_index = self
            .packing_list
            .iter()
            .position(|c| c.category.eq_ignore_ascii_case(&suggestion.category));
        let category_index = match category_index {
            Some(i) => i,
            None => {
                self.packing_list.push(PackingCategory {
                    category: suggestion.category.clone(),
                    items: Vec::new(),
                });
                self.packing_list.len() - 1
            }
        };
        let category = &mut self.packing_list[category_index];
        let exists = category
            .items
            .iter()
            .any(|item| item.name.eq_ignore_ascii_case(&suggestion.name));
        if !exists {
            category.items.push(PackingItem {
                name: suggestion.name.clone(),
                reason: suggestion.reason.clone(),
            });
        }
    }
}

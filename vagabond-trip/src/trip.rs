use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ident::EntityId;

pub const DEFAULT_TRIP_DAYS: u32 = 3;
pub const DEFAULT_TRANSPORT_MODE: &str = "Public Transport";
pub const DEFAULT_TRAVEL_STYLE: &str = "Relaxed";

/// Spending tier requested for a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BudgetTier {
    Budget,
    #[default]
    Moderate,
    Luxury,
}

impl BudgetTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::Moderate => "Moderate",
            Self::Luxury => "Luxury",
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetTier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Budget" => Ok(Self::Budget),
            "Moderate" => Ok(Self::Moderate),
            "Luxury" => Ok(Self::Luxury),
            _ => Err(()),
        }
    }
}

/// The generation request. Immutable once submitted; a new generation takes a
/// fresh snapshot. Also serves as the cold-start draft shape, so `Default`
/// doubles as the documented draft defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPreferences {
    pub origin: String,
    pub destination: String,
    pub days: u32,
    pub budget: BudgetTier,
    pub interests: Vec<String>,
    pub travelers: u32,
    pub transport_mode: String,
    pub travel_style: String,
}

impl Default for TravelPreferences {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            days: DEFAULT_TRIP_DAYS,
            budget: BudgetTier::Moderate,
            interests: Vec::new(),
            travelers: 1,
            transport_mode: DEFAULT_TRANSPORT_MODE.to_string(),
            travel_style: DEFAULT_TRAVEL_STYLE.to_string(),
        }
    }
}

/// One scheduled item within a day.
///
/// All fields besides the identity are free text; time and cost tolerate
/// anything the generator or the user typed ("7:30 AM", "Rp 50.000 - Rp
/// 100.000", "Free"). Validation is a presentation concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: EntityId,
    pub time: String,
    #[serde(rename = "activity")]
    pub name: String,
    pub location: String,
    pub description: String,
    pub emoji: String,
    pub cost: String,
}

/// One day within an itinerary.
///
/// `day` is the 1-based display number and always equals index + 1 in the
/// parent sequence; it is re-derived after every day reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub id: EntityId,
    pub day: u32,
    pub theme: String,
    pub activities: Vec<Activity>,
}

impl DayPlan {
    /// Position of an activity by identity, if present.
    #[must_use]
    pub fn activity_position(&self, id: &EntityId) -> Option<usize> {
        self.activities.iter().position(|a| a.id == *id)
    }
}

/// Trip-level cost estimate as produced by generation.
///
/// Free-text magnitudes; deliberately not reconciled with per-activity cost
/// fields (see crate docs).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub total: String,
    pub accommodation: String,
    pub food: String,
    pub activities: String,
    pub transport: String,
    pub flights: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingItem {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingCategory {
    pub category: String,
    pub items: Vec<PackingItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPhrase {
    pub original: String,
    pub translation: String,
    pub pronunciation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AdvisorySeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdvisorySeverity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for AdvisorySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelAdvisory {
    pub severity: AdvisorySeverity,
    pub title: String,
    pub description: String,
}

/// The canonical trip plan. Exactly one itinerary is active in a session at
/// a time; regeneration replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub title: String,
    pub destination: String,
    pub total_days: u32,
    pub budget_level: String,
    pub estimated_cost: CostBreakdown,
    pub summary: String,
    pub weather_forecast: String,
    pub packing_list: Vec<PackingCategory>,
    pub local_phrases: Vec<LocalPhrase>,
    pub playlist_vibe: String,
    pub days: Vec<DayPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_prefs: Option<TravelPreferences>,
    #[serde(default)]
    pub travel_advisories: Vec<TravelAdvisory>,
}

impl Itinerary {
    /// Day at a 1-based display number, if any.
    #[must_use]
    pub fn day_by_number(&self, number: u32) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.day == number)
    }

    /// Position of a day by identity, if present.
    #[must_use]
    pub fn day_position(&self, id: &EntityId) -> Option<usize> {
        self.days.iter().position(|d| d.id == *id)
    }

    /// Look up an activity anywhere in the plan.
    #[must_use]
    pub fn find_activity(&self, id: &EntityId) -> Option<(&DayPlan, &Activity)> {
        self.days.iter().find_map(|day| {
            day.activities
                .iter()
                .find(|a| a.id == *id)
                .map(|a| (day, a))
        })
    }
}

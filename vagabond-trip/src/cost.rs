//! Heuristic numeric magnitudes for free-text cost fields.
//!
//! Cost strings arrive in whatever shape the generator or the user produced:
//! "Rp 100.000", "Rp 50.000 - Rp 100.000", "Free", "TBD". The magnitudes
//! here exist to rank and scale budget categories for visualization and are
//! never used for financial arithmetic.

use std::fmt;

use crate::trip::CostBreakdown;

/// Lossy numeric magnitude of a cost string.
///
/// Strips every non-digit character except a range-separating hyphen. A
/// range is split at the first hyphen and averaged, with a missing side
/// counting as zero; anything without digits is zero. Always finite and
/// non-negative, for any input including the empty string.
#[must_use]
pub fn magnitude(cost_text: &str) -> f64 {
    match cost_text.split_once('-') {
        Some((low, high)) => (digit_run_value(low) + digit_run_value(high)) / 2.0,
        None => digit_run_value(cost_text),
    }
}

fn digit_run_value(part: &str) -> f64 {
    let digits: String = part.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0.0;
    }
    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// The five budget chart categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostKind {
    Flights,
    Accommodation,
    Food,
    Activities,
    Transport,
}

impl CostKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flights => "Flights",
            Self::Accommodation => "Accommodation",
            Self::Food => "Food",
            Self::Activities => "Activities",
            Self::Transport => "Transport",
        }
    }
}

impl fmt::Display for CostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the budget chart: raw text plus its comparable magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSlice {
    pub kind: CostKind,
    pub amount: String,
    pub magnitude: f64,
}

/// Chart rows for a cost breakdown, in fixed display order.
#[must_use]
pub fn budget_slices(costs: &CostBreakdown) -> Vec<BudgetSlice> {
    let rows = [
        (CostKind::Flights, &costs.flights),
        (CostKind::Accommodation, &costs.accommodation),
        (CostKind::Food, &costs.food),
        (CostKind::Activities, &costs.activities),
        (CostKind::Transport, &costs.transport),
    ];
    rows.into_iter()
        .map(|(kind, amount)| BudgetSlice {
            kind,
            amount: amount.clone(),
            magnitude: magnitude(amount),
        })
        .collect()
}

/// Largest slice magnitude, clamped to at least 1.0 so bar-scale division is
/// always defined.
#[must_use]
pub fn chart_ceiling(slices: &[BudgetSlice]) -> f64 {
    slices
        .iter()
        .map(|s| s.magnitude)
        .fold(1.0_f64, f64::max)
}

/// Rupiah-style display formatting with dot-separated thousands.
#[must_use]
pub fn format_idr(amount: f64) -> String {
    let value = amount.max(0.0).round() as u64;
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("Rp {grouped}")
}

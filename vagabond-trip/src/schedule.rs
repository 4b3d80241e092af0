//! Time-slot and emoji vocabulary for activity editing.

use std::fmt;

/// Emoji picker vocabulary for activity editing.
pub const COMMON_EMOJIS: [&str; 20] = [
    "✈️", "🏨", "🍽️", "📸", "🏛️", "🏞️", "🛍️", "🚌", "🚕", "🚶", "🎫", "🎨", "🍷", "☕", "🏖️",
    "🏔️", "🎡", "🏰", "🚢", "🎒",
];

/// The 48 half-hour slots offered when editing an activity time, in 12-hour
/// clock form from "12:00 AM" through "11:30 PM".
#[must_use]
pub fn time_slots() -> Vec<String> {
    (0..48)
        .map(|i| {
            let hour = i / 2;
            let minute = if i % 2 == 0 { "00" } else { "30" };
            let ampm = if hour < 12 { "AM" } else { "PM" };
            let display_hour = match hour {
                0 => 12,
                h if h > 12 => h - 12,
                h => h,
            };
            format!("{display_hour}:{minute} {ampm}")
        })
        .collect()
}

/// Coarse grouping of an activity time for timeline display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorize a free-text activity time.
///
/// Accepts "H:MM AM/PM" and bare 24-hour text. An empty time counts as
/// Morning; text with no parseable hour lands in Night, matching how the
/// app has always bucketed odd entries like "All day".
#[must_use]
pub fn time_of_day(time: &str) -> TimeOfDay {
    if time.is_empty() {
        return TimeOfDay::Morning;
    }
    let Some(hour) = parse_hour_24(time) else {
        return TimeOfDay::Night;
    };
    match hour {
        5..=11 => TimeOfDay::Morning,
        12..=16 => TimeOfDay::Afternoon,
        17..=20 => TimeOfDay::Evening,
        _ => TimeOfDay::Night,
    }
}

fn parse_hour_24(time: &str) -> Option<u32> {
    let mut parts = time.split_whitespace();
    let clock = parts.next()?;
    let period = parts.next();
    let hour: u32 = clock.split(':').next()?.parse().ok()?;
    Some(match period {
        Some("PM") if hour != 12 => hour + 12,
        Some("AM") if hour == 12 => 0,
        _ => hour,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_eight_half_hour_slots() {
        let slots = time_slots();
        assert_eq!(slots.len(), 48);
        assert_eq!(slots[0], "12:00 AM");
        assert_eq!(slots[1], "12:30 AM");
        assert_eq!(slots[2], "1:00 AM");
        assert_eq!(slots[24], "12:00 PM");
        assert_eq!(slots[47], "11:30 PM");
    }

    #[test]
    fn buckets_follow_day_boundaries() {
        assert_eq!(time_of_day("5:00 AM"), TimeOfDay::Morning);
        assert_eq!(time_of_day("9:00 AM"), TimeOfDay::Morning);
        assert_eq!(time_of_day("12:00 PM"), TimeOfDay::Afternoon);
        assert_eq!(time_of_day("4:30 PM"), TimeOfDay::Afternoon);
        assert_eq!(time_of_day("5:00 PM"), TimeOfDay::Evening);
        assert_eq!(time_of_day("8:30 PM"), TimeOfDay::Evening);
        assert_eq!(time_of_day("9:00 PM"), TimeOfDay::Night);
        assert_eq!(time_of_day("12:30 AM"), TimeOfDay::Night);
        assert_eq!(time_of_day("4:00 AM"), TimeOfDay::Night);
    }

    #[test]
    fn bare_24_hour_text_still_buckets() {
        assert_eq!(time_of_day("14:00"), TimeOfDay::Afternoon);
        assert_eq!(time_of_day("23:15"), TimeOfDay::Night);
    }

    #[test]
    fn empty_is_morning_and_garbage_is_night() {
        assert_eq!(time_of_day(""), TimeOfDay::Morning);
        assert_eq!(time_of_day("All day"), TimeOfDay::Night);
        assert_eq!(time_of_day("whenever"), TimeOfDay::Night);
    }
}

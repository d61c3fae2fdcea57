//! Calendar data types shared across the workspace

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a calendar entry as reported by the remote service.
///
/// The serde names match the wire strings; [`EntryCategory::label`] returns
/// the same string for display and [`EntryCategory::code`] the service's
/// numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryCategory {
    Absent,
    #[serde(rename = "WfH")]
    WorkFromHome,
    #[serde(rename = "RT_Rotation")]
    RtRotation,
    #[serde(rename = "Support_Rotation")]
    SupportRotation,
    Other,
    #[serde(rename = "Public_Holiday")]
    PublicHoliday,
    Weekend,
    Release,
    Seal,
}

impl EntryCategory {
    /// Wire/display label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "Absent",
            Self::WorkFromHome => "WfH",
            Self::RtRotation => "RT_Rotation",
            Self::SupportRotation => "Support_Rotation",
            Self::Other => "Other",
            Self::PublicHoliday => "Public_Holiday",
            Self::Weekend => "Weekend",
            Self::Release => "Release",
            Self::Seal => "Seal",
        }
    }

    /// Numeric code of this category in the service's data dictionary.
    pub fn code(&self) -> i8 {
        match self {
            Self::Absent => 0,
            Self::WorkFromHome => 1,
            Self::RtRotation => 2,
            Self::SupportRotation => 3,
            Self::Other => 4,
            Self::PublicHoliday => 5,
            Self::Weekend => 6,
            Self::Release => 7,
            Self::Seal => 8,
        }
    }
}

/// One scheduled absence/status interval for a person.
///
/// Entries are immutable value objects; every fetch produces a fresh set and
/// no entry is ever mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: String,
    /// Person the entry belongs to; used as the filter key.
    pub name: String,
    pub category: EntryCategory,
    /// Inclusive start of the active interval. Invariant: `event_start <= event_end`.
    pub event_start: DateTime<Utc>,
    /// Inclusive end of the active interval.
    pub event_end: DateTime<Utc>,
    pub description: String,
    /// Interval before any rescheduling; retained for display only.
    pub original_event_start: DateTime<Utc>,
    pub original_event_end: DateTime<Utc>,
}

impl CalendarEntry {
    /// Whether `now` falls inside the inclusive `[event_start, event_end]`
    /// interval.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.event_start <= now && now <= self.event_end
    }
}

/// Cached result of the most recent successful poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarSnapshot {
    /// Identity label of the polled account.
    pub label: String,
    /// Entries in the order returned by the service.
    pub entries: Vec<CalendarEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(start: &str, end: &str) -> CalendarEntry {
        let event_start = start.parse().expect("valid start timestamp");
        let event_end = end.parse().expect("valid end timestamp");
        CalendarEntry {
            id: "1".to_string(),
            name: "Alice Example".to_string(),
            category: EntryCategory::Absent,
            event_start,
            event_end,
            description: String::new(),
            original_event_start: event_start,
            original_event_end: event_end,
        }
    }

    #[test]
    fn category_wire_names_match_labels() {
        let categories = [
            EntryCategory::Absent,
            EntryCategory::WorkFromHome,
            EntryCategory::RtRotation,
            EntryCategory::SupportRotation,
            EntryCategory::Other,
            EntryCategory::PublicHoliday,
            EntryCategory::Weekend,
            EntryCategory::Release,
            EntryCategory::Seal,
        ];

        for category in categories {
            let wire = serde_json::to_string(&category).expect("category serializes");
            assert_eq!(wire, format!("\"{}\"", category.label()));
        }
    }

    #[test]
    fn category_codes_are_stable() {
        assert_eq!(EntryCategory::Absent.code(), 0);
        assert_eq!(EntryCategory::WorkFromHome.code(), 1);
        assert_eq!(EntryCategory::PublicHoliday.code(), 5);
        assert_eq!(EntryCategory::Seal.code(), 8);
    }

    #[test]
    fn unknown_category_string_is_rejected() {
        let result: Result<EntryCategory, _> = serde_json::from_str("\"Sabbatical\"");
        assert!(result.is_err());
    }

    #[test]
    fn interval_containment_is_inclusive_on_both_ends() {
        let entry = entry_at("2024-01-01T00:00:00Z", "2024-01-03T23:59:59Z");

        assert!(entry.contains("2024-01-01T00:00:00Z".parse().expect("timestamp")));
        assert!(entry.contains("2024-01-02T12:00:00Z".parse().expect("timestamp")));
        assert!(entry.contains("2024-01-03T23:59:59Z".parse().expect("timestamp")));
        assert!(!entry.contains("2023-12-31T23:59:59Z".parse().expect("timestamp")));
        assert!(!entry.contains("2024-01-04T00:00:00Z".parse().expect("timestamp")));
    }

    #[test]
    fn zero_length_interval_contains_its_instant() {
        let entry = entry_at("2024-01-01T08:00:00Z", "2024-01-01T08:00:00Z");
        assert!(entry.contains("2024-01-01T08:00:00Z".parse().expect("timestamp")));
    }
}

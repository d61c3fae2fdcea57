//! Day classification rules
//!
//! Pure functions deriving a workday signal from a list of interval-based
//! calendar entries and a point in time. Classification never fails: missing
//! data (no entries, no snapshot yet) yields the workday default.

use chrono::{DateTime, Utc};
use offday_domain::{CalendarEntry, EntryCategory};

/// Categories that turn a day into a non-workday for the boolean signal.
///
/// Working from home still counts as a working day here; it only surfaces in
/// the categorical signal.
pub const WORKDAY_STATUSES: [EntryCategory; 3] =
    [EntryCategory::Absent, EntryCategory::PublicHoliday, EntryCategory::Weekend];

/// Categories surfaced by the categorical day-type signal.
pub const DAY_TYPE_STATUSES: [EntryCategory; 4] = [
    EntryCategory::Absent,
    EntryCategory::WorkFromHome,
    EntryCategory::PublicHoliday,
    EntryCategory::Weekend,
];

/// Classification result for a single point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayType {
    /// No status-determining entry is active.
    Workday,
    /// The active entry's category.
    Status(EntryCategory),
}

impl DayType {
    /// Display label: the category's wire label, or `"Workday"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Workday => "Workday",
            Self::Status(category) => category.label(),
        }
    }

    /// Numeric state for host attributes: -1 for a workday, otherwise the
    /// category code.
    pub fn code(&self) -> i8 {
        match self {
            Self::Workday => -1,
            Self::Status(category) => category.code(),
        }
    }
}

/// First entry whose inclusive interval contains `now` and whose category is
/// in `statuses`.
///
/// Input order decides ties; callers supply entries in the order returned by
/// the service.
pub fn active_status_entry<'a>(
    entries: &'a [CalendarEntry],
    now: DateTime<Utc>,
    statuses: &[EntryCategory],
) -> Option<&'a CalendarEntry> {
    entries.iter().find(|entry| entry.contains(now) && statuses.contains(&entry.category))
}

/// Classify `now` against the given status-determining set.
pub fn classify(
    entries: &[CalendarEntry],
    now: DateTime<Utc>,
    statuses: &[EntryCategory],
) -> DayType {
    match active_status_entry(entries, now, statuses) {
        Some(entry) => DayType::Status(entry.category),
        None => DayType::Workday,
    }
}

/// Whether `now` is a working day for the boolean signal.
pub fn is_workday(entries: &[CalendarEntry], now: DateTime<Utc>) -> bool {
    active_status_entry(entries, now, &WORKDAY_STATUSES).is_none()
}

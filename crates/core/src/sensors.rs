//! Sensor consumers read by the host platform
//!
//! Thin read-side views over the coordinator: a boolean workday signal and a
//! categorical day-type signal. Both read the cached snapshot on demand and
//! never trigger network activity themselves; the host re-reads them after a
//! coordinator notification. On a failed poll they keep serving last-known
//! data rather than clearing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use offday_domain::EntryCategory;

use crate::classification::{classify, is_workday, DayType, DAY_TYPE_STATUSES};
use crate::coordinator::CalendarCoordinator;

/// Boolean "is today a workday" consumer.
pub struct WorkdaySensor {
    coordinator: Arc<CalendarCoordinator>,
}

impl WorkdaySensor {
    /// Create a sensor reading through `coordinator`.
    pub fn new(coordinator: Arc<CalendarCoordinator>) -> Self {
        Self { coordinator }
    }

    /// Whether `now` is a working day for the configured user.
    pub fn is_on_at(&self, now: DateTime<Utc>) -> bool {
        let entries = self.coordinator.entries_for(self.coordinator.full_name());
        is_workday(&entries, now)
    }

    /// Whether the current instant is a working day.
    pub fn is_on(&self) -> bool {
        self.is_on_at(Utc::now())
    }
}

/// Categorical day-type consumer.
pub struct DayTypeSensor {
    coordinator: Arc<CalendarCoordinator>,
}

impl DayTypeSensor {
    /// Create a sensor reading through `coordinator`.
    pub fn new(coordinator: Arc<CalendarCoordinator>) -> Self {
        Self { coordinator }
    }

    /// Day type at `now` for the configured user.
    pub fn day_type_at(&self, now: DateTime<Utc>) -> DayType {
        let entries = self.coordinator.entries_for(self.coordinator.full_name());
        classify(&entries, now, &DAY_TYPE_STATUSES)
    }

    /// Day type at the current instant.
    pub fn day_type(&self) -> DayType {
        self.day_type_at(Utc::now())
    }

    /// Numeric state for host attributes: -1 for a workday, otherwise the
    /// matched category code.
    pub fn state_code_at(&self, now: DateTime<Utc>) -> i8 {
        self.day_type_at(now).code()
    }

    /// The fixed set of labels this sensor can report.
    pub fn options() -> [&'static str; 5] {
        [
            "Workday",
            EntryCategory::Absent.label(),
            EntryCategory::WorkFromHome.label(),
            EntryCategory::PublicHoliday.label(),
            EntryCategory::Weekend.label(),
        ]
    }
}

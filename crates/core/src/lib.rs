//! # Offday Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The [`CalendarApi`] port implemented by the infrastructure layer
//! - The polling coordinator that owns the cached snapshot
//! - Day classification rules
//! - The sensor consumers read by the host platform
//!
//! ## Architecture Principles
//! - Only depends on `offday-domain`
//! - No HTTP or filesystem code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod calendar_ports;
pub mod classification;
pub mod coordinator;
pub mod sensors;

// Re-export specific items to avoid ambiguity
pub use calendar_ports::CalendarApi;
pub use classification::{
    active_status_entry, classify, is_workday, DayType, DAY_TYPE_STATUSES, WORKDAY_STATUSES,
};
pub use coordinator::{CalendarCoordinator, CoordinatorEvent, PollOutcome, SubscriptionHandle};
pub use sensors::{DayTypeSensor, WorkdaySensor};

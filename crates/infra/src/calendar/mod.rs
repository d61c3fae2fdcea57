//! Calendar service integration
//!
//! HTTP client for the remote vacation-calendar API plus the wire types it
//! parses.

pub mod client;
pub mod types;

pub use client::CalendarApiClient;
pub use types::{ApiErrorBody, CalendarEntryDto};

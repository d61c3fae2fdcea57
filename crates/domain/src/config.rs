//! Configuration structures for the calendar integration

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL_SECS};

/// Configuration for one polled calendar account.
#[derive(Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// API key used as the bearer token on every request.
    pub api_key: String,
    /// Full name identifying which entries belong to the configured user.
    pub full_name: String,
    /// Identifier of the target calendar element.
    pub element_id: String,
    /// Polling cadence in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Base URL of the calendar service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

// The API key must never end up in logs, so Debug is written by hand.
impl fmt::Debug for CalendarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarConfig")
            .field("api_key", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("element_id", &self.element_id)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("base_url", &self.base_url)
            .finish()
    }
}

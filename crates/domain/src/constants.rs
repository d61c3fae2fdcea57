//! Constants for the Offday integration

/// Base URL of the service hosting the calendar API.
pub const DEFAULT_BASE_URL: &str = "https://domainmetrics-skyline.on.dataminer.services";

/// Default polling cadence in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3600;

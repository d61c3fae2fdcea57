//! Calendar service port interface

use async_trait::async_trait;
use offday_domain::{CalendarEntry, Result};

/// Remote calendar service operations required by the coordinator.
///
/// Implementations issue the actual HTTP requests; the coordinator only
/// depends on this trait so poll behavior can be tested without a network.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Probe the service with the configured credentials.
    async fn authenticate(&self) -> Result<()>;

    /// Fetch all entries recorded for the given full name.
    async fn entries(&self, fullname: &str) -> Result<Vec<CalendarEntry>>;
}

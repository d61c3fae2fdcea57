//! HTTP client for the remote vacation-calendar service
//!
//! Issues single-attempt GET requests with a bearer token. Retry cadence is
//! owned by the scheduler, not the client; the only resilience here is a
//! per-request timeout independent of the poll interval.

use std::time::Duration;

use async_trait::async_trait;
use offday_core::CalendarApi;
use offday_domain::{CalendarConfig, CalendarEntry, OffdayError, Result};
use reqwest::Client;
use tracing::debug;

use super::types::{ApiErrorBody, CalendarEntryDto};
use crate::errors::InfraError;

/// Default per-request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path of the authentication probe endpoint.
const PING_PATH: &str = "/api/custom/calendar/ping";
/// Path of the calendar entries endpoint.
const CALENDAR_PATH: &str = "/api/custom/calendar";

/// Client for the calendar API.
///
/// Configuration (API key, element id, base URL) is immutable after
/// construction.
#[derive(Clone)]
pub struct CalendarApiClient {
    http: Client,
    base_url: String,
    api_key: String,
    element_id: String,
}

impl CalendarApiClient {
    /// Create a client from the account configuration.
    pub fn new(config: &CalendarConfig) -> Result<Self> {
        Self::with_timeout(config, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(config: &CalendarConfig, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|err| {
            let infra: InfraError = err.into();
            OffdayError::from(infra)
        })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            element_id: config.element_id.clone(),
        })
    }
}

#[async_trait]
impl CalendarApi for CalendarApiClient {
    async fn authenticate(&self) -> Result<()> {
        let url = format!("{}{}", self.base_url, PING_PATH);
        debug!(%url, "sending authentication probe");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| OffdayError::Auth(format!("authentication probe failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OffdayError::Auth(format!(
                "authentication rejected with status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| OffdayError::Auth(format!("unreadable probe response: {err}")))?;
        if body != "pong" {
            return Err(OffdayError::Auth(format!("unexpected probe response: '{body}'")));
        }

        debug!("authentication probe accepted");
        Ok(())
    }

    async fn entries(&self, fullname: &str) -> Result<Vec<CalendarEntry>> {
        let url = format!("{}{}", self.base_url, CALENDAR_PATH);
        debug!(%url, fullname, "fetching calendar entries");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("elementId", self.element_id.as_str()), ("fullname", fullname)])
            .send()
            .await
            .map_err(|err| {
                let infra: InfraError = err.into();
                OffdayError::from(infra)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            let detail = match body.first_detail() {
                Some(detail) => detail.to_string(),
                None => format!("calendar request failed with status {status}"),
            };
            return Err(OffdayError::Api(detail));
        }

        let dtos: Vec<CalendarEntryDto> = response
            .json()
            .await
            .map_err(|err| OffdayError::Parse(format!("invalid calendar response: {err}")))?;

        let entries = dtos
            .into_iter()
            .map(CalendarEntry::try_from)
            .collect::<Result<Vec<_>>>()?;

        debug!(count = entries.len(), "fetched calendar entries");
        Ok(entries)
    }
}

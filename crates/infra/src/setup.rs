//! Setup-time validation of a calendar account configuration
//!
//! Runs the same authenticate-then-fetch sequence as a poll cycle and maps
//! failures to the operator-facing taxonomy used by the host's setup flow.
//! Setup failures abort; identical errors during steady-state polling are
//! handled by the coordinator as non-fatal failed cycles.

use offday_core::CalendarApi;
use offday_domain::{CalendarConfig, OffdayError};
use thiserror::Error;
use tracing::debug;

use crate::calendar::CalendarApiClient;

/// Operator-facing validation failure.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The service rejected the configured API key.
    #[error("invalid authentication: {0}")]
    InvalidAuth(String),

    /// The service could not be reached.
    #[error("cannot connect: {0}")]
    CannotConnect(String),

    /// Anything else (malformed responses, API-side failures).
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl From<OffdayError> for SetupError {
    fn from(err: OffdayError) -> Self {
        match err {
            OffdayError::Auth(message) => SetupError::InvalidAuth(message),
            OffdayError::Network(message) => SetupError::CannotConnect(message),
            OffdayError::Api(message)
            | OffdayError::Parse(message)
            | OffdayError::Config(message)
            | OffdayError::Internal(message) => SetupError::Unknown(message),
        }
    }
}

/// Validate a configuration by authenticating and fetching once.
///
/// # Errors
///
/// Returns a [`SetupError`] distinguishing invalid credentials from
/// connectivity problems from anything else, so the operator sees the right
/// validation failure.
pub async fn validate_config(config: &CalendarConfig) -> Result<(), SetupError> {
    let client = CalendarApiClient::new(config)?;
    client.authenticate().await?;
    let entries = client.entries(&config.full_name).await?;
    debug!(full_name = %config.full_name, count = entries.len(), "setup validation succeeded");
    Ok(())
}

//! Conversions from external infrastructure errors into domain errors.

use offday_domain::OffdayError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub OffdayError);

impl From<InfraError> for OffdayError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<OffdayError> for InfraError {
    fn from(value: OffdayError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit within this module.
trait IntoOffdayError {
    fn into_offday(self) -> OffdayError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → OffdayError */
/* -------------------------------------------------------------------------- */

impl IntoOffdayError for HttpError {
    fn into_offday(self) -> OffdayError {
        if self.is_timeout() {
            return OffdayError::Network(format!("request timed out: {self}"));
        }
        if self.is_connect() {
            return OffdayError::Network(format!("connection failed: {self}"));
        }
        if self.is_decode() {
            return OffdayError::Parse(format!("failed to decode response body: {self}"));
        }
        if self.is_builder() || self.is_request() {
            return OffdayError::Internal(format!("failed to build request: {self}"));
        }
        OffdayError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_offday())
    }
}

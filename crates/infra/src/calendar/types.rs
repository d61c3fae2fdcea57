//! Wire types for the calendar API

use chrono::{DateTime, Utc};
use offday_domain::{CalendarEntry, EntryCategory, OffdayError};
use serde::Deserialize;

/// One entry as returned by the calendar endpoint, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEntryDto {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Category")]
    pub category: EntryCategory,
    #[serde(rename = "EventDate")]
    pub event_date: String,
    #[serde(rename = "EndDate")]
    pub end_date: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "OriginalEventDate")]
    pub original_event_date: String,
    #[serde(rename = "OriginalEndDate")]
    pub original_end_date: String,
}

impl TryFrom<CalendarEntryDto> for CalendarEntry {
    type Error = OffdayError;

    fn try_from(dto: CalendarEntryDto) -> Result<Self, Self::Error> {
        let event_start = parse_timestamp(&dto.event_date, "EventDate")?;
        let event_end = parse_timestamp(&dto.end_date, "EndDate")?;
        if event_end < event_start {
            return Err(OffdayError::Parse(format!(
                "entry '{}' ends before it starts ({} > {})",
                dto.id, dto.event_date, dto.end_date
            )));
        }

        Ok(CalendarEntry {
            id: dto.id,
            name: dto.name,
            category: dto.category,
            event_start,
            event_end,
            description: dto.description,
            original_event_start: parse_timestamp(&dto.original_event_date, "OriginalEventDate")?,
            original_event_end: parse_timestamp(&dto.original_end_date, "OriginalEndDate")?,
        })
    }
}

fn parse_timestamp(raw: &str, field: &str) -> Result<DateTime<Utc>, OffdayError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|err| OffdayError::Parse(format!("invalid {field} timestamp '{raw}': {err}")))
}

/// Error payload returned with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

/// One reported error inside [`ApiErrorBody`].
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub detail: String,
}

impl ApiErrorBody {
    /// First reported detail, if the service included one.
    pub fn first_detail(&self) -> Option<&str> {
        self.errors.first().map(|error| error.detail.as_str())
    }
}

//! Event domain model.
//!
//! # Responsibility
//! - Define the canonical persisted record exposed to clients.
//! - Define raw client inputs (`CreateEventRequest`, `EventPatch`) and their
//!   validated storage-side counterparts (`NewEvent`, `EventChanges`).
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store and never mutated.
//! - `date` is always a real calendar date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned identifier. Monotonic and never reused.
pub type EventId = i64;

/// `chrono` format string for the canonical `YYYY-MM-DD` representation.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Persisted calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    /// Serialized as canonical `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub location: String,
    pub notes: String,
    /// Unix epoch milliseconds, set once at insertion.
    pub created_at: i64,
}

/// Client input for creating an event.
///
/// `date` is the raw `DD/MM/YYYY` string. Missing `title`/`date` decode as
/// empty strings so they are rejected by validation with a readable reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Client input for a partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventPatch {
    #[serde(default)]
    pub title: Option<String>,
    /// Raw `DD/MM/YYYY` string.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.date.is_none() && self.location.is_none() && self.notes.is_none()
    }
}

/// Validated insert payload handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    pub notes: String,
}

/// Validated field set for `EventRepository::update_fields`.
///
/// Only `Some` fields are written; the column allow-list is fixed by the
/// struct shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Renders a date in canonical storage form.
pub fn format_canonical_date(date: NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}

/// Parses a canonical `YYYY-MM-DD` date as stored by this crate.
pub fn parse_canonical_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, CANONICAL_DATE_FORMAT).ok()
}

//! Core domain logic for Daybook calendar events.
//! This crate is the single source of truth for event validation and
//! lifecycle rules; transports only map requests onto `EventService`.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::event::{
    format_canonical_date, CreateEventRequest, Event, EventChanges, EventId, EventPatch, NewEvent,
};
pub use model::validation::{
    validate_date, validate_notes, validate_title, TitleRule, ValidationError, MAX_NOTES_WORDS,
    MIN_TITLE_CHARS,
};
pub use repo::event_repo::{EventRepository, RepoError, RepoResult, SqliteEventRepository};
pub use service::event_service::{EventService, EventServiceError, HealthReport};
pub use service::retention::RetentionPolicy;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

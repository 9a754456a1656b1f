//! Event use-case service.
//!
//! # Responsibility
//! - Validate client input before any write reaches the repository.
//! - Run the retention policy ahead of every listing.
//! - Map repository outcomes into caller-facing error categories.
//!
//! # Invariants
//! - Create validates title, date, notes in that order and stops at the
//!   first failure.
//! - Update validates every present field before the single store write.
//! - A store-level not-found on write is always reported as `NotFound`.
//! - Titles and notes are never logged; ids, counts and error codes are.

use crate::model::event::{
    CreateEventRequest, Event, EventChanges, EventId, EventPatch, NewEvent,
};
use crate::model::validation::{validate_date, validate_notes, validate_title, ValidationError};
use crate::repo::event_repo::{EventRepository, RepoError};
use crate::service::retention::RetentionPolicy;
use chrono::NaiveDate;
use log::{error, info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for event use-cases.
#[derive(Debug)]
pub enum EventServiceError {
    /// Client input broke a business rule.
    Validation(ValidationError),
    /// Target event does not exist.
    NotFound(EventId),
    /// Persistence-layer failure.
    Storage(RepoError),
}

impl Display for EventServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(_) => write!(f, "Event not found"),
            Self::Storage(err) => write!(f, "storage unavailable: {err}"),
        }
    }
}

impl Error for EventServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for EventServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl From<ValidationError> for EventServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Store connectivity status reported by the health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthReport {
    Healthy { database: String },
    Unhealthy { error: String },
}

impl HealthReport {
    pub fn healthy() -> Self {
        Self::Healthy {
            database: "connected".to_string(),
        }
    }

    pub fn unhealthy(error: impl Display) -> Self {
        Self::Unhealthy {
            error: error.to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }
}

/// Event service facade over repository implementations.
pub struct EventService<R: EventRepository> {
    repo: R,
}

impl<R: EventRepository> EventService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new event.
    pub fn create(
        &self,
        request: &CreateEventRequest,
        today: NaiveDate,
    ) -> Result<Event, EventServiceError> {
        let new_event = validate_create(request, today).map_err(|err| reject("event_create", err))?;

        match self.repo.insert(&new_event) {
            Ok(event) => {
                info!(
                    "event=event_create module=service status=ok id={} date={}",
                    event.id, event.date
                );
                Ok(event)
            }
            Err(err) => Err(storage_failure("event_create", err)),
        }
    }

    /// Gets one event by id.
    pub fn get(&self, id: EventId) -> Result<Event, EventServiceError> {
        self.repo.get_by_id(id).map_err(Into::into)
    }

    /// Purges past events, then lists what remains.
    ///
    /// `month` is matched as a prefix of the canonical `YYYY-MM-DD` date, so
    /// `2025-06` selects June 2025 and an unmatched value yields an empty list.
    pub fn list(
        &self,
        month: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<Event>, EventServiceError> {
        self.retention()
            .purge_past(today)
            .map_err(|err| storage_failure("events_list", err))?;

        let events = self
            .repo
            .list(month)
            .map_err(|err| storage_failure("events_list", err))?;
        info!(
            "event=events_list module=service status=ok filtered={} count={}",
            month.is_some(),
            events.len()
        );
        Ok(events)
    }

    /// Applies a partial update.
    ///
    /// Every present field is validated with the creation rules, the date
    /// against `today`. Nothing is written unless all of them pass.
    pub fn update(
        &self,
        id: EventId,
        patch: &EventPatch,
        today: NaiveDate,
    ) -> Result<Event, EventServiceError> {
        let changes = validate_patch(patch, today).map_err(|err| reject("event_update", err))?;

        match self.repo.update_fields(id, &changes) {
            Ok(event) => {
                info!("event=event_update module=service status=ok id={id}");
                Ok(event)
            }
            Err(RepoError::NotFound(id)) => {
                warn!("event=event_update module=service status=error id={id} error_code=not_found");
                Err(EventServiceError::NotFound(id))
            }
            Err(err) => Err(storage_failure("event_update", err)),
        }
    }

    /// Deletes one event and returns the record as it was before deletion.
    pub fn delete(&self, id: EventId) -> Result<Event, EventServiceError> {
        match self.repo.delete_by_id(id) {
            Ok(event) => {
                info!("event=event_delete module=service status=ok id={id}");
                Ok(event)
            }
            Err(RepoError::NotFound(id)) => Err(EventServiceError::NotFound(id)),
            Err(err) => Err(storage_failure("event_delete", err)),
        }
    }

    /// Runs the retention policy on demand.
    pub fn run_cleanup(&self, today: NaiveDate) -> Result<usize, EventServiceError> {
        self.retention().purge_past(today).map_err(Into::into)
    }

    /// Probes store connectivity.
    pub fn health(&self) -> HealthReport {
        match self.repo.ping() {
            Ok(()) => HealthReport::healthy(),
            Err(err) => {
                error!("event=health_check module=service status=error error={err}");
                HealthReport::unhealthy(err)
            }
        }
    }

    fn retention(&self) -> RetentionPolicy<'_, R> {
        RetentionPolicy::new(&self.repo)
    }
}

fn validate_create(
    request: &CreateEventRequest,
    today: NaiveDate,
) -> Result<NewEvent, ValidationError> {
    validate_title(&request.title)?;
    let date = validate_date(&request.date, today)?;
    let notes = request.notes.clone().unwrap_or_default();
    validate_notes(&notes)?;

    Ok(NewEvent {
        title: request.title.clone(),
        date,
        location: request.location.clone().unwrap_or_default(),
        notes,
    })
}

fn validate_patch(patch: &EventPatch, today: NaiveDate) -> Result<EventChanges, ValidationError> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }

    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    let date = match &patch.date {
        Some(raw) => Some(validate_date(raw, today)?),
        None => None,
    };
    if let Some(notes) = &patch.notes {
        validate_notes(notes)?;
    }

    Ok(EventChanges {
        title: patch.title.clone(),
        date,
        location: patch.location.clone(),
        notes: patch.notes.clone(),
    })
}

fn reject(operation: &'static str, err: ValidationError) -> EventServiceError {
    warn!(
        "event={operation} module=service status=rejected error_code={}",
        err.code()
    );
    EventServiceError::Validation(err)
}

fn storage_failure(operation: &'static str, err: RepoError) -> EventServiceError {
    error!("event={operation} module=service status=error error={err}");
    err.into()
}

//! Calendar event domain model and validation rules.
//!
//! # Responsibility
//! - Define the persisted `Event` record and its write-side inputs.
//! - Own the pure business rules for titles, dates, notes and month filters.
//!
//! # Invariants
//! - Every event is identified by a store-assigned `EventId`.
//! - Dates are held as `NaiveDate` and rendered canonically as `YYYY-MM-DD`.

pub mod event;
pub mod validation;

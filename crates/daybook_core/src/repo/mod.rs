//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the event store contract used by services.
//! - Isolate SQLite query details from validation and orchestration.
//!
//! # Invariants
//! - Repository writes receive already-validated payloads.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod event_repo;

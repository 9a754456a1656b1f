//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, retention and repository calls into use-case
//!   level APIs.
//! - Keep transport layers decoupled from storage details.

pub mod event_service;
pub mod retention;

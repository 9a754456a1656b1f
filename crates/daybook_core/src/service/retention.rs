//! Past-event retention policy.
//!
//! # Invariants
//! - Only events dated strictly before `today` are removed.
//! - Purging is idempotent: a repeat call with no inserts in between
//!   removes nothing.

use crate::model::event::format_canonical_date;
use crate::repo::event_repo::{EventRepository, RepoResult};
use chrono::NaiveDate;
use log::{error, info};

/// Removes events whose date has passed.
pub struct RetentionPolicy<'repo, R: EventRepository + ?Sized> {
    repo: &'repo R,
}

impl<'repo, R: EventRepository + ?Sized> RetentionPolicy<'repo, R> {
    pub fn new(repo: &'repo R) -> Self {
        Self { repo }
    }

    /// Deletes every event dated before `today` and returns how many went.
    pub fn purge_past(&self, today: NaiveDate) -> RepoResult<usize> {
        let cutoff = format_canonical_date(today);
        match self.repo.delete_where_date_before(today) {
            Ok(removed) => {
                info!(
                    "event=retention_purge module=retention status=ok cutoff={cutoff} removed={removed}"
                );
                Ok(removed)
            }
            Err(err) => {
                error!(
                    "event=retention_purge module=retention status=error cutoff={cutoff} error={err}"
                );
                Err(err)
            }
        }
    }
}

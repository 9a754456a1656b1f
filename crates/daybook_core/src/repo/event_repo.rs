//! Event repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed CRUD and bulk retention deletes over `events` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every single-record write is one SQL statement (`… RETURNING`), so no
//!   partial field application is observable and a missing id never writes.
//! - Listing order is `date ASC, id ASC`; the month filter is an opaque
//!   date prefix and never fails.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::event::{
    format_canonical_date, parse_canonical_date, Event, EventChanges, EventId, NewEvent,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EVENT_COLUMNS: &str = "id, title, date, location, notes, created_at";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for event persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(EventId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "Event not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for event storage.
pub trait EventRepository {
    /// Persists a new event and returns it with id and creation timestamp.
    fn insert(&self, event: &NewEvent) -> RepoResult<Event>;
    fn get_by_id(&self, id: EventId) -> RepoResult<Event>;
    /// Lists events whose canonical date starts with `date_prefix`
    /// (typically `YYYY-MM`), or all events when `None`.
    fn list(&self, date_prefix: Option<&str>) -> RepoResult<Vec<Event>>;
    /// Applies the `Some` fields of `changes` and returns the updated record.
    fn update_fields(&self, id: EventId, changes: &EventChanges) -> RepoResult<Event>;
    /// Removes one event and returns it as it was before deletion.
    fn delete_by_id(&self, id: EventId) -> RepoResult<Event>;
    /// Removes all events dated strictly before `cutoff`.
    fn delete_where_date_before(&self, cutoff: NaiveDate) -> RepoResult<usize>;
    /// Cheap connectivity probe.
    fn ping(&self) -> RepoResult<()>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails when the schema does not carry the `events` table with every
    /// column this repository reads.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_event_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn insert(&self, event: &NewEvent) -> RepoResult<Event> {
        let event = self.conn.query_row(
            &format!(
                "INSERT INTO events (title, date, location, notes)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING {EVENT_COLUMNS};"
            ),
            params![
                event.title.as_str(),
                format_canonical_date(event.date),
                event.location.as_str(),
                event.notes.as_str(),
            ],
            read_event_row,
        )?;
        decode_event(event)
    }

    fn get_by_id(&self, id: EventId) -> RepoResult<Event> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1;"),
                [id],
                read_event_row,
            )
            .optional()?;

        match row {
            Some(row) => decode_event(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn list(&self, date_prefix: Option<&str>) -> RepoResult<Vec<Event>> {
        // substr keeps `%`/`_` in the prefix literal, unlike LIKE.
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS}
             FROM events
             WHERE (?1 IS NULL OR substr(date, 1, length(?1)) = ?1)
             ORDER BY date ASC, id ASC;"
        ))?;

        let rows = stmt.query_map([date_prefix], read_event_row)?;
        let mut events = Vec::new();
        for row in rows {
            events.push(decode_event(row?)?);
        }

        Ok(events)
    }

    fn update_fields(&self, id: EventId, changes: &EventChanges) -> RepoResult<Event> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "UPDATE events
                     SET
                        title = COALESCE(?2, title),
                        date = COALESCE(?3, date),
                        location = COALESCE(?4, location),
                        notes = COALESCE(?5, notes)
                     WHERE id = ?1
                     RETURNING {EVENT_COLUMNS};"
                ),
                params![
                    id,
                    changes.title.as_deref(),
                    changes.date.map(format_canonical_date),
                    changes.location.as_deref(),
                    changes.notes.as_deref(),
                ],
                read_event_row,
            )
            .optional()?;

        match row {
            Some(row) => decode_event(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn delete_by_id(&self, id: EventId) -> RepoResult<Event> {
        let row = self
            .conn
            .query_row(
                &format!("DELETE FROM events WHERE id = ?1 RETURNING {EVENT_COLUMNS};"),
                [id],
                read_event_row,
            )
            .optional()?;

        match row {
            Some(row) => decode_event(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn delete_where_date_before(&self, cutoff: NaiveDate) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM events WHERE date < ?1;",
            [format_canonical_date(cutoff)],
        )?;
        Ok(removed)
    }

    fn ping(&self) -> RepoResult<()> {
        self.conn.query_row("SELECT 1;", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

/// Undecoded row; `date` stays text until `decode_event` checks it.
struct EventRow {
    id: EventId,
    title: String,
    date: String,
    location: String,
    notes: String,
    created_at: i64,
}

fn read_event_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get("id")?,
        title: row.get("title")?,
        date: row.get("date")?,
        location: row.get("location")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
    })
}

fn decode_event(row: EventRow) -> RepoResult<Event> {
    let date = parse_canonical_date(&row.date).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid date `{}` in events.date for id {}",
            row.date, row.id
        ))
    })?;

    Ok(Event {
        id: row.id,
        title: row.title,
        date,
        location: row.location,
        notes: row.notes,
        created_at: row.created_at,
    })
}

fn ensure_event_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "events")? {
        return Err(RepoError::MissingRequiredTable("events"));
    }

    for column in ["id", "title", "date", "location", "notes", "created_at"] {
        if !table_has_column(conn, "events", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "events",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

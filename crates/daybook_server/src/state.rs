use chrono::{Local, NaiveDate};
use daybook_core::db::open_db;
use daybook_core::{EventService, EventServiceError, HealthReport, SqliteEventRepository};
use std::path::PathBuf;
use std::sync::Arc;

use crate::routes::ApiError;

type Clock = dyn Fn() -> NaiveDate + Send + Sync;

/// Shared application state.
///
/// Holds only immutable settings. Every request opens its own connection,
/// so handlers share no mutable in-process state.
#[derive(Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
    clock: Arc<Clock>,
}

impl AppState {
    /// State whose "today" is the local calendar day.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self::with_clock(db_path, || Local::now().date_naive())
    }

    pub fn with_clock(
        db_path: impl Into<PathBuf>,
        clock: impl Fn() -> NaiveDate + Send + Sync + 'static,
    ) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
            clock: Arc::new(clock),
        }
    }

    /// Current local calendar day, read once per request.
    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Runs `op` against a fresh service on the blocking pool.
    pub async fn with_service<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: for<'conn> FnOnce(&EventService<SqliteEventRepository<'conn>>) -> Result<T, EventServiceError>
            + Send
            + 'static,
    {
        let db_path = Arc::clone(&self.db_path);
        tokio::task::spawn_blocking(move || {
            let conn = open_db(db_path.as_path())?;
            let service = EventService::new(SqliteEventRepository::try_new(&conn)?);
            op(&service).map_err(ApiError::from)
        })
        .await?
    }

    /// Health probe; connection failures degrade the report instead of
    /// failing the request.
    pub async fn health(&self) -> HealthReport {
        let db_path = Arc::clone(&self.db_path);
        let probe = tokio::task::spawn_blocking(move || {
            let conn = match open_db(db_path.as_path()) {
                Ok(conn) => conn,
                Err(err) => return HealthReport::unhealthy(err),
            };
            match SqliteEventRepository::try_new(&conn) {
                Ok(repo) => EventService::new(repo).health(),
                Err(err) => HealthReport::unhealthy(err),
            }
        })
        .await;

        probe.unwrap_or_else(HealthReport::unhealthy)
    }

    /// Applies the schema and purges events that went past while the
    /// server was down. Returns the number of purged events.
    pub async fn prepare_storage(&self) -> Result<usize, ApiError> {
        let today = self.today();
        self.with_service(move |service| service.run_cleanup(today))
            .await
    }
}

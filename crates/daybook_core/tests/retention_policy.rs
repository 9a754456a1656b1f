use chrono::NaiveDate;
use daybook_core::db::{open_db_in_memory, DbError};
use daybook_core::{
    Event, EventChanges, EventId, EventRepository, EventService, EventServiceError, HealthReport,
    NewEvent, RepoError, RepoResult, RetentionPolicy, SqliteEventRepository,
};
use std::cell::Cell;
use std::rc::Rc;

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn purge_removes_only_strictly_past_events() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::try_new(&conn).unwrap();
    for (title, date) in [
        ("Two days ago", ymd(2025, 6, 13)),
        ("Yesterday", ymd(2025, 6, 14)),
        ("Today", ymd(2025, 6, 15)),
        ("Tomorrow", ymd(2025, 6, 16)),
    ] {
        repo.insert(&NewEvent {
            title: title.to_string(),
            date,
            location: String::new(),
            notes: String::new(),
        })
        .unwrap();
    }

    let policy = RetentionPolicy::new(&repo);
    assert_eq!(policy.purge_past(ymd(2025, 6, 15)).unwrap(), 2);
    assert_eq!(policy.purge_past(ymd(2025, 6, 15)).unwrap(), 0);

    let remaining = repo.list(None).unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|e| e.date >= ymd(2025, 6, 15)));
}

/// Store double whose every call fails like an unreachable database.
#[derive(Default)]
struct UnavailableRepository {
    calls: Rc<Cell<usize>>,
}

impl UnavailableRepository {
    fn fail<T>(&self) -> RepoResult<T> {
        self.calls.set(self.calls.get() + 1);
        Err(RepoError::Db(DbError::Sqlite(rusqlite::Error::InvalidQuery)))
    }
}

impl EventRepository for UnavailableRepository {
    fn insert(&self, _event: &NewEvent) -> RepoResult<Event> {
        self.fail()
    }

    fn get_by_id(&self, _id: EventId) -> RepoResult<Event> {
        self.fail()
    }

    fn list(&self, _date_prefix: Option<&str>) -> RepoResult<Vec<Event>> {
        self.fail()
    }

    fn update_fields(&self, _id: EventId, _changes: &EventChanges) -> RepoResult<Event> {
        self.fail()
    }

    fn delete_by_id(&self, _id: EventId) -> RepoResult<Event> {
        self.fail()
    }

    fn delete_where_date_before(&self, _cutoff: NaiveDate) -> RepoResult<usize> {
        self.fail()
    }

    fn ping(&self) -> RepoResult<()> {
        self.fail()
    }
}

#[test]
fn storage_failures_surface_as_storage_errors() {
    let service = EventService::new(UnavailableRepository::default());

    assert!(matches!(
        service.list(None, ymd(2025, 6, 15)).unwrap_err(),
        EventServiceError::Storage(_)
    ));
    assert!(matches!(
        service.run_cleanup(ymd(2025, 6, 15)).unwrap_err(),
        EventServiceError::Storage(_)
    ));
    assert!(matches!(
        service.get(1).unwrap_err(),
        EventServiceError::Storage(_)
    ));
}

#[test]
fn health_degrades_when_store_is_unreachable() {
    let service = EventService::new(UnavailableRepository::default());

    let report = service.health();
    assert!(!report.is_healthy());
    assert!(matches!(report, HealthReport::Unhealthy { .. }));
}

#[test]
fn validation_runs_before_the_store_is_touched() {
    let repo = UnavailableRepository::default();
    let calls = Rc::clone(&repo.calls);
    let service = EventService::new(repo);

    let err = service
        .create(
            &daybook_core::CreateEventRequest {
                title: "no".to_string(),
                date: "01/01/2030".to_string(),
                ..Default::default()
            },
            ymd(2025, 6, 15),
        )
        .unwrap_err();
    assert!(matches!(err, EventServiceError::Validation(_)));
    assert_eq!(calls.get(), 0);
}

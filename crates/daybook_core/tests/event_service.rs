use chrono::NaiveDate;
use daybook_core::db::open_db_in_memory;
use daybook_core::{
    CreateEventRequest, EventPatch, EventService, EventServiceError, SqliteEventRepository,
    TitleRule, ValidationError,
};
use rusqlite::{params, Connection};

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn today() -> NaiveDate {
    ymd(2025, 6, 15)
}

fn request(title: &str, date: &str) -> CreateEventRequest {
    CreateEventRequest {
        title: title.to_string(),
        date: date.to_string(),
        ..CreateEventRequest::default()
    }
}

fn event_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM events;", [], |row| row.get(0))
        .unwrap()
}

/// Inserts a row directly, bypassing the past-date rule, to simulate an
/// event that has since become past.
fn insert_raw(conn: &Connection, title: &str, canonical_date: &str) -> i64 {
    conn.execute(
        "INSERT INTO events (title, date) VALUES (?1, ?2);",
        params![title, canonical_date],
    )
    .unwrap();
    conn.last_insert_rowid()
}

#[test]
fn create_then_get_returns_canonical_date() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());

    let mut input = request("Project kickoff", "01/01/2026");
    input.location = Some("HQ".to_string());
    input.notes = Some("agenda to follow".to_string());
    let created = service.create(&input, today()).unwrap();

    let fetched = service.get(created.id).unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.date.to_string(), "2026-01-01");
    assert_eq!(fetched.location, "HQ");
    assert_eq!(fetched.notes, "agenda to follow");
}

#[test]
fn create_rejects_invalid_input_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());

    let cases = [
        (
            request("abc", "01/01/2026"),
            ValidationError::InvalidTitle(TitleRule::TooShort),
        ),
        (
            request("2025 !!", "01/01/2026"),
            ValidationError::InvalidTitle(TitleRule::NoLetter),
        ),
        (
            request("Valid title", "2026-01-01"),
            ValidationError::InvalidDateFormat("2026-01-01".to_string()),
        ),
        (
            request("Valid title", "14/06/2025"),
            ValidationError::PastDate {
                date: ymd(2025, 6, 14),
                today: today(),
            },
        ),
    ];

    for (input, expected) in cases {
        let err = service.create(&input, today()).unwrap_err();
        match err {
            EventServiceError::Validation(actual) => assert_eq!(actual, expected),
            other => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(event_count(&conn), 0);
}

#[test]
fn create_rejects_long_notes() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());

    let mut input = request("Valid title", "15/06/2025");
    input.notes = Some("word ".repeat(24));
    let err = service.create(&input, today()).unwrap_err();
    assert!(matches!(
        err,
        EventServiceError::Validation(ValidationError::NotesTooLong { word_count: 24, .. })
    ));
    assert_eq!(event_count(&conn), 0);
}

#[test]
fn create_accepts_today() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());

    let created = service
        .create(&request("Same day event", "15/06/2025"), today())
        .unwrap();
    assert_eq!(created.date, today());
}

#[test]
fn list_purges_past_events_first() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());

    insert_raw(&conn, "Expired event", "2025-06-14");
    let kept = service
        .create(&request("Upcoming event", "15/06/2025"), today())
        .unwrap();

    let listed = service.list(None, today()).unwrap();
    assert_eq!(listed, vec![kept]);
    assert_eq!(event_count(&conn), 1);
}

#[test]
fn list_with_month_filter_returns_sorted_month_only() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());

    let late = service
        .create(&request("Late June", "30/06/2025"), today())
        .unwrap();
    let mid_a = service
        .create(&request("Mid June A", "20/06/2025"), today())
        .unwrap();
    let mid_b = service
        .create(&request("Mid June B", "20/06/2025"), today())
        .unwrap();
    service
        .create(&request("Early July", "01/07/2025"), today())
        .unwrap();

    let listed = service.list(Some("2025-06"), today()).unwrap();
    let ids: Vec<_> = listed.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![mid_a.id, mid_b.id, late.id]);
    assert!(listed
        .iter()
        .all(|e| e.date.to_string().starts_with("2025-06")));
}

#[test]
fn list_with_unmatched_month_is_empty_after_purge() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());
    insert_raw(&conn, "Expired event", "2025-06-14");
    service
        .create(&request("Upcoming event", "20/06/2025"), today())
        .unwrap();

    let listed = service.list(Some("June"), today()).unwrap();
    assert!(listed.is_empty());
    // The purge still ran; only the upcoming event survives.
    assert_eq!(event_count(&conn), 1);
    assert_eq!(service.list(None, today()).unwrap().len(), 1);
}

#[test]
fn cleanup_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());

    insert_raw(&conn, "Expired A", "2025-06-01");
    insert_raw(&conn, "Expired B", "2024-12-31");
    service
        .create(&request("Upcoming event", "15/06/2025"), today())
        .unwrap();

    assert_eq!(service.run_cleanup(today()).unwrap(), 2);
    assert_eq!(service.run_cleanup(today()).unwrap(), 0);

    let remaining = service.list(None, today()).unwrap();
    assert!(remaining.iter().all(|e| e.date >= today()));
    assert_eq!(remaining.len(), 1);
}

#[test]
fn events_become_past_as_days_advance() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());

    service
        .create(&request("Soon event", "16/06/2025"), today())
        .unwrap();
    assert_eq!(service.list(None, ymd(2025, 6, 16)).unwrap().len(), 1);
    assert!(service.list(None, ymd(2025, 6, 17)).unwrap().is_empty());
}

#[test]
fn update_with_too_many_words_leaves_event_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());
    let created = service
        .create(&request("Planning session", "20/06/2025"), today())
        .unwrap();

    let patch = EventPatch {
        title: Some("Renamed session".to_string()),
        notes: Some("word ".repeat(24)),
        ..EventPatch::default()
    };
    let err = service.update(created.id, &patch, today()).unwrap_err();
    assert!(matches!(
        err,
        EventServiceError::Validation(ValidationError::NotesTooLong { .. })
    ));
    assert_eq!(service.get(created.id).unwrap(), created);
}

#[test]
fn update_missing_id_is_not_found_even_with_valid_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());

    let patch = EventPatch {
        title: Some("Valid Title".to_string()),
        ..EventPatch::default()
    };
    let err = service.update(9_999, &patch, today()).unwrap_err();
    assert!(matches!(err, EventServiceError::NotFound(9_999)));
}

#[test]
fn update_missing_id_with_invalid_fields_reports_validation() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());

    let patch = EventPatch {
        title: Some("abc".to_string()),
        ..EventPatch::default()
    };
    let err = service.update(9_999, &patch, today()).unwrap_err();
    assert!(matches!(err, EventServiceError::Validation(_)));
}

#[test]
fn update_rejects_moving_a_future_event_into_the_past() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());
    let created = service
        .create(&request("Conference call", "20/06/2025"), today())
        .unwrap();

    let patch = EventPatch {
        date: Some("10/06/2025".to_string()),
        ..EventPatch::default()
    };
    let err = service.update(created.id, &patch, today()).unwrap_err();
    assert!(matches!(
        err,
        EventServiceError::Validation(ValidationError::PastDate { .. })
    ));
    assert_eq!(service.get(created.id).unwrap(), created);
}

#[test]
fn partial_update_keeps_omitted_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());
    let mut input = request("Quarterly review", "20/06/2025");
    input.location = Some("Room 2".to_string());
    input.notes = Some("prepare numbers".to_string());
    let created = service.create(&input, today()).unwrap();

    let patch = EventPatch {
        date: Some("01/07/2025".to_string()),
        ..EventPatch::default()
    };
    let updated = service.update(created.id, &patch, today()).unwrap();

    assert_eq!(updated.date, ymd(2025, 7, 1));
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.location, created.location);
    assert_eq!(updated.notes, created.notes);
    assert_eq!(updated.created_at, created.created_at);
}

#[test]
fn empty_update_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());
    let created = service
        .create(&request("Design review", "20/06/2025"), today())
        .unwrap();

    let err = service
        .update(created.id, &EventPatch::default(), today())
        .unwrap_err();
    assert!(matches!(
        err,
        EventServiceError::Validation(ValidationError::EmptyUpdate)
    ));
}

#[test]
fn delete_returns_record_then_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());
    let created = service
        .create(&request("Farewell party", "20/06/2025"), today())
        .unwrap();

    assert_eq!(service.delete(created.id).unwrap(), created);
    assert!(matches!(
        service.delete(created.id).unwrap_err(),
        EventServiceError::NotFound(id) if id == created.id
    ));
    assert!(matches!(
        service.get(created.id).unwrap_err(),
        EventServiceError::NotFound(_)
    ));
}

#[test]
fn health_reports_connected_store() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());
    assert!(service.health().is_healthy());
}

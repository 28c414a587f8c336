use calendar_core::db::open_db_in_memory;
use calendar_core::{
    EventChanges, EventListing, EventQuery, EventRepository, EventService, EventServiceError,
    NewEvent, SqliteEventRepository,
};
use chrono::NaiveDate;
use rusqlite::Connection;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn service(conn: &Connection) -> EventService<SqliteEventRepository<'_>> {
    EventService::new(SqliteEventRepository::new(conn))
}

fn event_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM events;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_then_list_by_date_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service
        .create_event(NewEvent::new(
            "Meeting",
            Some("Standup".to_string()),
            date(2024, 3, 5),
        ))
        .unwrap();

    let listing = service
        .list_events(EventQuery::ByDate(date(2024, 3, 5)))
        .unwrap();
    match listing {
        EventListing::Events(events) => {
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].id, created.id);
            assert_eq!(events[0].title, "Meeting");
            assert_eq!(events[0].description.as_deref(), Some("Standup"));
            assert_eq!(events[0].date, date(2024, 3, 5));
        }
        other => panic!("unexpected listing: {other:?}"),
    }
}

#[test]
fn create_with_blank_title_is_rejected_without_persisting() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    for title in ["", "   ", "\t\n"] {
        let err = service
            .create_event(NewEvent::new(title, None, date(2024, 3, 5)))
            .unwrap_err();
        assert!(
            matches!(&err, EventServiceError::Validation(message) if message.contains("Title")),
            "unexpected error for {title:?}: {err}"
        );
    }
    assert_eq!(event_count(&conn), 0);
}

#[test]
fn create_with_oversized_title_is_a_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .create_event(NewEvent::new("x".repeat(101), None, date(2024, 3, 5)))
        .unwrap_err();
    assert!(matches!(err, EventServiceError::Validation(_)));
    assert_eq!(event_count(&conn), 0);
}

#[test]
fn titles_with_nul_characters_are_validation_errors() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .create_event(NewEvent::new("\0Meeting", None, date(2024, 3, 5)))
        .unwrap_err();
    assert!(
        matches!(&err, EventServiceError::Validation(message) if message.contains("NUL")),
        "unexpected error: {err}"
    );
    assert_eq!(event_count(&conn), 0);

    let existing = service
        .create_event(NewEvent::new("Meeting", None, date(2024, 3, 5)))
        .unwrap();
    let err = service
        .update_event(existing.id, EventChanges::new("\0y", None))
        .unwrap_err();
    assert!(matches!(err, EventServiceError::Validation(_)));
    assert_eq!(service.find_event(existing.id).unwrap(), existing);
}

#[test]
fn list_by_month_returns_each_date_once() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    for title in ["one", "two", "three"] {
        service
            .create_event(NewEvent::new(title, None, date(2024, 3, 5)))
            .unwrap();
    }
    service
        .create_event(NewEvent::new("four", None, date(2024, 3, 9)))
        .unwrap();

    let query = EventQuery::from_params(None, Some(3), Some(2024)).unwrap();
    let listing = service.list_events(query).unwrap();
    assert_eq!(
        listing,
        EventListing::Dates(vec![date(2024, 3, 5), date(2024, 3, 9)])
    );
}

#[test]
fn update_missing_event_is_not_found_and_leaves_storage_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let existing = service
        .create_event(NewEvent::new("keep", None, date(2024, 3, 5)))
        .unwrap();

    let err = service
        .update_event(existing.id + 100, EventChanges::new("new", None))
        .unwrap_err();
    assert!(matches!(err, EventServiceError::EventNotFound(id) if id == existing.id + 100));
    assert_eq!(service.find_event(existing.id).unwrap(), existing);
    assert_eq!(event_count(&conn), 1);
}

#[test]
fn update_missing_event_reports_not_found_before_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .update_event(1, EventChanges::new("  ", None))
        .unwrap_err();
    assert!(matches!(err, EventServiceError::EventNotFound(1)));
}

#[test]
fn update_with_blank_title_leaves_record_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let existing = service
        .create_event(NewEvent::new(
            "keep",
            Some("as is".to_string()),
            date(2024, 3, 5),
        ))
        .unwrap();

    let err = service
        .update_event(existing.id, EventChanges::new("   ", None))
        .unwrap_err();
    assert!(matches!(err, EventServiceError::Validation(_)));
    assert_eq!(service.find_event(existing.id).unwrap(), existing);
}

#[test]
fn update_keeps_id_and_date() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let existing = service
        .create_event(NewEvent::new("old", None, date(2024, 3, 5)))
        .unwrap();

    let updated = service
        .update_event(
            existing.id,
            EventChanges::new("new", Some("details".to_string())),
        )
        .unwrap();
    assert_eq!(
        updated,
        existing.with_changes(EventChanges::new("new", Some("details".to_string())))
    );
}

#[test]
fn delete_then_find_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let existing = service
        .create_event(NewEvent::new("short lived", None, date(2024, 3, 5)))
        .unwrap();

    service.delete_event(existing.id).unwrap();

    let err = service.find_event(existing.id).unwrap_err();
    assert!(matches!(err, EventServiceError::EventNotFound(id) if id == existing.id));
}

#[test]
fn delete_twice_succeeds_then_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let existing = service
        .create_event(NewEvent::new("once", None, date(2024, 3, 5)))
        .unwrap();

    service.delete_event(existing.id).unwrap();
    let err = service.delete_event(existing.id).unwrap_err();
    assert!(matches!(err, EventServiceError::EventNotFound(_)));
    assert_eq!(err.to_string(), "Could not find event");
}

#[test]
fn service_works_over_any_repository() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::new(&conn);
    let seeded = repo
        .create_event(&NewEvent::new("seeded", None, date(2024, 3, 5)))
        .unwrap();

    let service = EventService::new(repo);
    assert_eq!(service.find_event(seeded.id).unwrap(), seeded);
}

//! Event repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the keyed, date-indexed CRUD surface over `events` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Updates never touch `id` or `date`.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Date filters compare `YYYY-MM-DD` text so `idx_events_date` is used.

use crate::db::DbError;
use crate::model::event::{Event, EventChanges, EventId, EventValidationError, NewEvent};
use crate::model::month::CalendarMonth;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    date
FROM events";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for event persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EventValidationError),
    Db(DbError),
    NotFound(EventId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<EventValidationError> for RepoError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
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

/// Repository interface for the event store.
pub trait EventRepository {
    /// Persists a new event and returns it with its assigned id.
    fn create_event(&self, event: &NewEvent) -> RepoResult<Event>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    /// Lists events on `date` in insertion order. Empty when none match.
    fn list_events_by_date(&self, date: NaiveDate) -> RepoResult<Vec<Event>>;
    /// Lists each date in `month` that has at least one event, ascending.
    fn list_event_dates_in_month(&self, month: CalendarMonth) -> RepoResult<Vec<NaiveDate>>;
    /// Overwrites title and description in place.
    fn update_event(&self, id: EventId, changes: &EventChanges) -> RepoResult<Event>;
    /// Permanently removes an event.
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &NewEvent) -> RepoResult<Event> {
        event.validate()?;

        self.conn.execute(
            "INSERT INTO events (
                title,
                description,
                date
            ) VALUES (?1, ?2, ?3);",
            params![
                event.title.as_str(),
                event.description.as_deref(),
                date_to_db(event.date),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        Ok(event.clone().into_event(id))
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }

        Ok(None)
    }

    fn list_events_by_date(&self, date: NaiveDate) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{EVENT_SELECT_SQL}
             WHERE date = ?1
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([date_to_db(date)])?;
        let mut events = Vec::new();

        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }

        Ok(events)
    }

    fn list_event_dates_in_month(&self, month: CalendarMonth) -> RepoResult<Vec<NaiveDate>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT DISTINCT date
             FROM events
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date ASC;",
        )?;

        let mut rows = stmt.query(params![
            date_to_db(month.first_day()),
            date_to_db(month.last_day()),
        ])?;
        let mut dates = Vec::new();

        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            dates.push(parse_date(&text)?);
        }

        Ok(dates)
    }

    fn update_event(&self, id: EventId, changes: &EventChanges) -> RepoResult<Event> {
        changes.validate()?;

        let changed = self.conn.execute(
            "UPDATE events
             SET
                title = ?1,
                description = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3;",
            params![changes.title.as_str(), changes.description.as_deref(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.get_event(id)?.ok_or(RepoError::NotFound(id))
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let date_text: String = row.get("date")?;
    let event = Event {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        date: parse_date(&date_text)?,
    };

    event.validate().map_err(|err| {
        RepoError::InvalidData(format!("event {} failed validation: {err}", event.id))
    })?;
    Ok(event)
}

fn parse_date(value: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date value `{value}` in events.date")))
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

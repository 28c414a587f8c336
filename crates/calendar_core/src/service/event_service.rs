//! Event use-case service.
//!
//! # Responsibility
//! - Validate caller input and translate it into event store operations.
//! - Resolve the two list modes (single date, month overview).
//! - Turn repository outcomes into use-case errors callers can map to
//!   responses.
//!
//! # Invariants
//! - Blank titles never reach the store; nothing is persisted on rejection.
//! - Update and delete look the event up before validating or mutating, so
//!   an unknown id is reported as not found even when the input is invalid.
//! - Date mode wins when both a date and a month/year pair are supplied.

use crate::model::event::{is_blank_title, Event, EventChanges, EventId, NewEvent};
use crate::model::month::CalendarMonth;
use crate::repo::event_repo::{EventRepository, RepoError};
use chrono::NaiveDate;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const BLANK_TITLE_MESSAGE: &str = "Title cannot be null, empty or whitespace.";
const MISSING_QUERY_MESSAGE: &str = "You must query by either a date or month.";

pub type ServiceResult<T> = Result<T, EventServiceError>;

/// Service error for event use-cases.
#[derive(Debug)]
pub enum EventServiceError {
    /// Caller input was rejected; carries a human-readable message.
    Validation(String),
    /// Target event does not exist.
    EventNotFound(EventId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for EventServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::EventNotFound(_) => write!(f, "Could not find event"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EventServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EventServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::EventNotFound(id),
            RepoError::Validation(err) => Self::Validation(err.to_string()),
            other => Self::Repo(other),
        }
    }
}

/// Selected list mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventQuery {
    /// Events on one calendar date.
    ByDate(NaiveDate),
    /// Distinct dates with at least one event in a month.
    ByMonth(CalendarMonth),
}

impl EventQuery {
    /// Resolves raw list parameters into a query mode.
    ///
    /// # Contract
    /// - `date` present -> `ByDate`, regardless of `month`/`year`.
    /// - Both `month` and `year` present -> `ByMonth`.
    /// - Anything else is a validation error.
    pub fn from_params(
        date: Option<NaiveDate>,
        month: Option<u32>,
        year: Option<i32>,
    ) -> ServiceResult<Self> {
        if let Some(date) = date {
            return Ok(Self::ByDate(date));
        }

        match (month, year) {
            (Some(month), Some(year)) => CalendarMonth::new(year, month)
                .map(Self::ByMonth)
                .ok_or_else(|| {
                    EventServiceError::Validation(format!(
                        "Month {month} of year {year} is not a valid calendar month."
                    ))
                }),
            _ => Err(EventServiceError::Validation(
                MISSING_QUERY_MESSAGE.to_string(),
            )),
        }
    }
}

/// Result of a list call; the shape depends on the query mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventListing {
    Events(Vec<Event>),
    Dates(Vec<NaiveDate>),
}

/// Use-case service wrapper for event operations.
pub struct EventService<R: EventRepository> {
    repo: R,
}

impl<R: EventRepository> EventService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an event after rejecting blank titles.
    pub fn create_event(&self, event: NewEvent) -> ServiceResult<Event> {
        reject_blank_title(&event.title)?;
        Ok(self.repo.create_event(&event)?)
    }

    /// Looks up one event, failing with `EventNotFound` when absent.
    pub fn find_event(&self, id: EventId) -> ServiceResult<Event> {
        self.repo
            .get_event(id)?
            .ok_or(EventServiceError::EventNotFound(id))
    }

    /// Runs a list query in the selected mode.
    pub fn list_events(&self, query: EventQuery) -> ServiceResult<EventListing> {
        match query {
            EventQuery::ByDate(date) => Ok(EventListing::Events(
                self.repo.list_events_by_date(date)?,
            )),
            EventQuery::ByMonth(month) => Ok(EventListing::Dates(
                self.repo.list_event_dates_in_month(month)?,
            )),
        }
    }

    /// Replaces title and description of an existing event.
    ///
    /// Returns the stored event after the update; its `date` is unchanged.
    pub fn update_event(&self, id: EventId, changes: EventChanges) -> ServiceResult<Event> {
        self.find_event(id)?;
        reject_blank_title(&changes.title)?;
        Ok(self.repo.update_event(id, &changes)?)
    }

    /// Permanently removes an existing event.
    pub fn delete_event(&self, id: EventId) -> ServiceResult<()> {
        self.find_event(id)?;
        Ok(self.repo.delete_event(id)?)
    }
}

fn reject_blank_title(title: &str) -> ServiceResult<()> {
    if is_blank_title(title) {
        return Err(EventServiceError::Validation(
            BLANK_TITLE_MESSAGE.to_string(),
        ));
    }
    Ok(())
}

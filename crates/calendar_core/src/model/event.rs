//! Event domain model.
//!
//! # Responsibility
//! - Define the single persisted calendar record and its write inputs.
//! - Own field-level validation shared by store and service layers.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another event.
//! - `title` is non-blank and at most `TITLE_MAX_CHARS` characters.
//! - `description` is at most `DESCRIPTION_MAX_CHARS` characters when set.
//! - `date` is fixed at creation; updates only carry title/description.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned event identifier.
pub type EventId = i64;

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

pub(crate) const MIN_YEAR: i32 = 1;
pub(crate) const MAX_YEAR: i32 = 9999;

/// A titled, optionally described occurrence bound to one calendar date.
///
/// Serialized as `{id, title, description, date}` with `date` in
/// `YYYY-MM-DD` form and no time or zone component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Input for creating an event. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Replacement values for an existing event.
///
/// Has no `date` field: an event's date cannot change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChanges {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Field-level validation failure for event writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// Title is empty or whitespace-only.
    BlankTitle,
    TitleTooLong { max: usize, actual: usize },
    DescriptionTooLong { max: usize, actual: usize },
    /// SQLite text functions stop at the first NUL, so it cannot be stored.
    NulCharacter { field: &'static str },
    /// Date cannot be stored as a four-digit `YYYY-MM-DD` value.
    DateOutOfRange(NaiveDate),
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "Title cannot be null, empty or whitespace."),
            Self::TitleTooLong { max, actual } => {
                write!(f, "Title must be at most {max} characters, got {actual}.")
            }
            Self::DescriptionTooLong { max, actual } => {
                write!(f, "Description must be at most {max} characters, got {actual}.")
            }
            Self::NulCharacter { field } => write!(f, "{field} cannot contain NUL characters."),
            Self::DateOutOfRange(date) => {
                write!(
                    f,
                    "Date {date} is outside the supported range of years {MIN_YEAR}-{MAX_YEAR}."
                )
            }
        }
    }
}

impl Error for EventValidationError {}

impl NewEvent {
    pub fn new(title: impl Into<String>, description: Option<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description,
            date,
        }
    }

    /// Checks title, description and date bounds.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())?;
        validate_date(self.date)
    }

    /// Builds the persisted record once the store has assigned `id`.
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
        }
    }
}

impl EventChanges {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }

    pub fn validate(&self) -> Result<(), EventValidationError> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())
    }
}

impl Event {
    /// Re-checks field bounds on a record read back from storage.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())?;
        validate_date(self.date)
    }

    /// Returns a copy with `changes` applied; `id` and `date` are kept.
    pub fn with_changes(&self, changes: EventChanges) -> Event {
        Event {
            id: self.id,
            title: changes.title,
            description: changes.description,
            date: self.date,
        }
    }
}

/// Returns whether `title` would be rejected as blank.
pub fn is_blank_title(title: &str) -> bool {
    title.trim().is_empty()
}

fn validate_title(title: &str) -> Result<(), EventValidationError> {
    if is_blank_title(title) {
        return Err(EventValidationError::BlankTitle);
    }
    reject_nul("Title", title)?;
    let actual = title.chars().count();
    if actual > TITLE_MAX_CHARS {
        return Err(EventValidationError::TitleTooLong {
            max: TITLE_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), EventValidationError> {
    let Some(description) = description else {
        return Ok(());
    };
    reject_nul("Description", description)?;
    let actual = description.chars().count();
    if actual > DESCRIPTION_MAX_CHARS {
        return Err(EventValidationError::DescriptionTooLong {
            max: DESCRIPTION_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

fn reject_nul(field: &'static str, value: &str) -> Result<(), EventValidationError> {
    if value.contains('\0') {
        return Err(EventValidationError::NulCharacter { field });
    }
    Ok(())
}

fn validate_date(date: NaiveDate) -> Result<(), EventValidationError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Ok(())
    } else {
        Err(EventValidationError::DateOutOfRange(date))
    }
}

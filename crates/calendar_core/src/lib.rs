//! Core domain logic for the calendar service.
//! This crate is the single source of truth for event invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::event::{
    Event, EventChanges, EventId, EventValidationError, NewEvent, DESCRIPTION_MAX_CHARS,
    TITLE_MAX_CHARS,
};
pub use model::month::CalendarMonth;
pub use repo::event_repo::{EventRepository, RepoError, RepoResult, SqliteEventRepository};
pub use service::event_service::{
    EventListing, EventQuery, EventService, EventServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

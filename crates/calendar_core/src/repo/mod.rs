//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for events.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate field bounds before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod event_repo;

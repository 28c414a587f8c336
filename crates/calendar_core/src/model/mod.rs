//! Calendar domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every persisted event is identified by a store-assigned `EventId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod event;
pub mod month;

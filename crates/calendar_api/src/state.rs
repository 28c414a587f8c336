//! Shared application state and per-request store access.
//!
//! # Invariants
//! - No connection is shared between requests; each unit of work opens its
//!   own connection and drops it before the response is built.
//! - Blocking SQLite work never runs on the async executor threads.

use crate::routes::ApiError;
use calendar_core::db::{open_db, DbResult};
use calendar_core::{EventService, ServiceResult, SqliteEventRepository};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Handle to the SQLite file backing the event store.
#[derive(Debug, Clone)]
pub struct EventDatabase {
    path: Arc<PathBuf>,
}

impl EventDatabase {
    /// Opens the database once so migrations are applied before serving.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        drop(open_db(&path)?);
        Ok(Self {
            path: Arc::new(path),
        })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Runs one unit of work against a fresh connection on the blocking pool.
    ///
    /// `operation` names the unit in log events.
    pub async fn with_service<T, F>(&self, operation: &'static str, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&EventService<SqliteEventRepository<'_>>) -> ServiceResult<T> + Send + 'static,
    {
        let path = Arc::clone(&self.path);
        let started_at = Instant::now();

        let result = tokio::task::spawn_blocking(move || -> Result<T, ApiError> {
            let conn = open_db(path.as_path())
                .map_err(|err| ApiError::internal(format!("database open failed: {err}")))?;
            let service = EventService::new(SqliteEventRepository::new(&conn));
            f(&service).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::internal(format!("store task failed: {err}")))?;

        match &result {
            Ok(_) => debug!(
                "event=store_op module=api status=ok op={} duration_ms={}",
                operation,
                started_at.elapsed().as_millis()
            ),
            Err(err) if !err.is_internal() => warn!(
                "event=store_op module=api status=rejected op={} duration_ms={} error={}",
                operation,
                started_at.elapsed().as_millis(),
                err
            ),
            // Internal failures are logged when turned into a response.
            Err(_) => {}
        }

        result
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: EventDatabase,
}

impl AppState {
    pub fn new(db: EventDatabase) -> Self {
        Self { db }
    }
}

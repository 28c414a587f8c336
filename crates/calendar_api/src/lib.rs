//! HTTP surface for the calendar event store.
//!
//! Endpoints:
//! - `POST /events` - Create an event
//! - `GET /events?date=YYYY-MM-DD` - Events on one date
//! - `GET /events?year=Y&month=M` - Dates with events in a month
//! - `PUT /events/{id}` - Update title/description
//! - `DELETE /events/{id}` - Delete an event
//! - `GET /health` - Liveness and version

pub mod config;
pub mod routes;
pub mod state;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

pub use config::{ConfigError, ServerConfig};
pub use routes::{ApiError, ErrorResponse};
pub use state::{AppState, EventDatabase};

/// Health check body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Create the Axum router with all endpoints
pub fn create_router(state: AppState) -> Router {
    // The browser client is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .merge(routes::events::router())
        .with_state(state)
        .layer(cors)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: calendar_core::core_version(),
    })
}

//! Event endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    routing::{get, put},
    Json, Router,
};
use calendar_core::{Event, EventChanges, EventId, EventListing, EventQuery, NewEvent};
use chrono::NaiveDate;
use log::info;
use serde::Deserialize;

use crate::routes::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", put(update_event).delete(delete_event))
}

/// Request body for creating an event
///
/// A missing or null `title` is treated as blank so it gets the same
/// validation message as `""`.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl From<CreateEventRequest> for NewEvent {
    fn from(req: CreateEventRequest) -> Self {
        NewEvent::new(req.title.unwrap_or_default(), req.description, req.date)
    }
}

/// Request body for updating an event. Any `date` field is ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<UpdateEventRequest> for EventChanges {
    fn from(req: UpdateEventRequest) -> Self {
        EventChanges::new(req.title.unwrap_or_default(), req.description)
    }
}

/// Query parameters for `GET /events`
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsParams {
    pub date: Option<NaiveDate>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// POST /events - Create an event
async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Event>), ApiError> {
    let Json(req) = payload?;
    let new_event = NewEvent::from(req);

    let created = state
        .db
        .with_service("create_event", move |service| service.create_event(new_event))
        .await?;

    info!(
        "event=event_created module=api status=ok id={} date={}",
        created.id, created.date
    );

    // The locator is informational; there is no fetch-by-id route.
    let location = format!("/events/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// GET /events?date=YYYY-MM-DD or GET /events?year=Y&month=M
///
/// Date mode returns events; month mode returns distinct dates.
async fn list_events(
    State(state): State<AppState>,
    params: Result<Query<ListEventsParams>, QueryRejection>,
) -> Result<Json<EventListing>, ApiError> {
    let Query(params) = params?;
    let query = EventQuery::from_params(params.date, params.month, params.year)?;

    let listing = state
        .db
        .with_service("list_events", move |service| service.list_events(query))
        .await?;

    Ok(Json(listing))
}

/// PUT /events/{id} - Replace title and description
async fn update_event(
    State(state): State<AppState>,
    id: Result<Path<EventId>, PathRejection>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<Json<Event>, ApiError> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let changes = EventChanges::from(req);

    let updated = state
        .db
        .with_service("update_event", move |service| {
            service.update_event(id, changes)
        })
        .await?;

    info!("event=event_updated module=api status=ok id={}", updated.id);
    Ok(Json(updated))
}

/// DELETE /events/{id} - Remove an event
async fn delete_event(
    State(state): State<AppState>,
    id: Result<Path<EventId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;

    state
        .db
        .with_service("delete_event", move |service| service.delete_event(id))
        .await?;

    info!("event=event_deleted module=api status=ok id={}", id);
    Ok(StatusCode::OK)
}

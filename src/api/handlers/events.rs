//! Event CRUD handlers: create, list, get, update, delete.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value};

use crate::api::dto::{EventListResponse, ListEventsParams, PaginationMeta};
use crate::app_state::AppState;
use crate::domain::{DraftDocument, Event, EventDraft, EventId};
use crate::error::{ErrorResponse, EventError};

/// Request bodies are read as plain JSON objects so that a field with the
/// wrong type becomes a field-level validation failure, not a parse error.
type DocumentBody = Result<Json<Map<String, Value>>, JsonRejection>;

fn body(body: DocumentBody) -> Result<DraftDocument, EventError> {
    body.map(|Json(doc)| DraftDocument::from_map(&doc))
        .map_err(|e| EventError::MalformedBody(e.body_text()))
}

/// `POST /events`: Publish a new event.
///
/// # Errors
///
/// Returns [`EventError`] on schema violations or a duplicate `eventId`.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create an event",
    description = "Validates the submitted record against the Event schema and stores it. Strings are trimmed and `team` defaults to 0. A field of the wrong JSON type is reported as a validation failure on that field.",
    request_body = EventDraft,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Duplicate eventId", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    draft: DocumentBody,
) -> Result<impl IntoResponse, EventError> {
    let event = state.event_service.create(body(draft)?).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /events`: List events with filters and pagination.
///
/// # Errors
///
/// Returns [`EventError::InvalidQuery`] on bad filters.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "Returns events ordered by date, optionally filtered by category and an inclusive date range.",
    params(ListEventsParams),
    responses(
        (status = 200, description = "Paginated event list", body = EventListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    params: Result<Query<ListEventsParams>, QueryRejection>,
) -> Result<impl IntoResponse, EventError> {
    let Query(params) = params.map_err(|e| EventError::InvalidQuery(e.body_text()))?;
    let query = params.to_query()?;
    let events = state.event_service.list(&query).await?;

    let total = u32::try_from(events.len()).unwrap_or(u32::MAX);
    let pagination = PaginationMeta::new(params.page, params.per_page, total);
    let data: Vec<Event> = events
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.per_page as usize)
        .collect();

    Ok(Json(EventListResponse { data, pagination }))
}

/// `GET /events/{event_id}`: Get one event.
///
/// # Errors
///
/// Returns [`EventError::NotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{event_id}",
    tag = "Events",
    summary = "Get an event",
    params(
        ("event_id" = String, Path, description = "Event ID"),
    ),
    responses(
        (status = 200, description = "Event", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, EventError> {
    let event_id = EventId::parse(&event_id)?;
    let event = state.event_service.get(&event_id).await?;
    Ok(Json(event))
}

/// `PATCH /events/{event_id}`: Update some fields of an event.
///
/// # Errors
///
/// Returns [`EventError`] if the event does not exist, the merged record
/// violates the schema, or a rename collides with another event.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{event_id}",
    tag = "Events",
    summary = "Update an event",
    description = "Fields present in the body replace the stored values. The merged record is validated as a whole; `createdAt` is kept and `updatedAt` refreshed.",
    params(
        ("event_id" = String, Path, description = "Event ID"),
    ),
    request_body = EventDraft,
    responses(
        (status = 200, description = "Updated event", body = Event),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Duplicate eventId", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    patch: DocumentBody,
) -> Result<impl IntoResponse, EventError> {
    let event_id = EventId::parse(&event_id)?;
    let event = state.event_service.update(&event_id, body(patch)?).await?;
    Ok(Json(event))
}

/// `DELETE /events/{event_id}`: Remove an event.
///
/// # Errors
///
/// Returns [`EventError::NotFound`] if the event does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{event_id}",
    tag = "Events",
    summary = "Delete an event",
    params(
        ("event_id" = String, Path, description = "Event ID"),
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, EventError> {
    let event_id = EventId::parse(&event_id)?;
    state.event_service.delete(&event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route(
            "/events/{event_id}",
            get(get_event).patch(update_event).delete(delete_event),
        )
}

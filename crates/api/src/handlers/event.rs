//! Handlers for the `/events` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use eventease_core::error::CoreError;
use eventease_core::lifecycle::GuardedEntity;
use eventease_core::types::DbId;
use eventease_db::models::event::{CreateEvent, UpdateEvent};
use eventease_db::repositories::EventRepo;

use super::validate_input;
use crate::error::{AppError, AppResult};
use crate::response::{CanDeleteResponse, DataResponse};
use crate::state::AppState;

/// GET /api/v1/events
///
/// List events, each with its venue, ordered by event date.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let events = EventRepo::list_with_venue(&state.pool).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/events
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let event = EventRepo::create(&state.pool, &input).await?;
    tracing::info!(event_id = event.id, venue_id = event.venue_id, "Event created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::find_by_id_with_venue(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }))?;
    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/events/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let event = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }))?;
    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/events/{id}
///
/// Refused with 409 while any booking references the event.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    EventRepo::delete_if_unreferenced(&state.pool, id)
        .await?
        .into_result(GuardedEntity::Event, id)?;
    tracing::info!(event_id = id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/events/{id}/can-delete
pub async fn can_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if EventRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }));
    }
    let can_delete = EventRepo::can_delete(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: CanDeleteResponse { can_delete },
    }))
}

//! Handlers for the `/bookings` resource.
//!
//! Creation runs the double-booking check; edits and deletes do not.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use eventease_core::error::CoreError;
use eventease_core::types::DbId;
use eventease_db::models::booking::{BookingOutcome, CreateBooking, UpdateBooking};
use eventease_db::repositories::BookingRepo;

use crate::error::{AppError, AppResult};
use crate::query::SearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/bookings?search=
///
/// List bookings with their event and venue. `search` filters on event
/// name or venue name, case-insensitively.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let bookings = BookingRepo::list_details(&state.pool, params.search.as_deref()).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// POST /api/v1/bookings
///
/// A missing event yields 400 and a venue already booked on the same date
/// yields 409; both echo the submission back under `input`.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateBooking>,
) -> AppResult<impl IntoResponse> {
    let outcome =
        BookingRepo::create_validated(&state.pool, &input, state.config.booking_conflict_basis)
            .await?;

    match outcome {
        BookingOutcome::Created(booking) => {
            tracing::info!(
                booking_id = booking.id,
                event_id = booking.event_id,
                venue_id = booking.venue_id,
                "Booking created"
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
        }
        BookingOutcome::Rejected(rejection) => Err(AppError::rejected(rejection, &input)),
    }
}

/// GET /api/v1/bookings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = BookingRepo::find_detail_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    Ok(Json(DataResponse { data: booking }))
}

/// PUT /api/v1/bookings/{id}
///
/// Replace a booking's fields. Not re-checked for scheduling conflicts.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBooking>,
) -> AppResult<impl IntoResponse> {
    let booking = BookingRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))?;
    Ok(Json(DataResponse { data: booking }))
}

/// DELETE /api/v1/bookings/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if BookingRepo::delete(&state.pool, id).await? {
        tracing::info!(booking_id = id, "Booking deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id,
        }))
    }
}

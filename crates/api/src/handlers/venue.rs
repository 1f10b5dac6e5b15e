//! Handlers for the `/venues` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use eventease_core::error::CoreError;
use eventease_core::lifecycle::GuardedEntity;
use eventease_core::storage::{upload_image, ImageUpload};
use eventease_core::types::DbId;
use eventease_db::models::venue::{CreateVenue, UpdateVenue, Venue};
use eventease_db::repositories::VenueRepo;
use sqlx::{Postgres, Transaction};

use super::validate_input;
use crate::error::{AppError, AppResult};
use crate::response::{CanDeleteResponse, DataResponse};
use crate::state::AppState;

/// Request body limit for the multipart edit form (10 MiB).
pub const MAX_IMAGE_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// GET /api/v1/venues
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let venues = VenueRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: venues }))
}

/// POST /api/v1/venues
///
/// Create a venue. Creation never uploads an image; a missing `image_url`
/// is stored as the placeholder.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateVenue>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let venue = VenueRepo::create(&state.pool, &input).await?;
    tracing::info!(venue_id = venue.id, "Venue created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: venue })))
}

/// GET /api/v1/venues/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let venue = VenueRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Venue",
            id,
        }))?;
    Ok(Json(DataResponse { data: venue }))
}

/// PUT /api/v1/venues/{id}
///
/// Replace a venue's fields from a JSON body.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVenue>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let venue = VenueRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Venue",
            id,
        }))?;
    Ok(Json(DataResponse { data: venue }))
}

/// PUT /api/v1/venues/{id}/form
///
/// Replace a venue's fields from a multipart form. Text fields are
/// `venue_name`, `location`, `capacity` and `image_url` (the current URL);
/// a non-empty `image_file` part is uploaded to the blob store and its URL
/// replaces `image_url`.
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut input = UpdateVenue {
        venue_name: String::new(),
        location: String::new(),
        capacity: 0,
        image_url: None,
    };
    let mut upload: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image_file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                upload = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "venue_name" | "location" | "capacity" | "image_url" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                match name.as_str() {
                    "venue_name" => input.venue_name = text,
                    "location" => input.location = text,
                    // Unparseable capacity is reported by the range rule.
                    "capacity" => input.capacity = text.trim().parse().unwrap_or(0),
                    _ => input.image_url = Some(text),
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    validate_input(&input)?;

    // Lock the venue row so it cannot be deleted while the image uploads.
    let mut tx = state.pool.begin().await?;
    if VenueRepo::find_for_update(&mut *tx, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Venue",
            id,
        }));
    }

    let uploaded = upload_image(state.blob_store.as_ref(), upload).await?;
    if let Some(url) = &uploaded {
        tracing::info!(venue_id = id, %url, "Venue image uploaded");
        input.image_url = Some(url.clone());
    }

    match save_venue(tx, id, &input).await {
        Ok(venue) => Ok(Json(DataResponse { data: venue })),
        Err(err) => {
            if let Some(url) = uploaded {
                tracing::warn!(
                    venue_id = id,
                    %url,
                    error = %err,
                    "Venue update failed, uploaded image is orphaned"
                );
            }
            Err(err)
        }
    }
}

/// Apply the edit inside the transaction holding the venue lock.
async fn save_venue(
    mut tx: Transaction<'_, Postgres>,
    id: DbId,
    input: &UpdateVenue,
) -> AppResult<Venue> {
    let venue = VenueRepo::update(&mut *tx, id, input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Venue",
            id,
        }))?;
    tx.commit().await?;
    Ok(venue)
}

/// DELETE /api/v1/venues/{id}
///
/// Refused with 409 while any booking references the venue.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    VenueRepo::delete_if_unreferenced(&state.pool, id)
        .await?
        .into_result(GuardedEntity::Venue, id)?;
    tracing::info!(venue_id = id, "Venue deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/venues/{id}/can-delete
pub async fn can_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if VenueRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Venue",
            id,
        }));
    }
    let can_delete = VenueRepo::can_delete(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: CanDeleteResponse { can_delete },
    }))
}

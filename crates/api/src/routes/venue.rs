//! Route definitions for venues.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, put};
use axum::Router;

use crate::handlers::venue;
use crate::state::AppState;

/// Routes mounted at `/venues`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// PUT    /{id}/form        -> update_form (multipart)
/// GET    /{id}/can-delete  -> can_delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(venue::list).post(venue::create))
        .route(
            "/{id}",
            get(venue::get_by_id)
                .put(venue::update)
                .delete(venue::delete),
        )
        .route(
            "/{id}/form",
            put(venue::update_form).layer(DefaultBodyLimit::max(venue::MAX_IMAGE_UPLOAD_BYTES)),
        )
        .route("/{id}/can-delete", get(venue::can_delete))
}

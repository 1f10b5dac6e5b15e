//! Route definitions for bookings.

use axum::routing::get;
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /?search=   -> list
/// POST   /           -> create
/// GET    /{id}       -> get_by_id
/// PUT    /{id}       -> update
/// DELETE /{id}       -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(booking::list).post(booking::create))
        .route(
            "/{id}",
            get(booking::get_by_id)
                .put(booking::update)
                .delete(booking::delete),
        )
}

pub mod blob;
pub mod booking;
pub mod event;
pub mod health;
pub mod venue;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /venues                          list, create
/// /venues/{id}                     get, update, delete
/// /venues/{id}/form                update with image upload (multipart)
/// /venues/{id}/can-delete          delete guard probe
///
/// /events                          list (with venue), create
/// /events/{id}                     get (with venue), update, delete
/// /events/{id}/can-delete          delete guard probe
///
/// /bookings                        list (?search=), create
/// /bookings/{id}                   get (with event and venue), update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/venues", venue::router())
        .nest("/events", event::router())
        .nest("/bookings", booking::router())
}

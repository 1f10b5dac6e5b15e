use axum::routing::get;
use axum::Router;
use eventease_cloud::filesystem::DEFAULT_PUBLIC_PATH;

use crate::handlers::blob;
use crate::state::AppState;

/// Mount the local image route (root level, NOT under `/api/v1`).
///
/// ```text
/// /blobs/{container}/{key}         stored image with its upload content type
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        &format!("{DEFAULT_PUBLIC_PATH}/{{container}}/{{key}}"),
        get(blob::get_object),
    )
}

//! Serves venue images stored by the filesystem blob backend.

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use eventease_cloud::FilesystemBlobStore;
use eventease_core::storage::FALLBACK_CONTENT_TYPE;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /blobs/{container}/{key}
///
/// Returns the stored bytes with the content type recorded at upload.
pub async fn get_object(
    State(state): State<AppState>,
    Path((container, key)): Path<(String, String)>,
) -> AppResult<Response> {
    let blob = &state.config.blob;
    if container != blob.container {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let store = FilesystemBlobStore::new(&blob.root, &blob.container, None);
    let Some(object) = store.read_object(&key).await? else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let content_type = HeaderValue::from_str(&object.content_type)
        .unwrap_or(HeaderValue::from_static(FALLBACK_CONTENT_TYPE));
    Ok(([(CONTENT_TYPE, content_type)], object.bytes).into_response())
}

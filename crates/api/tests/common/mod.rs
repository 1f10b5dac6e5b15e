#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use eventease_api::config::ServerConfig;
use eventease_api::router::build_app_router;
use eventease_api::state::AppState;
use eventease_cloud::{BlobStoreConfig, FilesystemBlobStore};
use eventease_core::booking::ConflictBasis;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Multipart boundary used by [`put_multipart`].
pub const BOUNDARY: &str = "eventease-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout, and a filesystem blob store rooted at
/// `blob_root`.
pub fn test_config(blob_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        booking_conflict_basis: ConflictBasis::EventDate,
        blob: BlobStoreConfig {
            root: blob_root.to_path_buf(),
            ..BlobStoreConfig::default()
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a blob root under the system temp directory.
pub fn build_test_app(pool: PgPool) -> Router {
    let root = std::env::temp_dir().join("eventease-api-tests");
    build_test_app_with_config(pool, test_config(&root))
}

/// Build the application router from an explicit configuration.
///
/// Uses the same [`build_app_router`] as `main.rs`, so integration tests
/// exercise the production middleware stack.
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let blob_store = Arc::new(FilesystemBlobStore::new(
        &config.blob.root,
        &config.blob.container,
        config.blob.public_base_url.clone(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        blob_store,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PUT, uri, body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// A part of a multipart form: `(name, file, value)` where `file` is
/// `Some((file_name, content_type))` for file parts.
pub struct Part<'a> {
    pub name: &'a str,
    pub file: Option<(&'a str, &'a str)>,
    pub value: &'a [u8],
}

/// Encode `parts` as a `multipart/form-data` body delimited by [`BOUNDARY`].
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.file {
            Some((file_name, content_type)) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n",
                        part.name
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                        part.name
                    )
                    .as_bytes(),
                );
            }
        }
        body.extend_from_slice(part.value);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn put_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a venue through the API and return its id.
pub async fn create_venue(pool: &PgPool, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/venues",
        serde_json::json!({
            "venue_name": name,
            "location": "Cape Town",
            "capacity": 100,
        }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create an event through the API and return its id.
pub async fn create_event(pool: &PgPool, venue_id: i64, name: &str, date: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/events",
        serde_json::json!({
            "event_name": name,
            "event_date": date,
            "venue_id": venue_id,
        }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Submit a booking through the API.
pub async fn create_booking(pool: &PgPool, event_id: i64, venue_id: i64) -> Response {
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/bookings",
        serde_json::json!({
            "event_id": event_id,
            "venue_id": venue_id,
            "booking_date": "2025-05-01T09:00:00Z",
        }),
    )
    .await
}

use std::sync::Arc;

use eventease_core::storage::BlobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: eventease_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Venue image storage.
    pub blob_store: Arc<dyn BlobStore>,
}

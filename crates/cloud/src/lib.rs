//! Blob store backends for venue images.
//!
//! Implements [`eventease_core::storage::BlobStore`] for Amazon S3 (and
//! S3-compatible services such as MinIO) and for a local directory.
//! [`build_blob_store`] picks the backend from [`BlobStoreConfig`].

use std::sync::Arc;

use eventease_core::storage::BlobStore;

pub mod config;
pub mod filesystem;
pub mod s3;

pub use config::{BlobBackend, BlobStoreConfig};
pub use filesystem::{FilesystemBlobStore, StoredObject};
pub use s3::S3BlobStore;

/// Construct the configured blob store.
pub async fn build_blob_store(config: &BlobStoreConfig) -> Arc<dyn BlobStore> {
    let store: Arc<dyn BlobStore> = match config.backend {
        BlobBackend::Filesystem => Arc::new(FilesystemBlobStore::new(
            &config.root,
            &config.container,
            config.public_base_url.clone(),
        )),
        BlobBackend::S3 => Arc::new(S3BlobStore::from_config(config).await),
    };
    tracing::info!(
        backend = %config.backend,
        container = %config.container,
        "Blob store configured"
    );
    store
}

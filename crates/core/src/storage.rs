//! Blob storage abstraction and the venue image upload flow.
//!
//! Concrete backends (S3, local filesystem) live in `eventease-cloud`; this
//! module only defines the contract and the upload sequence run against it.

use std::path::Path;

use async_trait::async_trait;
use uuid::Uuid;

/// Errors raised by a blob store backend.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blob backend error: {0}")]
    Backend(String),
}

/// A container of publicly readable objects.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create the container if it does not exist yet. Idempotent.
    async fn ensure_container(&self) -> Result<(), BlobError>;

    /// Allow anonymous read access to objects in the container.
    async fn set_public_read(&self) -> Result<(), BlobError>;

    /// Store `bytes` under `key` with the given content type and return the
    /// object's public URL.
    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError>;
}

/// An uploaded image file as received from a form submission.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Content type used when the client did not declare one.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Build a unique object name: a fresh UUID plus the original extension.
///
/// `"hall.PNG"` becomes `"<uuid>.PNG"`; a name without an extension, or
/// with a trailing dot, yields the bare UUID.
pub fn blob_name_for(file_name: &str) -> String {
    let id = Uuid::new_v4();
    match Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
    {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

/// Upload a venue image and return its public URL.
///
/// Returns `Ok(None)` without touching the store when the upload is absent
/// or empty. Otherwise ensures the container exists, sets public read
/// access, and stores the object with the upload's content type.
pub async fn upload_image(
    store: &dyn BlobStore,
    upload: Option<ImageUpload>,
) -> Result<Option<String>, BlobError> {
    let Some(upload) = upload.filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    store.ensure_container().await?;
    store.set_public_read().await?;

    let key = blob_name_for(&upload.file_name);
    let content_type = if upload.content_type.trim().is_empty() {
        FALLBACK_CONTENT_TYPE
    } else {
        upload.content_type.as_str()
    };

    let url = store.put_object(&key, upload.bytes, content_type).await?;
    Ok(Some(url))
}

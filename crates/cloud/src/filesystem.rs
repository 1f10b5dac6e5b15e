//! Local directory blob store.
//!
//! Objects are written to `{root}/{container}/{key}` with the declared
//! content type kept in a `{key}.meta` sidecar. Their public URL is
//! `{public_base_url}/{container}/{key}`; the API serves objects under
//! [`DEFAULT_PUBLIC_PATH`] via [`FilesystemBlobStore::read_object`] when no
//! external base URL is configured.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use eventease_core::storage::{BlobError, BlobStore, FALLBACK_CONTENT_TYPE};
use tokio::fs;
use tracing::debug;

/// URL path the API mounts the filesystem root under.
pub const DEFAULT_PUBLIC_PATH: &str = "/blobs";

/// Suffix of the sidecar file holding an object's content type.
const META_SUFFIX: &str = ".meta";

/// Suffix of the in-progress file during an atomic write.
const TEMP_SUFFIX: &str = ".tmp";

/// An object read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Blob store backed by a local directory.
pub struct FilesystemBlobStore {
    root: PathBuf,
    container: String,
    public_base_url: String,
}

impl FilesystemBlobStore {
    pub fn new(
        root: impl AsRef<Path>,
        container: impl Into<String>,
        public_base_url: Option<String>,
    ) -> Self {
        let public_base_url = public_base_url
            .unwrap_or_else(|| DEFAULT_PUBLIC_PATH.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            root: root.as_ref().to_path_buf(),
            container: container.into(),
            public_base_url,
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    fn container_dir(&self) -> PathBuf {
        self.root.join(&self.container)
    }

    /// Reject keys that would escape the container directory or collide
    /// with sidecar and temp files.
    fn object_path(&self, key: &str) -> Result<PathBuf, BlobError> {
        if key.is_empty()
            || key.contains(['/', '\\'])
            || key.starts_with('.')
            || key.ends_with(META_SUFFIX)
            || key.ends_with(TEMP_SUFFIX)
        {
            return Err(BlobError::Backend(format!("Invalid object key '{key}'")));
        }
        Ok(self.container_dir().join(key))
    }

    fn sidecar_path(&self, key: &str) -> PathBuf {
        self.container_dir().join(format!("{key}{META_SUFFIX}"))
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.container, key)
    }

    /// Read an object and its content type. Returns `Ok(None)` when the key
    /// is invalid or no such object exists. An object without a sidecar is
    /// reported as [`FALLBACK_CONTENT_TYPE`].
    pub async fn read_object(&self, key: &str) -> Result<Option<StoredObject>, BlobError> {
        let Ok(path) = self.object_path(key) else {
            return Ok(None);
        };

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let content_type = match fs::read_to_string(self.sidecar_path(key)).await {
            Ok(ct) if !ct.trim().is_empty() => ct.trim().to_string(),
            Ok(_) => FALLBACK_CONTENT_TYPE.to_string(),
            Err(e) if e.kind() == ErrorKind::NotFound => FALLBACK_CONTENT_TYPE.to_string(),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(StoredObject {
            bytes,
            content_type,
        }))
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn ensure_container(&self) -> Result<(), BlobError> {
        fs::create_dir_all(self.container_dir()).await?;
        Ok(())
    }

    /// Files on disk are served as-is; there is no access policy to set.
    async fn set_public_read(&self) -> Result<(), BlobError> {
        Ok(())
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError> {
        let path = self.object_path(key)?;

        // Sidecar first, so a visible object always has its content type.
        fs::write(self.sidecar_path(key), content_type).await?;

        // Write atomically using temp file + rename.
        let temp_path = self.container_dir().join(format!("{key}{TEMP_SUFFIX}"));
        fs::write(&temp_path, &bytes).await?;
        fs::rename(&temp_path, &path).await?;

        debug!(key, size = bytes.len(), content_type, "Stored blob on disk");
        Ok(self.url_for(key))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use eventease_core::storage::{upload_image, ImageUpload};
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_put_object_writes_file_and_returns_url() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemBlobStore::new(dir.path(), "venueimages", None);

        store.ensure_container().await.unwrap();
        let url = store
            .put_object("abc.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(url, "/blobs/venueimages/abc.png");
        let written = std::fs::read(dir.path().join("venueimages/abc.png")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_public_base_url_trailing_slash_trimmed() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemBlobStore::new(
            dir.path(),
            "venueimages",
            Some("https://cdn.example.com/".into()),
        );
        assert_eq!(
            store.url_for("x.jpg"),
            "https://cdn.example.com/venueimages/x.jpg"
        );
    }

    #[tokio::test]
    async fn test_ensure_container_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemBlobStore::new(dir.path(), "venueimages", None);
        store.ensure_container().await.unwrap();
        store.ensure_container().await.unwrap();
        assert!(dir.path().join("venueimages").is_dir());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal_keys() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemBlobStore::new(dir.path(), "venueimages", None);
        store.ensure_container().await.unwrap();

        let result = store.put_object("../escape.png", vec![0], "image/png").await;
        assert_matches!(result, Err(BlobError::Backend(_)));
    }

    #[tokio::test]
    async fn test_upload_image_creates_container() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemBlobStore::new(dir.path(), "venueimages", None);

        let url = upload_image(
            &store,
            Some(ImageUpload {
                file_name: "hall.jpg".into(),
                content_type: "image/jpeg".into(),
                bytes: vec![0xFF, 0xD8],
            }),
        )
        .await
        .unwrap()
        .expect("url returned");

        let key = url.rsplit('/').next().unwrap();
        assert!(key.ends_with(".jpg"));
        assert!(dir.path().join("venueimages").join(key).is_file());
    }

    #[tokio::test]
    async fn test_read_object_returns_declared_content_type() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemBlobStore::new(dir.path(), "venueimages", None);
        store.ensure_container().await.unwrap();

        // No extension to guess from.
        store
            .put_object("photo", vec![7, 7], "image/png")
            .await
            .unwrap();

        let object = store.read_object("photo").await.unwrap().expect("object");
        assert_eq!(object.bytes, vec![7, 7]);
        assert_eq!(object.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_read_object_without_sidecar_falls_back() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemBlobStore::new(dir.path(), "venueimages", None);
        store.ensure_container().await.unwrap();
        std::fs::write(dir.path().join("venueimages/legacy.bin"), [1]).unwrap();

        let object = store.read_object("legacy.bin").await.unwrap().expect("object");
        assert_eq!(object.content_type, FALLBACK_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_read_object_missing_or_reserved_key() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemBlobStore::new(dir.path(), "venueimages", None);
        store.ensure_container().await.unwrap();
        store.put_object("a.png", vec![1], "image/png").await.unwrap();

        assert!(store.read_object("missing.png").await.unwrap().is_none());
        assert!(store.read_object("a.png.meta").await.unwrap().is_none());
        assert!(store.read_object("../a.png").await.unwrap().is_none());
    }
}

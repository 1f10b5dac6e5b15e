use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Container (bucket) that venue images are written to.
pub const DEFAULT_CONTAINER: &str = "venueimages";

/// Directory used by the filesystem backend when `BLOB_ROOT` is unset.
pub const DEFAULT_FILESYSTEM_ROOT: &str = "storage/blobs";

/// Which blob store implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlobBackend {
    #[default]
    Filesystem,
    S3,
}

impl fmt::Display for BlobBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobBackend::Filesystem => f.write_str("filesystem"),
            BlobBackend::S3 => f.write_str("s3"),
        }
    }
}

impl FromStr for BlobBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filesystem" | "fs" | "local" => Ok(BlobBackend::Filesystem),
            "s3" => Ok(BlobBackend::S3),
            other => Err(format!(
                "Unknown blob backend '{other}'. Must be one of: filesystem, s3"
            )),
        }
    }
}

/// Blob store configuration loaded from environment variables.
///
/// Credentials for the S3 backend come from the standard AWS provider
/// chain (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, profiles, IAM).
#[derive(Debug, Clone)]
pub struct BlobStoreConfig {
    pub backend: BlobBackend,
    /// Container (S3 bucket or sub-directory of `root`) holding the images.
    pub container: String,
    /// Base URL that public object URLs are built from. The container name
    /// and object key are appended to it.
    pub public_base_url: Option<String>,
    /// Filesystem backend root directory.
    pub root: PathBuf,
    /// Custom S3 endpoint for S3-compatible services.
    pub s3_endpoint: Option<String>,
    pub s3_region: Option<String>,
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            backend: BlobBackend::default(),
            container: DEFAULT_CONTAINER.to_string(),
            public_base_url: None,
            root: PathBuf::from(DEFAULT_FILESYSTEM_ROOT),
            s3_endpoint: None,
            s3_region: None,
        }
    }
}

impl BlobStoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default          |
    /// |------------------------|------------------|
    /// | `BLOB_BACKEND`         | `filesystem`     |
    /// | `BLOB_CONTAINER`       | `venueimages`    |
    /// | `BLOB_PUBLIC_BASE_URL` | (none)           |
    /// | `BLOB_ROOT`            | `storage/blobs`  |
    /// | `S3_ENDPOINT`          | (none)           |
    /// | `S3_REGION`            | (provider chain) |
    pub fn from_env() -> Self {
        let backend: BlobBackend = std::env::var("BLOB_BACKEND")
            .unwrap_or_else(|_| "filesystem".into())
            .parse()
            .expect("BLOB_BACKEND must be 'filesystem' or 's3'");

        let container = non_empty_var("BLOB_CONTAINER").unwrap_or_else(|| DEFAULT_CONTAINER.into());
        let root = non_empty_var("BLOB_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILESYSTEM_ROOT));

        Self {
            backend,
            container,
            public_base_url: non_empty_var("BLOB_PUBLIC_BASE_URL"),
            root,
            s3_endpoint: non_empty_var("S3_ENDPOINT"),
            s3_region: non_empty_var("S3_REGION"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

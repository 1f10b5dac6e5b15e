//! Amazon S3 blob store.
//!
//! Stores venue images as objects in a single bucket:
//! ```text
//! s3://{bucket}/{key}
//! ```
//! The bucket is created on first use. New AWS buckets block public
//! policies, so the bucket's Block Public Access settings are relaxed before
//! a policy allowing anonymous `s3:GetObject` is attached. Public ACLs stay
//! blocked.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, PublicAccessBlockConfiguration,
};
use aws_sdk_s3::Client;
use eventease_core::storage::{BlobError, BlobStore};
use tracing::{debug, info};

use crate::config::BlobStoreConfig;

/// Region assumed when neither the config nor the provider chain sets one.
const DEFAULT_REGION: &str = "us-east-1";

/// The bucket operations the store needs.
#[async_trait]
pub(crate) trait BucketApi: Send + Sync {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, BlobError>;

    /// Create `bucket`, with a location constraint when `location` is set.
    /// A bucket already owned by the caller counts as created.
    async fn create_bucket(&self, bucket: &str, location: Option<&str>) -> Result<(), BlobError>;

    /// Allow bucket policies to grant public access. Public ACLs stay blocked.
    async fn allow_public_policies(&self, bucket: &str) -> Result<(), BlobError>;

    async fn put_bucket_policy(&self, bucket: &str, policy: String) -> Result<(), BlobError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError>;
}

#[async_trait]
impl BucketApi for Client {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, BlobError> {
        match self.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(backend_error("head_bucket", e)),
        }
    }

    async fn create_bucket(&self, bucket: &str, location: Option<&str>) -> Result<(), BlobError> {
        let mut request = self.create_bucket().bucket(bucket);
        if let Some(location) = location {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(location))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => Ok(()),
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_bucket_already_owned_by_you()) =>
            {
                Ok(())
            }
            Err(e) => Err(backend_error("create_bucket", e)),
        }
    }

    async fn allow_public_policies(&self, bucket: &str) -> Result<(), BlobError> {
        let settings = PublicAccessBlockConfiguration::builder()
            .block_public_acls(true)
            .ignore_public_acls(true)
            .block_public_policy(false)
            .restrict_public_buckets(false)
            .build();
        self.put_public_access_block()
            .bucket(bucket)
            .public_access_block_configuration(settings)
            .send()
            .await
            .map_err(|e| backend_error("put_public_access_block", e))?;
        Ok(())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: String) -> Result<(), BlobError> {
        self.put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(|e| backend_error("put_bucket_policy", e))?;
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BlobError> {
        self.put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| backend_error("put_object", e))?;
        Ok(())
    }
}

/// S3-based blob store.
pub struct S3BlobStore {
    api: Box<dyn BucketApi>,
    bucket: String,
    region: String,
    endpoint: Option<String>,
    public_base_url: Option<String>,
}

impl S3BlobStore {
    /// Create a store from configuration.
    ///
    /// Uses default credentials from the environment. A custom endpoint
    /// switches to path-style addressing, which MinIO and most
    /// S3-compatible services require.
    pub async fn from_config(config: &BlobStoreConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.s3_region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let region = sdk_config
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.s3_endpoint {
            s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
        }

        Self::with_api(Client::from_conf(s3_config.build()), config, region)
    }

    pub(crate) fn with_api(
        api: impl BucketApi + 'static,
        config: &BlobStoreConfig,
        region: String,
    ) -> Self {
        Self {
            api: Box::new(api),
            bucket: config.container.clone(),
            region,
            endpoint: config.s3_endpoint.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }

    /// Public URL of an object.
    fn object_url(&self, key: &str) -> String {
        object_url(
            &self.bucket,
            &self.region,
            self.endpoint.as_deref(),
            self.public_base_url.as_deref(),
            key,
        )
    }
}

/// Build the public URL of `key`.
///
/// Precedence: explicit public base URL, then the custom endpoint
/// (path-style), then the AWS virtual-hosted style URL.
pub(crate) fn object_url(
    bucket: &str,
    region: &str,
    endpoint: Option<&str>,
    public_base_url: Option<&str>,
    key: &str,
) -> String {
    match (public_base_url, endpoint) {
        (Some(base), _) | (None, Some(base)) => {
            format!("{}/{bucket}/{key}", base.trim_end_matches('/'))
        }
        (None, None) => format!("https://{bucket}.s3.{region}.amazonaws.com/{key}"),
    }
}

/// Bucket policy granting anonymous read access to every object.
pub(crate) fn public_read_policy(bucket: &str) -> String {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "PublicReadGetObject",
            "Effect": "Allow",
            "Principal": "*",
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{bucket}/*")],
        }],
    })
    .to_string()
}

fn backend_error(action: &str, err: impl std::error::Error) -> BlobError {
    BlobError::Backend(format!("S3 {action} failed: {}", DisplayErrorContext(err)))
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn ensure_container(&self) -> Result<(), BlobError> {
        if self.api.bucket_exists(&self.bucket).await? {
            return Ok(());
        }

        // us-east-1 rejects an explicit location constraint.
        let location = (self.region != DEFAULT_REGION).then_some(self.region.as_str());
        self.api.create_bucket(&self.bucket, location).await?;
        info!(bucket = %self.bucket, region = %self.region, "Created S3 bucket");
        Ok(())
    }

    async fn set_public_read(&self) -> Result<(), BlobError> {
        // The policy is refused while Block Public Access forbids it.
        self.api.allow_public_policies(&self.bucket).await?;
        self.api
            .put_bucket_policy(&self.bucket, public_read_policy(&self.bucket))
            .await
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError> {
        let size = bytes.len();
        self.api
            .put_object(&self.bucket, key, bytes, content_type)
            .await?;

        debug!(bucket = %self.bucket, key, size, content_type, "Stored blob in S3");
        Ok(self.object_url(key))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use assert_matches::assert_matches;
    use eventease_core::storage::{upload_image, ImageUpload};

    use super::*;

    /// Records every bucket call; optionally reports the bucket as present
    /// or refuses the public access change.
    #[derive(Clone, Default)]
    struct RecordingBucket {
        calls: Arc<Mutex<Vec<String>>>,
        exists: bool,
        refuse_public_access: bool,
    }

    impl RecordingBucket {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BucketApi for RecordingBucket {
        async fn bucket_exists(&self, bucket: &str) -> Result<bool, BlobError> {
            self.record(format!("head_bucket {bucket}"));
            Ok(self.exists)
        }

        async fn create_bucket(
            &self,
            bucket: &str,
            location: Option<&str>,
        ) -> Result<(), BlobError> {
            self.record(format!("create_bucket {bucket} {location:?}"));
            Ok(())
        }

        async fn allow_public_policies(&self, bucket: &str) -> Result<(), BlobError> {
            self.record(format!("put_public_access_block {bucket}"));
            if self.refuse_public_access {
                return Err(BlobError::Backend("AccessDenied".into()));
            }
            Ok(())
        }

        async fn put_bucket_policy(&self, bucket: &str, policy: String) -> Result<(), BlobError> {
            assert_eq!(policy, public_read_policy(bucket));
            self.record(format!("put_bucket_policy {bucket}"));
            Ok(())
        }

        async fn put_object(
            &self,
            bucket: &str,
            key: &str,
            _bytes: Vec<u8>,
            content_type: &str,
        ) -> Result<(), BlobError> {
            self.record(format!("put_object {bucket} {content_type}"));
            assert!(key.ends_with(".png"));
            Ok(())
        }
    }

    fn store(bucket: RecordingBucket, region: &str) -> S3BlobStore {
        let config = BlobStoreConfig {
            container: "venueimages".into(),
            ..BlobStoreConfig::default()
        };
        S3BlobStore::with_api(bucket, &config, region.into())
    }

    #[tokio::test]
    async fn test_upload_to_new_bucket_unblocks_public_policy_first() {
        let bucket = RecordingBucket::default();
        let store = store(bucket.clone(), "af-south-1");

        let url = upload_image(
            &store,
            Some(ImageUpload {
                file_name: "hall.png".into(),
                content_type: "image/png".into(),
                bytes: vec![1],
            }),
        )
        .await
        .unwrap()
        .unwrap();

        assert!(url.starts_with("https://venueimages.s3.af-south-1.amazonaws.com/"));
        assert_eq!(
            bucket.calls(),
            vec![
                "head_bucket venueimages",
                "create_bucket venueimages Some(\"af-south-1\")",
                "put_public_access_block venueimages",
                "put_bucket_policy venueimages",
                "put_object venueimages image/png",
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_bucket_is_not_recreated() {
        let bucket = RecordingBucket {
            exists: true,
            ..RecordingBucket::default()
        };
        let store = store(bucket.clone(), DEFAULT_REGION);

        store.ensure_container().await.unwrap();
        assert_eq!(bucket.calls(), vec!["head_bucket venueimages"]);
    }

    #[tokio::test]
    async fn test_us_east_1_bucket_has_no_location_constraint() {
        let bucket = RecordingBucket::default();
        let store = store(bucket.clone(), DEFAULT_REGION);

        store.ensure_container().await.unwrap();
        assert_eq!(bucket.calls()[1], "create_bucket venueimages None");
    }

    #[tokio::test]
    async fn test_refused_public_access_change_skips_policy() {
        let bucket = RecordingBucket {
            refuse_public_access: true,
            ..RecordingBucket::default()
        };
        let store = store(bucket.clone(), DEFAULT_REGION);

        assert_matches!(store.set_public_read().await, Err(BlobError::Backend(_)));
        assert_eq!(bucket.calls(), vec!["put_public_access_block venueimages"]);
    }

    #[test]
    fn test_object_url_virtual_hosted() {
        assert_eq!(
            object_url("venueimages", "af-south-1", None, None, "a.png"),
            "https://venueimages.s3.af-south-1.amazonaws.com/a.png"
        );
    }

    #[test]
    fn test_object_url_custom_endpoint_is_path_style() {
        assert_eq!(
            object_url(
                "venueimages",
                "us-east-1",
                Some("http://localhost:9000/"),
                None,
                "a.png"
            ),
            "http://localhost:9000/venueimages/a.png"
        );
    }

    #[test]
    fn test_object_url_public_base_wins() {
        assert_eq!(
            object_url(
                "venueimages",
                "us-east-1",
                Some("http://minio:9000"),
                Some("https://cdn.example.com"),
                "a.png"
            ),
            "https://cdn.example.com/venueimages/a.png"
        );
    }

    #[test]
    fn test_public_read_policy_targets_bucket_objects() {
        let policy: serde_json::Value =
            serde_json::from_str(&public_read_policy("venueimages")).unwrap();
        let statement = &policy["Statement"][0];
        assert_eq!(statement["Effect"], "Allow");
        assert_eq!(statement["Principal"], "*");
        assert_eq!(statement["Action"][0], "s3:GetObject");
        assert_eq!(statement["Resource"][0], "arn:aws:s3:::venueimages/*");
    }
}

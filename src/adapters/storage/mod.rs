use crate::config::StorageConfig;
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

pub mod s3;

pub use s3::S3Storage;

/// Durable binary storage with time-limited signed-URL issuance and deletion
/// by key. Injected as `Arc<dyn ObjectStorage>` so tests can substitute a
/// double for the real S3 client.
#[async_trait]
pub trait ObjectStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Stores `body` under `key`. Must refuse to overwrite an existing key.
    async fn put(&self, key: &str, content_type: &str, body: Bytes) -> Result<()>;

    /// Deletes the object at `key`. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Issues a signed read URL for `key` valid for `ttl`.
    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String>;
}

/// Builds the S3 client from configuration, honoring a custom endpoint and
/// static credentials for MinIO-style deployments.
pub async fn init_s3_client(config: &StorageConfig) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        loader = loader.credentials_provider(aws_credential_types::Credentials::new(
            access_key.clone(),
            secret_key.clone(),
            None,
            None,
            "static",
        ));
    }

    let sdk_config = loader.load().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(config.force_path_style).build();

    aws_sdk_s3::Client::from_conf(s3_config)
}

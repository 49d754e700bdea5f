use crate::adapters::storage::ObjectStorage;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    #[must_use]
    pub const fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(&self, key: &str, content_type: &str, body: Bytes) -> Result<()> {
        // If-None-Match guards the collision-free key assumption: an existing
        // object is never silently overwritten.
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .if_none_match("*")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, key = %key, "S3 upload failed");
                AppError::Storage(format!("upload failed for key {key}"))
            })?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client.delete_object().bucket(&self.bucket).key(key).send().await.map_err(|e| {
            tracing::error!(error = ?e, key = %key, "S3 delete failed");
            AppError::Storage(format!("delete failed for key {key}"))
        })?;
        Ok(())
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String> {
        let presigning = PresigningConfig::expires_in(ttl).map_err(|e| {
            tracing::error!(error = ?e, "Invalid presigning expiry");
            AppError::Storage("invalid presigning expiry".to_string())
        })?;

        let request =
            self.client.get_object().bucket(&self.bucket).key(key).presigned(presigning).await.map_err(|e| {
                tracing::error!(error = ?e, key = %key, "S3 presign failed");
                AppError::Storage(format!("presign failed for key {key}"))
            })?;

        Ok(request.uri().to_string())
    }
}

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::{Credentials, RequestChecksumCalculation, ResponseChecksumValidation};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::debug;

use super::ObjectStore;
use crate::config::StorageConfig;
use crate::error::MirrorError;

/// S3-compatible bucket (AWS, MinIO, R2, ...) addressed path-style.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    /// Builds the client once from explicit configuration.
    ///
    /// SDK retries are off and checksums are only sent when an operation
    /// requires them, so every call maps to exactly one plain request.
    pub async fn connect(config: &StorageConfig) -> Self {
        let creds = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "gtfs-mirror-env",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(config.endpoint_url())
            .credentials_provider(creds)
            .retry_config(RetryConfig::disabled())
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn has_objects_under(&self, prefix: &str) -> Result<bool, MirrorError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .delimiter("/")
            .max_keys(1)
            .send()
            .await
            .map_err(|e| MirrorError::Storage {
                operation: "ListObjectsV2",
                bucket: self.bucket.clone(),
                key: prefix.to_string(),
                source: Box::new(e),
            })?;

        let found = !output.contents().is_empty() || !output.common_prefixes().is_empty();
        debug!(found, "Listed prefix");
        Ok(found)
    }

    #[tracing::instrument(skip(self, body), fields(bucket = %self.bucket, bytes = body.len()))]
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), MirrorError> {
        let length = i64::try_from(body.len()).unwrap_or(i64::MAX);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_length(length)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| MirrorError::Storage {
                operation: "PutObject",
                bucket: self.bucket.clone(),
                key: key.to_string(),
                source: Box::new(e),
            })?;

        Ok(())
    }
}

//! Object storage the release is mirrored into.

#[cfg(test)]
pub(crate) mod memory;
mod s3;

pub use s3::S3Store;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::MirrorError;

/// Content type every converted table is uploaded with.
pub const PARQUET_CONTENT_TYPE: &str = "application/octet-stream";

/// The two storage calls the mirror makes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns `true` if at least one object or sub-prefix sits directly
    /// under `prefix`.
    async fn has_objects_under(&self, prefix: &str) -> Result<bool, MirrorError>;

    /// Stores `body` at `key` with an explicit length.
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str)
    -> Result<(), MirrorError>;
}

//! Error types for the mirror pipeline.

use reqwest::StatusCode;

/// Errors raised while converting a delimited-text table to Parquet.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The table has no header row.
    #[error("table is empty")]
    Empty,

    /// CSV parsing or schema inference failed.
    #[error("CSV error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet encoding failed.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Errors that abort a mirror run.
///
/// Nothing in the crate recovers from these; they propagate to `main`.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// The entry point answered with something other than a redirect.
    #[error("Unexpected status code: {status} from {url}")]
    UnexpectedStatus {
        /// Entry-point URL.
        url: String,
        /// Status actually returned.
        status: StatusCode,
    },

    /// The entry point redirected without a usable `Location` header.
    #[error("Redirect from {url} has no Location header")]
    MissingLocation {
        /// Entry-point URL.
        url: String,
    },

    /// A URL could not be parsed or joined.
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl {
        /// Offending URL text.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The resolved URL has no final path segment to name the release after.
    #[error("Cannot derive a release name from {url}")]
    InvalidReleaseUrl {
        /// Resolved download URL.
        url: String,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The archive download returned a non-success status.
    #[error("Download of {url} failed with status {status}")]
    Download {
        /// Archive URL.
        url: String,
        /// Status returned.
        status: StatusCode,
    },

    /// The downloaded content is not a readable zip archive.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Reading an entry out of the archive failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A table could not be converted.
    #[error("Failed to convert {entry}: {source}")]
    Conversion {
        /// Archive entry name.
        entry: String,
        /// Underlying conversion error.
        source: ConvertError,
    },

    /// The storage backend rejected a list or put call.
    #[error("Storage {operation} failed for s3://{bucket}/{key}: {source}")]
    Storage {
        /// `ListObjectsV2` or `PutObject`.
        operation: &'static str,
        /// Bucket name.
        bucket: String,
        /// Object key or listing prefix.
        key: String,
        /// Underlying SDK error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Missing required environment variable.
    #[error("Missing environment variable: {name}")]
    MissingEnv {
        /// Name of the missing variable.
        name: String,
    },
}

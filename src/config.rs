//! Runtime configuration.
//!
//! # Environment Variables
//!
//! | Variable | Required | Description |
//! |---|---|---|
//! | `S3_ENDPOINT` | Yes | Storage host (`minio.example.org`) or full URL |
//! | `S3_ACCESS_KEY` | Yes | Access key |
//! | `S3_SECRET_KEY` | Yes | Secret key |
//! | `S3_BUCKET` | Yes | Destination bucket |
//! | `S3_REGION` | No | Signing region, defaults to `us-east-1` |

use crate::error::MirrorError;

/// Permalink that always redirects to the current timetable release.
pub const DEFAULT_ENTRY_URL: &str =
    "https://opentransportdata.swiss/de/dataset/timetable-2024-gtfs2020/permalink";

const DEFAULT_REGION: &str = "us-east-1";

/// Where and how to reach the destination bucket.
#[derive(Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl StorageConfig {
    /// Reads the `S3_*` variables from the process environment.
    ///
    /// # Errors
    ///
    /// [`MirrorError::MissingEnv`] if a required variable is unset or empty.
    pub fn from_env() -> Result<Self, MirrorError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with a caller-supplied lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MirrorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| MirrorError::MissingEnv {
                    name: name.to_string(),
                })
        };

        Ok(Self {
            endpoint: require("S3_ENDPOINT")?,
            access_key: require("S3_ACCESS_KEY")?,
            secret_key: require("S3_SECRET_KEY")?,
            bucket: require("S3_BUCKET")?,
            region: lookup("S3_REGION")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        })
    }

    /// Endpoint as a URL. A bare host is reached over HTTPS.
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.contains("://") {
            self.endpoint.clone()
        } else {
            format!("https://{}", self.endpoint)
        }
    }
}

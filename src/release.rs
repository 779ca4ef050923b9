//! Release naming: the storage prefix a timetable release is mirrored under.

use std::fmt;

use reqwest::Url;

use crate::error::MirrorError;

/// Extension of the published archive, stripped from the release name.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Extension of the source tables inside the archive.
pub const TABLE_EXTENSION: &str = ".txt";

/// Extension of the converted objects.
pub const COLUMNAR_EXTENSION: &str = ".parquet";

/// Identifier of one dated release, e.g. `gtfs_fp2024_2024-06-01/`.
///
/// Always ends with `/` so it can be used directly as a key prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseId(String);

impl ReleaseId {
    /// Derives the identifier from the resolved download URL.
    ///
    /// Takes the last path segment and strips a trailing `.zip`. No other
    /// normalization is applied.
    ///
    /// # Errors
    ///
    /// [`MirrorError::InvalidReleaseUrl`] if the URL has no usable final segment.
    pub fn from_url(url: &Url) -> Result<Self, MirrorError> {
        let segment = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();

        let name = segment.strip_suffix(ARCHIVE_EXTENSION).unwrap_or(segment);

        if name.is_empty() {
            return Err(MirrorError::InvalidReleaseUrl {
                url: url.to_string(),
            });
        }

        Ok(Self(format!("{name}/")))
    }

    /// The storage prefix, including the trailing `/`.
    pub fn prefix(&self) -> &str {
        &self.0
    }

    /// Release name without the trailing `/`.
    pub fn name(&self) -> &str {
        self.0.trim_end_matches('/')
    }

    /// Destination key for an archive entry.
    ///
    /// Uses the entry's base name with `.txt` swapped for `.parquet`; names
    /// without `.txt` get `.parquet` appended.
    pub fn object_key(&self, entry_name: &str) -> String {
        let base = base_name(entry_name);
        let stem = base.strip_suffix(TABLE_EXTENSION).unwrap_or(base);
        format!("{}{stem}{COLUMNAR_EXTENSION}", self.0)
    }
}

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final `/`-separated component of an archive entry name.
pub fn base_name(entry_name: &str) -> &str {
    entry_name.rsplit('/').next().unwrap_or(entry_name)
}

//! The release ingestion pipeline.
//!
//! Resolve the permalink, check whether the release is already in storage,
//! and if not download it, convert every kept table to Parquet and upload it
//! under the release prefix. Every step is awaited in order; the first error
//! ends the run and nothing already uploaded is rolled back.

use reqwest::Url;
use tracing::{debug, info};

use crate::archive::{ArchiveEntry, ReleaseArchive};
use crate::convert::csv_to_parquet;
use crate::error::MirrorError;
use crate::fetch::{HttpClient, fetch_bytes, resolve_redirect};
use crate::release::ReleaseId;
use crate::storage::{ObjectStore, PARQUET_CONTENT_TYPE};
use crate::summary::{RunSummary, UploadedObject};

/// Result of a successful run.
#[derive(Debug)]
pub enum RunOutcome {
    /// Something already exists under the release prefix; nothing was done.
    AlreadyMirrored { release: ReleaseId },
    /// The release was downloaded, converted and uploaded.
    Mirrored(RunSummary),
}

/// Where the permalink currently points and whether that release is stored.
#[derive(Debug)]
pub struct ReleaseStatus {
    pub release: ReleaseId,
    pub url: Url,
    pub mirrored: bool,
}

/// Wires the HTTP clients and the destination store together.
pub struct Mirror<'a, H, S> {
    resolver: &'a H,
    downloader: &'a H,
    store: &'a S,
}

impl<'a, H: HttpClient, S: ObjectStore> Mirror<'a, H, S> {
    /// `resolver` must not follow redirects; `downloader` should.
    pub fn new(resolver: &'a H, downloader: &'a H, store: &'a S) -> Self {
        Self {
            resolver,
            downloader,
            store,
        }
    }

    /// Resolves the permalink and checks storage for the release prefix.
    ///
    /// # Errors
    ///
    /// Redirect, naming or storage errors.
    #[tracing::instrument(skip(self))]
    pub async fn status(&self, entry_url: &str) -> Result<ReleaseStatus, MirrorError> {
        let url = resolve_redirect(self.resolver, entry_url).await?;
        let release = ReleaseId::from_url(&url)?;
        info!(release = %release, url = %url, "Resolved current release");

        let mirrored = self.store.has_objects_under(release.prefix()).await?;

        Ok(ReleaseStatus {
            release,
            url,
            mirrored,
        })
    }

    /// Runs one pass against `entry_url`.
    ///
    /// # Errors
    ///
    /// Any [`MirrorError`]; the run stops at the first one.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, entry_url: &str) -> Result<RunOutcome, MirrorError> {
        let ReleaseStatus {
            release,
            url: release_url,
            mirrored,
        } = self.status(entry_url).await?;

        if mirrored {
            info!(release = %release, "Release already mirrored, nothing to do");
            return Ok(RunOutcome::AlreadyMirrored { release });
        }

        let bytes = fetch_bytes(self.downloader, &release_url).await?;
        info!(bytes = bytes.len(), "Release archive downloaded");

        let mut archive = ReleaseArchive::open(bytes)?;
        let mut summary = RunSummary::new(release.name(), release_url.as_str());

        for index in 0..archive.len() {
            match archive.entry(index)? {
                ArchiveEntry::Skipped { name, reason } => {
                    debug!(entry = %name, ?reason, "Skipping entry");
                    summary.record_skip(name, reason);
                }
                ArchiveEntry::Table { name, data } => {
                    let uploaded = self.mirror_table(&release, &name, &data).await?;
                    summary.record_upload(uploaded);
                }
            }
        }

        Ok(RunOutcome::Mirrored(summary.finish()))
    }

    async fn mirror_table(
        &self,
        release: &ReleaseId,
        name: &str,
        data: &[u8],
    ) -> Result<UploadedObject, MirrorError> {
        let key = release.object_key(name);

        let table = csv_to_parquet(data).map_err(|source| MirrorError::Conversion {
            entry: name.to_string(),
            source,
        })?;
        let bytes = table.bytes.len();

        self.store
            .put_object(&key, table.bytes, PARQUET_CONTENT_TYPE)
            .await?;

        info!(rows = table.rows, columns = table.columns, bytes, "Uploaded {key}");

        Ok(UploadedObject {
            key,
            bytes,
            rows: table.rows,
            columns: table.columns,
        })
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::archive::SkipReason;

/// One converted table that was written to storage.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedObject {
    pub key: String,
    pub bytes: usize,
    pub rows: usize,
    pub columns: usize,
}

/// An archive entry that was not mirrored.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: SkipReason,
}

/// What a completed mirror run did.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub release: String,
    pub source_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub uploaded: Vec<UploadedObject>,
    pub skipped: Vec<SkippedEntry>,
}

impl RunSummary {
    pub fn new(release: &str, source_url: &str) -> Self {
        RunSummary {
            release: release.to_string(),
            source_url: source_url.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            uploaded: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record_upload(&mut self, object: UploadedObject) {
        self.uploaded.push(object);
    }

    pub fn record_skip(&mut self, name: String, reason: SkipReason) {
        self.skipped.push(SkippedEntry { name, reason });
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn total_bytes(&self) -> usize {
        self.uploaded.iter().map(|o| o.bytes).sum()
    }
}

//! Release archive access and entry selection.

use std::io::{Cursor, Read};

use bytes::Bytes;
use serde::Serialize;
use zip::ZipArchive;

use crate::error::MirrorError;
use crate::release::base_name;

/// Auxiliary timetable tables present in the release but not mirrored.
pub const EXCLUDED_TABLES: &[&str] = &[
    "agency.txt",
    "calendar.txt",
    "calendar_dates.txt",
    "shapes.txt",
    "stop_times.txt",
    "transfers.txt",
    "feed_info.txt",
];

/// Why an entry was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Directory,
    Excluded,
}

/// What to do with one archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPlan {
    Skip(SkipReason),
    Convert { table: String },
}

/// Decides whether an entry is converted, based only on its name.
pub fn plan_entry(name: &str) -> EntryPlan {
    if name.ends_with('/') {
        return EntryPlan::Skip(SkipReason::Directory);
    }

    let table = base_name(name);
    if EXCLUDED_TABLES.contains(&table) {
        return EntryPlan::Skip(SkipReason::Excluded);
    }

    EntryPlan::Convert {
        table: table.to_string(),
    }
}

/// One entry pulled out of the archive.
#[derive(Debug)]
pub enum ArchiveEntry {
    /// Left out; its bytes are never read.
    Skipped { name: String, reason: SkipReason },
    /// A table to convert, with its raw text.
    Table { name: String, data: Vec<u8> },
}

/// A downloaded release held in memory.
pub struct ReleaseArchive {
    inner: ZipArchive<Cursor<Bytes>>,
}

impl ReleaseArchive {
    /// Opens the zip container.
    ///
    /// # Errors
    ///
    /// [`MirrorError::Archive`] if the bytes are not a zip archive.
    pub fn open(bytes: Bytes) -> Result<Self, MirrorError> {
        Ok(Self {
            inner: ZipArchive::new(Cursor::new(bytes))?,
        })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// Reads the entry at `index` in archive order.
    ///
    /// # Errors
    ///
    /// [`MirrorError::Archive`] or [`MirrorError::Io`] if the entry cannot be
    /// decompressed.
    pub fn entry(&mut self, index: usize) -> Result<ArchiveEntry, MirrorError> {
        let mut file = self.inner.by_index(index)?;
        let name = file.name().to_string();

        match plan_entry(&name) {
            EntryPlan::Skip(reason) => Ok(ArchiveEntry::Skipped { name, reason }),
            EntryPlan::Convert { .. } => {
                let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
                file.read_to_end(&mut data)?;
                Ok(ArchiveEntry::Table { name, data })
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::build_zip;
    use super::*;

    #[test]
    fn test_plan_entry_skips_directories() {
        assert_eq!(plan_entry("gtfs/"), EntryPlan::Skip(SkipReason::Directory));
    }

    #[test]
    fn test_plan_entry_skips_every_excluded_table() {
        for table in EXCLUDED_TABLES {
            assert_eq!(plan_entry(table), EntryPlan::Skip(SkipReason::Excluded));
            assert_eq!(
                plan_entry(&format!("nested/{table}")),
                EntryPlan::Skip(SkipReason::Excluded)
            );
        }
    }

    #[test]
    fn test_plan_entry_converts_other_tables() {
        for table in ["stops.txt", "routes.txt", "trips.txt"] {
            assert_eq!(
                plan_entry(table),
                EntryPlan::Convert {
                    table: table.to_string()
                }
            );
        }
    }

    #[test]
    fn test_open_rejects_non_zip() {
        let err = ReleaseArchive::open(Bytes::from_static(b"definitely not a zip")).err();
        assert!(matches!(err, Some(MirrorError::Archive(_))));
    }

    #[test]
    fn test_entry_reads_only_converted_data() {
        let zip = build_zip(&[
            ("routes.txt", "route_id\n1\n"),
            ("calendar.txt", "service_id\nA\n"),
            ("docs/", ""),
        ]);
        let mut archive = ReleaseArchive::open(Bytes::from(zip)).unwrap();
        assert_eq!(archive.len(), 3);

        match archive.entry(0).unwrap() {
            ArchiveEntry::Table { name, data } => {
                assert_eq!(name, "routes.txt");
                assert_eq!(data, b"route_id\n1\n");
            }
            other => panic!("expected table, got {other:?}"),
        }

        match archive.entry(1).unwrap() {
            ArchiveEntry::Skipped { name, reason } => {
                assert_eq!(name, "calendar.txt");
                assert_eq!(reason, SkipReason::Excluded);
            }
            other => panic!("expected skip, got {other:?}"),
        }

        match archive.entry(2).unwrap() {
            ArchiveEntry::Skipped { name, reason } => {
                assert_eq!(name, "docs/");
                assert_eq!(reason, SkipReason::Directory);
            }
            other => panic!("expected skip, got {other:?}"),
        }
    }
}

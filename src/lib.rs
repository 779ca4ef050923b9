//! Mirrors the current GTFS timetable release into S3-compatible storage,
//! one Parquet object per kept table.

pub mod archive;
pub mod config;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod mirror;
pub mod output;
pub mod release;
pub mod storage;
pub mod summary;

pub use error::{ConvertError, MirrorError};
pub use mirror::{Mirror, ReleaseStatus, RunOutcome};

//! Reporting of run results.

use anyhow::Result;
use tracing::{debug, info};

use crate::summary::RunSummary;

/// Logs the summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &RunSummary) {
    debug!("{:#?}", summary);
}

/// Logs the summary as pretty-printed JSON.
pub fn print_json(summary: &RunSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// One-line totals for the end of a run.
pub fn print_totals(summary: &RunSummary) {
    info!(
        release = %summary.release,
        uploaded = summary.uploaded.len(),
        skipped = summary.skipped.len(),
        bytes = summary.total_bytes(),
        "Release mirrored"
    );
}

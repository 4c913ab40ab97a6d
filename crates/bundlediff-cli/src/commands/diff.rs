//! Diff command
//!
//! Usage: bundlediff-cli <BASELINE> <CANDIDATE>

use clap::Args;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use bundlediff_core::diff::diff_snapshots;
use bundlediff_store::load_snapshot;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Baseline artifact: bundle jar, exploded bundle directory or JSON snapshot
    pub baseline: PathBuf,

    /// Candidate artifact compared against the baseline
    pub candidate: PathBuf,
}

/// Execute diff command
///
/// Both artifacts are loaded before anything is written, so a failing load
/// produces no partial report.
pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let left = load_snapshot(&args.baseline)?;
    let right = load_snapshot(&args.candidate)?;

    let stdout = io::stdout();
    let summary = diff_snapshots(&left, &right, BufWriter::new(stdout.lock()))?;
    tracing::debug!(
        identifiers_compared = summary.identifiers_compared as u64,
        differences_found = summary.differences_found,
        "diff complete"
    );

    Ok(())
}

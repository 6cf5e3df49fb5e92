//! Orchestrator faults
//!
//! These are failures of the orchestrator itself. A benchmark that exits non-zero, times out,
//! or cannot be launched is *not* an error here; it is an [`OutcomeKind`](super::OutcomeKind)
//! recorded in the run summary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("cannot resolve project root: {0}")]
    ProjectRoot(#[source] io::Error),

    /// The benchmarks directory exists (or its existence could not be determined) but cannot be listed.
    #[error("failed to list benchmarks in '{}': {}", .dir.display(), .source)]
    Discovery {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to write report: {0}")]
    Report(#[from] io::Error),
}

//! Artifacts, per-run outcomes, and the aggregate summary

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::naming::format_name_with_marker;

/// One discovered benchmark program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkArtifact {
    /// Location on disk (rooted at the project root)
    pub path: PathBuf,
    /// Human-readable label derived from the file stem
    pub name: String,
}

impl BenchmarkArtifact {
    /// Create an artifact, deriving its display name from the file stem minus `marker`.
    pub fn new(path: impl Into<PathBuf>, marker: &str) -> Self {
        let path = path.into();
        let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let name = format_name_with_marker(&stem, marker);
        Self { path, name }
    }

    /// Bare file name, as listed in failure summaries.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// How a single benchmark run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The process terminated on its own. `None` means it was ended by a signal.
    Completed(Option<i32>),
    /// The wall-clock budget elapsed and the process was killed
    TimedOut,
    /// The process could not be started (or waited on)
    LaunchError(String),
}

/// Result of running one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub kind: OutcomeKind,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl RunOutcome {
    pub fn completed(code: Option<i32>, stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            kind: OutcomeKind::Completed(code),
            stdout,
            stderr,
            duration,
        }
    }

    /// Timed-out runs keep whatever output was captured before the kill.
    pub fn timed_out(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            kind: OutcomeKind::TimedOut,
            stdout,
            stderr,
            duration,
        }
    }

    pub fn launch_error(cause: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind: OutcomeKind::LaunchError(cause.into()),
            stdout: String::new(),
            stderr: String::new(),
            duration,
        }
    }

    /// Success means the process completed with exit code 0.
    pub fn is_success(&self) -> bool {
        matches!(self.kind, OutcomeKind::Completed(Some(0)))
    }
}

/// Aggregate state threaded through the run loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of artifacts discovered (and therefore expected to run)
    pub total: usize,
    /// Number of outcomes recorded so far
    pub recorded: usize,
    /// File names of artifacts that did not succeed, in run order
    pub failed: Vec<String>,
    pub nonzero_exits: usize,
    pub timed_out: usize,
    pub launch_errors: usize,
    pub duration: Duration,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Account for one finished artifact.
    pub fn record(&mut self, artifact: &BenchmarkArtifact, outcome: &RunOutcome) {
        self.recorded += 1;
        if outcome.is_success() {
            return;
        }
        match outcome.kind {
            OutcomeKind::Completed(_) => self.nonzero_exits += 1,
            OutcomeKind::TimedOut => self.timed_out += 1,
            OutcomeKind::LaunchError(_) => self.launch_errors += 1,
        }
        self.failed.push(artifact.file_name());
    }

    pub fn passed(&self) -> usize {
        self.recorded - self.failed.len()
    }

    /// True when at least one artifact ran and none failed.
    pub fn is_success(&self) -> bool {
        self.total > 0 && self.failed.is_empty()
    }
}

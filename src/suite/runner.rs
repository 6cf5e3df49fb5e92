//! The orchestration loop
//!
//! `Start → Discovering → { NoBenchmarks | Running(1..=N) → Summarizing → Done }`, traversed
//! exactly once per call. Artifacts run sequentially in discovery order and each produces one
//! outcome; the loop never retries and never stops early.

use std::path::Path;
use std::time::{Duration, Instant};

use super::discovery::{discover_benchmarks, select_benchmarks};
use super::executor::execute;
use super::{BenchmarkArtifact, Launcher, RunOutcome, RunSummary, SuiteConfig, SuiteError, SuiteReporter};

/// Terminal state of a suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuiteStatus {
    /// Discovery found nothing; no process was launched
    NoBenchmarks,
    /// Every discovered artifact ran and has an outcome in the summary
    Completed(RunSummary),
}

impl SuiteStatus {
    /// True only when something ran and nothing failed.
    pub fn is_success(&self) -> bool {
        match self {
            SuiteStatus::NoBenchmarks => false,
            SuiteStatus::Completed(summary) => summary.is_success(),
        }
    }
}

/// Discover the artifacts `config` selects, in run order.
pub fn collect_benchmarks(config: &SuiteConfig) -> Result<Vec<BenchmarkArtifact>, SuiteError> {
    config.validate()?;
    let artifacts = discover_benchmarks(&config.benchmarks_path(), &config.pattern)?;
    Ok(select_benchmarks(artifacts, config.filter.as_deref()))
}

/// Run the whole suite described by `config`.
///
/// Only orchestrator faults (invalid config, unreadable benchmarks directory, a reporter that
/// cannot write) are errors. Benchmark failures are recorded in the returned summary.
#[tracing::instrument(skip_all, fields(root = %config.project_root.display()))]
pub fn run_suite(
    config: &SuiteConfig,
    launcher: &dyn Launcher,
    reporter: &mut dyn SuiteReporter,
) -> Result<SuiteStatus, SuiteError> {
    let start = Instant::now();
    config.validate()?;

    // Benchmarks run from the root, so artifact paths handed to them must not depend on our cwd
    let project_root = std::path::absolute(&config.project_root).map_err(SuiteError::ProjectRoot)?;
    let config = SuiteConfig {
        project_root,
        ..config.clone()
    };

    reporter.on_suite_start(&config)?;

    let artifacts = collect_benchmarks(&config)?;
    if artifacts.is_empty() {
        reporter.on_no_benchmarks(&config.benchmarks_dir)?;
        return Ok(SuiteStatus::NoBenchmarks);
    }
    reporter.on_collection_complete(&artifacts)?;

    let total = artifacts.len();
    let mut summary = RunSummary::new(total);
    for (i, artifact) in artifacts.iter().enumerate() {
        let outcome = run_benchmark(
            artifact,
            i + 1,
            total,
            &config.project_root,
            config.timeout,
            launcher,
            reporter,
        )?;
        summary.record(artifact, &outcome);
    }
    summary.duration = start.elapsed();

    tracing::debug!(
        total = summary.total,
        failed = summary.failed.len(),
        duration = ?summary.duration,
        "suite finished"
    );
    reporter.on_run_complete(&summary)?;

    Ok(SuiteStatus::Completed(summary))
}

/// Announce, execute, and report a single artifact.
pub fn run_benchmark(
    artifact: &BenchmarkArtifact,
    index: usize,
    total: usize,
    project_root: &Path,
    timeout: Duration,
    launcher: &dyn Launcher,
    reporter: &mut dyn SuiteReporter,
) -> Result<RunOutcome, SuiteError> {
    reporter.on_benchmark_start(artifact, index, total)?;
    let outcome = execute(artifact, launcher, project_root, timeout);
    reporter.on_benchmark_complete(artifact, &outcome)?;
    Ok(outcome)
}

//! Progress and summary reporting
//!
//! The run loop talks to a [`SuiteReporter`]; the reporter decides what the user sees.
//! [`ConsoleReporter`] writes the plain-text console layout, [`JsonReporter`] writes one JSON
//! object per event for machine consumers. Implement the trait for other formats.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use serde_json::json;

use super::{ArtifactPattern, BenchmarkArtifact, DEFAULT_TIMEOUT, OutcomeKind, RunOutcome, RunSummary, SuiteConfig};

/// Width of the `=` and `─` rule lines.
const RULE_WIDTH: usize = 60;

/// Hooks called by the run loop, in order:
/// `on_suite_start`, then either `on_no_benchmarks` or `on_collection_complete` followed by
/// `on_benchmark_start`/`on_benchmark_complete` per artifact and a final `on_run_complete`.
pub trait SuiteReporter {
    /// Called once before discovery
    fn on_suite_start(&mut self, _config: &SuiteConfig) -> io::Result<()> {
        Ok(())
    }

    /// Called instead of running anything when discovery found nothing
    fn on_no_benchmarks(&mut self, dir: &Path) -> io::Result<()>;

    /// Called once discovery has produced a non-empty artifact list
    fn on_collection_complete(&mut self, artifacts: &[BenchmarkArtifact]) -> io::Result<()>;

    /// Called before an artifact is launched (`index` is 1-based)
    fn on_benchmark_start(&mut self, artifact: &BenchmarkArtifact, index: usize, total: usize) -> io::Result<()>;

    /// Called after an artifact finished, timed out, or failed to launch
    fn on_benchmark_complete(&mut self, artifact: &BenchmarkArtifact, outcome: &RunOutcome) -> io::Result<()>;

    /// Called once after every artifact has an outcome
    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()>;
}

// ============================================================================
// Console
// ============================================================================

/// Plain-text console reporter.
///
/// Benchmark stdout is copied verbatim to `out`, benchmark stderr to `err`. Everything the
/// orchestrator says itself goes to `out`.
pub struct ConsoleReporter<W: Write, E: Write> {
    out: W,
    err: E,
    verbose: bool,
    pattern: ArtifactPattern,
    timeout: Duration,
}

impl<W: Write, E: Write> ConsoleReporter<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self {
            out,
            err,
            verbose: false,
            pattern: ArtifactPattern::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Also print a status line with elapsed time per benchmark, and the total run time.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Give back the underlying writers.
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    fn rule(&mut self, ch: char) -> io::Result<()> {
        writeln!(self.out, "{}", ch.to_string().repeat(RULE_WIDTH))
    }
}

impl<W: Write, E: Write> SuiteReporter for ConsoleReporter<W, E> {
    fn on_suite_start(&mut self, config: &SuiteConfig) -> io::Result<()> {
        self.pattern = config.pattern.clone();
        self.timeout = config.timeout;

        writeln!(self.out, "🔥 benchsuite: Benchmark Runner")?;
        self.rule('=')?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn on_no_benchmarks(&mut self, dir: &Path) -> io::Result<()> {
        let dir = dir.display();
        writeln!(self.out, "No benchmark files found in {}/ directory.", dir)?;
        writeln!(self.out, "Create files named {} to get started.", self.pattern.glob())?;
        writeln!(self.out)?;
        writeln!(self.out, "Example structure:")?;
        writeln!(self.out, "  {}/", dir)?;
        for example in ["algorithms", "data_structures", "string_ops"] {
            writeln!(self.out, "    {}", self.pattern.example(example))?;
        }
        self.out.flush()
    }

    fn on_collection_complete(&mut self, artifacts: &[BenchmarkArtifact]) -> io::Result<()> {
        writeln!(self.out, "Found {} benchmark suite(s)", artifacts.len())?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn on_benchmark_start(&mut self, artifact: &BenchmarkArtifact, index: usize, total: usize) -> io::Result<()> {
        writeln!(self.out, "[{}/{}] {}", index, total, artifact.name)?;
        self.rule('─')?;
        self.out.flush()
    }

    fn on_benchmark_complete(&mut self, _artifact: &BenchmarkArtifact, outcome: &RunOutcome) -> io::Result<()> {
        write_verbatim(&mut self.out, &outcome.stdout)?;
        if !outcome.stderr.is_empty() {
            write_verbatim(&mut self.err, &outcome.stderr)?;
            self.err.flush()?;
        }

        match &outcome.kind {
            OutcomeKind::TimedOut => {
                writeln!(self.out, "  ✗ TIMEOUT after {}", format_budget(self.timeout))?;
            }
            OutcomeKind::LaunchError(cause) => {
                writeln!(self.out, "  ✗ ERROR: {}", cause)?;
            }
            OutcomeKind::Completed(Some(0)) if self.verbose => {
                writeln!(self.out, "  ✓ completed in {:.2}s", outcome.duration.as_secs_f64())?;
            }
            OutcomeKind::Completed(Some(code)) if self.verbose && *code != 0 => {
                writeln!(
                    self.out,
                    "  ✗ exit status {} after {:.2}s",
                    code,
                    outcome.duration.as_secs_f64()
                )?;
            }
            OutcomeKind::Completed(None) if self.verbose => {
                writeln!(
                    self.out,
                    "  ✗ terminated by signal after {:.2}s",
                    outcome.duration.as_secs_f64()
                )?;
            }
            OutcomeKind::Completed(_) => {}
        }

        writeln!(self.out)?;
        self.out.flush()
    }

    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()> {
        self.rule('=')?;
        if summary.failed.is_empty() {
            writeln!(
                self.out,
                "✓ All {} benchmark suite(s) completed successfully",
                summary.total
            )?;
        } else {
            writeln!(self.out, "✗ {} benchmark suite(s) FAILED:", summary.failed.len())?;
            for name in &summary.failed {
                writeln!(self.out, "  - {}", name)?;
            }
        }
        if self.verbose {
            writeln!(
                self.out,
                "{} passed, {} failed ({} timed out, {} not launched) in {:.2}s",
                summary.passed(),
                summary.failed.len(),
                summary.timed_out,
                summary.launch_errors,
                summary.duration.as_secs_f64()
            )?;
        }
        self.out.flush()
    }
}

/// Write captured text unchanged, terminating it with a newline if it lacks one.
fn write_verbatim(w: &mut impl Write, text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    w.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(w)?;
    }
    Ok(())
}

/// Human wording for a wall-clock budget: `5 minutes`, `30 seconds`, `250ms`.
pub fn format_budget(budget: Duration) -> String {
    let secs = budget.as_secs();
    if budget.subsec_nanos() == 0 && secs > 0 {
        if secs % 60 == 0 {
            let minutes = secs / 60;
            return format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" });
        }
        return format!("{} second{}", secs, if secs == 1 { "" } else { "s" });
    }
    format!("{}ms", budget.as_millis())
}

// ============================================================================
// JSON lines
// ============================================================================

/// Writes one JSON object per line for each reporter event.
///
/// Every byte goes to the single `out` stream. A benchmark's captured stdout and stderr are
/// carried as the `stdout` and `stderr` fields of its `benchmark_complete` event rather than copied to the
/// tool's own streams, so a consumer reading one stream sees the whole run.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: serde_json::Value) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, &event)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> SuiteReporter for JsonReporter<W> {
    fn on_suite_start(&mut self, config: &SuiteConfig) -> io::Result<()> {
        self.emit(json!({
            "event": "suite_start",
            "version": crate::version::BENCHSUITE_VERSION,
            "benchmarks_dir": config.benchmarks_dir.display().to_string(),
            "pattern": config.pattern.glob(),
            "timeout_ms": duration_ms(config.timeout),
        }))
    }

    fn on_no_benchmarks(&mut self, dir: &Path) -> io::Result<()> {
        self.emit(json!({
            "event": "no_benchmarks",
            "dir": dir.display().to_string(),
        }))
    }

    fn on_collection_complete(&mut self, artifacts: &[BenchmarkArtifact]) -> io::Result<()> {
        let files: Vec<String> = artifacts.iter().map(BenchmarkArtifact::file_name).collect();
        self.emit(json!({
            "event": "collected",
            "count": artifacts.len(),
            "files": files,
        }))
    }

    fn on_benchmark_start(&mut self, artifact: &BenchmarkArtifact, index: usize, total: usize) -> io::Result<()> {
        self.emit(json!({
            "event": "benchmark_start",
            "index": index,
            "total": total,
            "name": artifact.name,
            "file": artifact.file_name(),
        }))
    }

    fn on_benchmark_complete(&mut self, artifact: &BenchmarkArtifact, outcome: &RunOutcome) -> io::Result<()> {
        let (kind, exit_code, cause) = match &outcome.kind {
            OutcomeKind::Completed(code) => ("completed", *code, None),
            OutcomeKind::TimedOut => ("timed_out", None, None),
            OutcomeKind::LaunchError(cause) => ("launch_error", None, Some(cause.as_str())),
        };
        self.emit(json!({
            "event": "benchmark_complete",
            "name": artifact.name,
            "file": artifact.file_name(),
            "success": outcome.is_success(),
            "outcome": kind,
            "exit_code": exit_code,
            "cause": cause,
            "duration_ms": duration_ms(outcome.duration),
            "stdout": outcome.stdout,
            "stderr": outcome.stderr,
        }))
    }

    fn on_run_complete(&mut self, summary: &RunSummary) -> io::Result<()> {
        self.emit(json!({
            "event": "run_complete",
            "success": summary.is_success(),
            "total": summary.total,
            "passed": summary.passed(),
            "failed": summary.failed,
            "timed_out": summary.timed_out,
            "launch_errors": summary.launch_errors,
            "duration_ms": duration_ms(summary.duration),
        }))
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

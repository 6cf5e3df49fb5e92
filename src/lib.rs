#![forbid(unsafe_code)]
//! benchsuite: a benchmark-suite orchestrator
//!
//! Finds `bench_*` programs in a project's `benchmarks/` directory, runs each one as an
//! isolated child process under a wall-clock budget, surfaces its output, and reduces the
//! results to a single exit status suitable for CI gating. It is to "all benchmarks" what a
//! test runner is to "all tests".
//!
//! The orchestrator never measures anything itself. Each benchmark owns its timing and its
//! output; we only observe exit status and text streams.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `suite` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod suite;
pub mod version;

pub use suite::{
    ArtifactPattern, BenchmarkArtifact, ConsoleReporter, InterpreterLauncher, JsonReporter, Launcher, OutcomeKind,
    RunOutcome, RunSummary, SuiteConfig, SuiteError, SuiteReporter, discover_benchmarks, format_benchmark_name,
    run_suite,
};

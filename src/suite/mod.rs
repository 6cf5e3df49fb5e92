//! Benchmark-suite orchestration
//!
//! ## Flow
//!
//! ```text
//! run_suite
//!   ├─ discover_benchmarks   (benchmarks/bench_*.<ext>, sorted)
//!   └─ for each artifact
//!        ├─ SuiteReporter::on_benchmark_start   "[i/N] Display Name"
//!        ├─ executor::execute                   spawn, budget, capture, classify
//!        └─ SuiteReporter::on_benchmark_complete
//! ```
//!
//! Artifacts run strictly one after another. Every discovered artifact produces exactly one
//! [`RunOutcome`]; per-artifact failures (non-zero exit, timeout, launch error) are recorded in
//! the [`RunSummary`] and never abort the run. Only faults of the orchestrator itself surface as
//! [`SuiteError`].

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod config;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod launcher;
pub mod naming;
pub mod outcome;
pub mod reporter;
pub mod runner;

pub use config::{ArtifactPattern, DEFAULT_BENCHMARKS_DIR, DEFAULT_TIMEOUT, SuiteConfig};
pub use discovery::{discover_benchmarks, resolve_project_root, select_benchmarks};
pub use error::SuiteError;
pub use executor::execute;
pub use launcher::{InterpreterLauncher, Launcher};
pub use naming::format_benchmark_name;
pub use outcome::{BenchmarkArtifact, OutcomeKind, RunOutcome, RunSummary};
pub use reporter::{ConsoleReporter, JsonReporter, SuiteReporter};
pub use runner::{SuiteStatus, collect_benchmarks, run_benchmark, run_suite};

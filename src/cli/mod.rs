//! CLI module for benchsuite
//!
//! `benchsuite [OPTIONS]` discovers `benchmarks/bench_*.mojo` under the project root, runs each
//! one, and exits `0` only if at least one benchmark ran and all of them succeeded.
//!
//! ## Modules
//!
//! - `commands` - Command implementations (run, list)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use crate::suite::{DEFAULT_BENCHMARKS_DIR, SuiteError};
use crate::version::BENCHSUITE_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// One or more benchmarks failed, timed out, or could not be launched
    pub const FAILURE: ExitCode = ExitCode(1);
    /// No benchmarks were discovered. Currently shares its value with `FAILURE`.
    pub const NO_WORK: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<SuiteError> for CliError {
    fn from(e: SuiteError) -> Self {
        CliError::failure(format!("Error: {}", e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Output format for run reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable progress and summary
    #[default]
    Console,
    /// One JSON object per line per event
    Json,
}

/// Run every benchmark in a project and report an aggregate result
#[derive(Parser, Debug)]
#[command(name = "benchsuite")]
#[command(version = BENCHSUITE_VERSION)]
#[command(about = "Run every benchmark in a project and report an aggregate result", long_about = None)]
pub struct Cli {
    /// Project root (default: nearest ancestor of the executable containing the benchmarks directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Benchmarks directory, relative to the project root
    #[arg(long = "dir", value_name = "DIR", default_value = DEFAULT_BENCHMARKS_DIR)]
    pub benchmarks_dir: PathBuf,

    /// Benchmark file extension (files are named bench_<name>.<EXT>)
    #[arg(long, value_name = "EXT", default_value = "mojo")]
    pub extension: String,

    /// Wall-clock budget per benchmark, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 300)]
    pub timeout: u64,

    /// Program that runs each benchmark file
    #[arg(long, value_name = "PROGRAM", default_value = "mojo")]
    pub launcher: String,

    /// Flag the launcher uses to add a module search path
    #[arg(long, value_name = "FLAG", default_value = "-I", allow_hyphen_values = true)]
    pub search_path_flag: String,

    /// Module search path passed to the launcher
    #[arg(long, value_name = "PATH", default_value = "src")]
    pub search_path: String,

    /// Only run benchmarks whose file stem (name without extension) contains EXPR
    #[arg(short = 'k', value_name = "EXPR")]
    pub filter: Option<String>,

    /// Verbose output (per-benchmark status and timing)
    #[arg(short, long)]
    pub verbose: bool,

    /// List discovered benchmarks without running them
    #[arg(long)]
    pub list: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let options = commands::RunOptions::from_cli(&cli)?;
    if cli.list {
        return commands::list_benchmarks(&options);
    }
    commands::run_benchmarks(&options)
}

// ============================================================================
// Tests
// ============================================================================

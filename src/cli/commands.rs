//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::{self, Write};
use std::time::Duration;

use crate::suite::{
    ArtifactPattern, ConsoleReporter, InterpreterLauncher, JsonReporter, SuiteConfig, SuiteReporter, SuiteStatus,
    collect_benchmarks, resolve_project_root, run_suite,
};

use super::{Cli, CliError, CliResult, ExitCode, OutputFormat};

/// Everything a command needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: SuiteConfig,
    pub launcher: InterpreterLauncher,
    pub verbose: bool,
    pub format: OutputFormat,
}

impl RunOptions {
    /// Resolve the project root and build the suite configuration.
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let root = resolve_project_root(cli.root.as_deref(), &cli.benchmarks_dir)?;
        tracing::debug!(root = %root.display(), "using project root");

        let config = SuiteConfig::new(root)
            .with_benchmarks_dir(&cli.benchmarks_dir)
            .with_pattern(ArtifactPattern::new("bench_", &cli.extension))
            .with_timeout(Duration::from_secs(cli.timeout))
            .with_filter(cli.filter.clone());
        config.validate()?;

        if cli.launcher.is_empty() {
            return Err(CliError::failure("Error: --launcher must not be empty"));
        }
        let launcher = InterpreterLauncher::new(&cli.launcher).with_search_path(&cli.search_path_flag, &cli.search_path);

        Ok(Self {
            config,
            launcher,
            verbose: cli.verbose,
            format: cli.format,
        })
    }
}

/// Run every discovered benchmark and map the result to an exit code.
pub fn run_benchmarks(options: &RunOptions) -> CliResult<ExitCode> {
    let status = match options.format {
        OutputFormat::Console => {
            let mut reporter = ConsoleReporter::new(io::stdout().lock(), io::stderr().lock()).with_verbose(options.verbose);
            run_with(options, &mut reporter)?
        }
        OutputFormat::Json => {
            let mut reporter = JsonReporter::new(io::stdout().lock());
            run_with(options, &mut reporter)?
        }
    };
    status_exit(&status)
}

fn run_with(options: &RunOptions, reporter: &mut dyn SuiteReporter) -> CliResult<SuiteStatus> {
    Ok(run_suite(&options.config, &options.launcher, reporter)?)
}

/// Map a finished run to the process exit status.
///
/// The report has already been printed, so failures carry an empty message.
pub fn status_exit(status: &SuiteStatus) -> CliResult<ExitCode> {
    match status {
        SuiteStatus::NoBenchmarks => Err(CliError::new("", ExitCode::NO_WORK)),
        SuiteStatus::Completed(summary) if summary.is_success() => Ok(ExitCode::SUCCESS),
        SuiteStatus::Completed(_) => Err(CliError::new("", ExitCode::FAILURE)),
    }
}

/// Print the benchmarks that would run, without running them.
pub fn list_benchmarks(options: &RunOptions) -> CliResult<ExitCode> {
    let artifacts = collect_benchmarks(&options.config)?;
    if artifacts.is_empty() {
        return Err(CliError::new(
            format!(
                "No benchmark files found in {}/ directory.",
                options.config.benchmarks_dir.display()
            ),
            ExitCode::NO_WORK,
        ));
    }

    let mut out = io::stdout().lock();
    write_listing(&mut out, &artifacts)
        .map_err(|e| CliError::failure(format!("Error writing benchmark list: {}", e)))?;
    Ok(ExitCode::SUCCESS)
}

fn write_listing(out: &mut impl Write, artifacts: &[crate::suite::BenchmarkArtifact]) -> io::Result<()> {
    let width = artifacts.iter().map(|a| a.file_name().len()).max().unwrap_or(0);
    for artifact in artifacts {
        writeln!(out, "{:<width$}  {}", artifact.file_name(), artifact.name, width = width)?;
    }
    writeln!(out)?;
    writeln!(out, "{} benchmark suite(s)", artifacts.len())?;
    out.flush()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::suite::{BenchmarkArtifact, RunOutcome, RunSummary};
    use clap::Parser;

    #[test]
    fn test_status_exit_codes() {
        assert_eq!(status_exit(&SuiteStatus::NoBenchmarks).unwrap_err().exit_code, ExitCode::NO_WORK);

        let mut passed = RunSummary::new(1);
        passed.record(
            &BenchmarkArtifact::new("b/bench_a.mojo", "bench_"),
            &RunOutcome::completed(Some(0), String::new(), String::new(), Duration::ZERO),
        );
        assert_eq!(status_exit(&SuiteStatus::Completed(passed)).unwrap(), ExitCode::SUCCESS);

        let mut failed = RunSummary::new(1);
        failed.record(
            &BenchmarkArtifact::new("b/bench_a.mojo", "bench_"),
            &RunOutcome::timed_out(String::new(), String::new(), Duration::ZERO),
        );
        let err = status_exit(&SuiteStatus::Completed(failed)).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.is_empty());
    }

    #[test]
    fn test_options_from_cli() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["benchsuite", "--root", &root, "--timeout", "12", "--extension", "py"]).unwrap();

        let options = RunOptions::from_cli(&cli).unwrap();
        assert_eq!(options.config.project_root, tmp.path());
        assert_eq!(options.config.timeout, Duration::from_secs(12));
        assert_eq!(options.config.pattern.extension, "py");
        assert_eq!(options.launcher, InterpreterLauncher::default());
    }

    #[test]
    fn test_options_reject_zero_timeout() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["benchsuite", "--root", &root, "--timeout", "0"]).unwrap();

        let err = RunOptions::from_cli(&cli).unwrap_err();
        assert!(err.message.contains("timeout must be greater than zero"));
    }

    #[test]
    fn test_listing_format() {
        let artifacts = vec![
            BenchmarkArtifact::new("b/bench_a.mojo", "bench_"),
            BenchmarkArtifact::new("b/bench_string_ops.mojo", "bench_"),
        ];
        let mut out = Vec::new();
        write_listing(&mut out, &artifacts).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "bench_a.mojo           A\nbench_string_ops.mojo  String Ops\n\n2 benchmark suite(s)\n"
        );
    }
}

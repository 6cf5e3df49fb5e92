//! Suite configuration
//!
//! Defaults reproduce the conventional layout: `benchmarks/bench_*.mojo` under the project root,
//! a five minute budget per benchmark.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::SuiteError;

/// Wall-clock budget for a single benchmark.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Benchmarks directory, relative to the project root.
pub const DEFAULT_BENCHMARKS_DIR: &str = "benchmarks";

/// Filename convention for benchmark artifacts: `<prefix><identifier>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPattern {
    pub prefix: String,
    pub extension: String,
}

impl Default for ArtifactPattern {
    fn default() -> Self {
        Self {
            prefix: "bench_".to_string(),
            extension: "mojo".to_string(),
        }
    }
}

impl ArtifactPattern {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// Whether a bare file name follows the convention.
    ///
    /// The identifier between prefix and extension must contain at least one character that is
    /// not a word separator, so every match yields a non-empty display name.
    pub fn matches(&self, file_name: &str) -> bool {
        let Some(rest) = file_name.strip_prefix(self.prefix.as_str()) else {
            return false;
        };
        let Some(identifier) = rest
            .strip_suffix(self.extension.as_str())
            .and_then(|s| s.strip_suffix('.'))
        else {
            return false;
        };
        identifier.chars().any(|c| c != '_')
    }

    /// Shell-style rendering of the pattern, e.g. `bench_*.mojo`.
    pub fn glob(&self) -> String {
        format!("{}*.{}", self.prefix, self.extension)
    }

    /// Build an example file name for guidance text.
    pub fn example(&self, identifier: &str) -> String {
        format!("{}{}.{}", self.prefix, identifier, self.extension)
    }
}

/// Everything the orchestration loop needs besides the launcher and the reporter.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Directory that benchmarks run from and that `benchmarks_dir` is resolved against
    pub project_root: PathBuf,
    /// Benchmarks directory (relative to the project root, or absolute)
    pub benchmarks_dir: PathBuf,
    pub pattern: ArtifactPattern,
    /// Per-benchmark wall-clock budget
    pub timeout: Duration,
    /// Keep only artifacts whose file stem contains this keyword; the extension is never matched
    pub filter: Option<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            benchmarks_dir: PathBuf::from(DEFAULT_BENCHMARKS_DIR),
            pattern: ArtifactPattern::default(),
            timeout: DEFAULT_TIMEOUT,
            filter: None,
        }
    }
}

impl SuiteConfig {
    /// Create a config with default settings rooted at `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    pub fn with_benchmarks_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.benchmarks_dir = dir.into();
        self
    }

    pub fn with_pattern(mut self, pattern: ArtifactPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|k| !k.is_empty());
        self
    }

    /// Absolute-or-root-relative location of the benchmarks directory.
    pub fn benchmarks_path(&self) -> PathBuf {
        resolve_under(&self.project_root, &self.benchmarks_dir)
    }

    /// Reject settings the loop cannot honour.
    pub fn validate(&self) -> Result<(), SuiteError> {
        if self.timeout.is_zero() {
            return Err(SuiteError::InvalidConfig("timeout must be greater than zero".to_string()));
        }
        if self.pattern.extension.is_empty() {
            return Err(SuiteError::InvalidConfig("artifact extension must not be empty".to_string()));
        }
        if self.pattern.extension.starts_with('.') {
            return Err(SuiteError::InvalidConfig(format!(
                "artifact extension '{}' must not start with '.'",
                self.pattern.extension
            )));
        }
        if self.pattern.prefix.is_empty() {
            return Err(SuiteError::InvalidConfig("artifact prefix must not be empty".to_string()));
        }
        Ok(())
    }
}

fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() { path.to_path_buf() } else { root.join(path) }
}

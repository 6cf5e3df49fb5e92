//! Benchmark discovery and project-root resolution

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{ArtifactPattern, BenchmarkArtifact, SuiteError};

/// Find benchmark artifacts that are direct children of `dir`.
///
/// Returns conforming regular files sorted by path. A directory that does not exist yields an
/// empty list; any other listing failure is an error.
pub fn discover_benchmarks(dir: &Path, pattern: &ArtifactPattern) -> Result<Vec<BenchmarkArtifact>, SuiteError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "benchmarks directory does not exist");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(SuiteError::Discovery {
                dir: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SuiteError::Discovery {
            dir: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            tracing::debug!(path = %path.display(), "skipping file with a non-UTF-8 name");
            continue;
        };
        if pattern.matches(name) && path.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    tracing::debug!(dir = %dir.display(), count = paths.len(), "discovered benchmarks");

    Ok(paths
        .into_iter()
        .map(|path| BenchmarkArtifact::new(path, &pattern.prefix))
        .collect())
}

/// Keep the artifacts whose file stem contains `keyword`, preserving order.
///
/// The extension is not part of the match: `-k mojo` selects nothing from `bench_*.mojo`.
pub fn select_benchmarks(artifacts: Vec<BenchmarkArtifact>, keyword: Option<&str>) -> Vec<BenchmarkArtifact> {
    let Some(keyword) = keyword else {
        return artifacts;
    };
    artifacts
        .into_iter()
        .filter(|a| {
            a.path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| stem.contains(keyword))
        })
        .collect()
}

/// Determine the project root benchmarks run from.
///
/// An explicit root wins. Otherwise the ancestors of the running executable are searched for
/// the first directory containing `benchmarks_dir`, falling back to the current directory.
/// The result is always absolute.
pub fn resolve_project_root(explicit: Option<&Path>, benchmarks_dir: &Path) -> Result<PathBuf, SuiteError> {
    if let Some(root) = explicit {
        return std::path::absolute(root).map_err(SuiteError::ProjectRoot);
    }

    match env::current_exe() {
        Ok(exe) => {
            if let Some(root) = find_root_above(&exe, benchmarks_dir) {
                tracing::debug!(root = %root.display(), "resolved project root from executable location");
                return Ok(root);
            }
        }
        Err(e) => tracing::debug!(error = %e, "cannot locate running executable"),
    }

    env::current_dir().map_err(SuiteError::ProjectRoot)
}

/// First ancestor directory of `start` that contains `benchmarks_dir`.
fn find_root_above(start: &Path, benchmarks_dir: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .skip(1)
        .find(|dir| dir.join(benchmarks_dir).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }

    fn names(artifacts: &[BenchmarkArtifact]) -> Vec<String> {
        artifacts.iter().map(|a| a.file_name()).collect()
    }

    #[test]
    fn test_discovers_conforming_files_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["bench_gamma.mojo", "bench_alpha.mojo", "helper.mojo", "bench_x.txt", "bench_beta.mojo"] {
            touch(tmp.path(), name);
        }

        let found = discover_benchmarks(tmp.path(), &ArtifactPattern::default()).unwrap();
        assert_eq!(names(&found), vec!["bench_alpha.mojo", "bench_beta.mojo", "bench_gamma.mojo"]);
        assert_eq!(found[0].name, "Alpha");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let found = discover_benchmarks(&tmp.path().join("nope"), &ArtifactPattern::default()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_does_not_recurse() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "bench_deep.mojo");
        touch(tmp.path(), "bench_top.mojo");

        let found = discover_benchmarks(tmp.path(), &ArtifactPattern::default()).unwrap();
        assert_eq!(names(&found), vec!["bench_top.mojo"]);
    }

    #[test]
    fn test_ignores_directories_named_like_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("bench_dir.mojo")).unwrap();

        let found = discover_benchmarks(tmp.path(), &ArtifactPattern::default()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_path_that_is_a_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "benchmarks");

        let result = discover_benchmarks(&tmp.path().join("benchmarks"), &ArtifactPattern::default());
        assert!(matches!(result, Err(SuiteError::Discovery { .. })));
    }

    #[test]
    fn test_custom_pattern() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "bench_a.py");
        touch(tmp.path(), "bench_b.mojo");

        let found = discover_benchmarks(tmp.path(), &ArtifactPattern::new("bench_", "py")).unwrap();
        assert_eq!(names(&found), vec!["bench_a.py"]);
    }

    #[test]
    fn test_discovery_is_repeatable() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["bench_c.mojo", "bench_a.mojo", "bench_b.mojo"] {
            touch(tmp.path(), name);
        }
        let first = discover_benchmarks(tmp.path(), &ArtifactPattern::default()).unwrap();
        let second = discover_benchmarks(tmp.path(), &ArtifactPattern::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_select_by_keyword() {
        let artifacts = vec![
            BenchmarkArtifact::new("b/bench_sort_merge.mojo", "bench_"),
            BenchmarkArtifact::new("b/bench_hash.mojo", "bench_"),
            BenchmarkArtifact::new("b/bench_sort_quick.mojo", "bench_"),
        ];

        let selected = select_benchmarks(artifacts.clone(), Some("sort"));
        assert_eq!(names(&selected), vec!["bench_sort_merge.mojo", "bench_sort_quick.mojo"]);

        let all = select_benchmarks(artifacts, None);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_select_ignores_extension() {
        let artifacts = vec![BenchmarkArtifact::new("b/bench_hash.mojo", "bench_")];
        assert!(select_benchmarks(artifacts.clone(), Some("mojo")).is_empty());
        assert!(select_benchmarks(artifacts.clone(), Some(".")).is_empty());
        assert_eq!(select_benchmarks(artifacts, Some("bench_h")).len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "bench_ok.mojo");
        let odd = tmp.path().join(OsStr::from_bytes(b"bench_\xff.mojo"));
        // some filesystems refuse non-UTF-8 names outright
        if fs::write(&odd, "").is_err() {
            return;
        }

        let found = discover_benchmarks(tmp.path(), &ArtifactPattern::default()).unwrap();
        assert_eq!(names(&found), vec!["bench_ok.mojo"]);
    }

    #[test]
    fn test_explicit_root_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let root = resolve_project_root(Some(tmp.path()), Path::new("benchmarks")).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn test_relative_explicit_root_is_made_absolute() {
        let root = resolve_project_root(Some(Path::new("some/project")), Path::new("benchmarks")).unwrap();
        assert!(root.is_absolute());
        assert!(root.ends_with("some/project"));
    }

    #[test]
    fn test_find_root_above_executable() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("benchmarks")).unwrap();
        let bin_dir = tmp.path().join("target").join("debug");
        fs::create_dir_all(&bin_dir).unwrap();

        let root = find_root_above(&bin_dir.join("benchsuite"), Path::new("benchmarks")).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn test_find_root_above_none() {
        let tmp = tempfile::tempdir().unwrap();
        let exe = tmp.path().join("bin").join("benchsuite");
        assert!(find_root_above(&exe, Path::new("no-such-benchmarks-dir-8f2c")).is_none());
    }
}

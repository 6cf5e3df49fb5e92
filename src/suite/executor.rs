//! Execution engine: run one artifact as an isolated child process
//!
//! The child gets the project root as its working directory, a null stdin, and piped stdout
//! and stderr. Both pipes are drained on background threads while the engine polls for exit,
//! so a chatty benchmark can never fill a pipe and stall. When the wall-clock budget elapses
//! the child is killed and reaped, and whatever output it produced so far is kept.
//!
//! On unix the child leads its own process group. Anything it forks (a compiled binary, a
//! backgrounded worker) is killed with it, and nothing the benchmark started outlives
//! [`execute`] to overlap the next one.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use super::{BenchmarkArtifact, Launcher, RunOutcome};

/// How often a running child is checked for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long pipe readers may keep draining after the process group is killed.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Run `artifact` to completion, timeout, or launch failure.
///
/// Never fails: every path is classified into a [`RunOutcome`]. Before this returns the child
/// is reaped and, on unix, every process left in its group is killed.
pub fn execute(
    artifact: &BenchmarkArtifact,
    launcher: &dyn Launcher,
    project_root: &Path,
    timeout: Duration,
) -> RunOutcome {
    let start = Instant::now();

    let mut command = launcher.command(&artifact.path);
    command
        .current_dir(project_root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    own_process_group(&mut command);

    tracing::debug!(artifact = %artifact.path.display(), ?command, "launching benchmark");

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            let cause = format!("failed to launch {:?}: {}", command.get_program(), e);
            tracing::warn!(artifact = %artifact.file_name(), %cause, "benchmark could not be launched");
            return RunOutcome::launch_error(cause, start.elapsed());
        }
    };

    let mut output = CapturedOutput {
        stdout: child.stdout.take().map(PipeCapture::spawn),
        stderr: child.stderr.take().map(PipeCapture::spawn),
    };

    let termination = wait_with_budget(&mut child, timeout);

    // After a clean exit, leftover group members may still write until the budget runs out.
    let drain_for = match termination {
        Termination::Exited(_) => timeout.saturating_sub(start.elapsed()),
        Termination::TimedOut | Termination::WaitFailed(_) => DRAIN_GRACE,
    };
    if !output.wait_closed(Instant::now() + drain_for) {
        tracing::warn!(artifact = %artifact.file_name(), "benchmark left processes holding its output; killing them");
        kill_group(&child);
        if !output.wait_closed(Instant::now() + DRAIN_GRACE) {
            tracing::warn!(artifact = %artifact.file_name(), "benchmark output still open; keeping partial output");
        }
    } else {
        // workers that let go of the pipes but are still running
        kill_group(&child);
    }
    let (stdout, stderr) = output.into_text();
    let duration = start.elapsed();

    match termination {
        Termination::Exited(status) => {
            tracing::debug!(artifact = %artifact.file_name(), code = ?status.code(), ?duration, "benchmark exited");
            RunOutcome::completed(status.code(), stdout, stderr, duration)
        }
        Termination::TimedOut => {
            tracing::warn!(artifact = %artifact.file_name(), ?timeout, "benchmark timed out and was killed");
            RunOutcome::timed_out(stdout, stderr, duration)
        }
        Termination::WaitFailed(e) => {
            let cause = format!("failed to wait for benchmark process: {}", e);
            tracing::warn!(artifact = %artifact.file_name(), %cause, "benchmark process lost");
            RunOutcome {
                stdout,
                stderr,
                ..RunOutcome::launch_error(cause, duration)
            }
        }
    }
}

enum Termination {
    Exited(ExitStatus),
    TimedOut,
    WaitFailed(io::Error),
}

/// Poll `child` until it exits or `budget` elapses; on timeout, kill and reap it.
fn wait_with_budget(child: &mut Child, budget: Duration) -> Termination {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Termination::Exited(status),
            Ok(None) => {}
            Err(e) => {
                kill_and_reap(child);
                return Termination::WaitFailed(e);
            }
        }

        let remaining = budget.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            kill_and_reap(child);
            return Termination::TimedOut;
        }
        thread::sleep(remaining.min(POLL_INTERVAL));
    }
}

fn kill_and_reap(child: &mut Child) {
    kill_group(child);
    // kill() fails only if the child already exited, which wait() then reaps
    if let Err(e) = child.kill() {
        tracing::debug!(error = %e, "kill after exit");
    }
    if let Err(e) = child.wait() {
        tracing::warn!(error = %e, "failed to reap benchmark process");
    }
}

#[cfg(unix)]
fn own_process_group(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_command: &mut Command) {}

/// SIGKILL every process in the group `child` leads.
///
/// The group id outlives a reaped leader while any member is alive, so this also reaches
/// workers orphaned by a child that already exited.
#[cfg(unix)]
fn kill_group(child: &Child) {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Ok(pgid) = i32::try_from(child.id()) else {
        return;
    };
    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => tracing::debug!(error = %e, pgid, "failed to signal process group"),
    }
}

#[cfg(not(unix))]
fn kill_group(_child: &Child) {}

/// The two captured streams of one child.
struct CapturedOutput {
    stdout: Option<PipeCapture>,
    stderr: Option<PipeCapture>,
}

impl CapturedOutput {
    /// Wait until both pipes reach EOF or `deadline` passes. Returns whether both closed.
    fn wait_closed(&mut self, deadline: Instant) -> bool {
        let stdout = self.stdout.as_mut().is_none_or(|p| p.wait_closed(deadline));
        let stderr = self.stderr.as_mut().is_none_or(|p| p.wait_closed(deadline));
        stdout && stderr
    }

    fn into_text(self) -> (String, String) {
        (
            self.stdout.map(PipeCapture::into_text).unwrap_or_default(),
            self.stderr.map(PipeCapture::into_text).unwrap_or_default(),
        )
    }
}

/// Background reader that accumulates one pipe into a shared buffer.
struct PipeCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
    closed: bool,
}

impl PipeCapture {
    fn spawn<R: Read + Send + 'static>(mut pipe: R) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buffer);
        let (tx, done) = mpsc::channel();

        thread::spawn(move || {
            let mut chunk = [0u8; 8192];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => {
                        if let Ok(mut buf) = sink.lock() {
                            buf.extend_from_slice(&chunk[..n]);
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(_) => break,
                }
            }
            let _ = tx.send(());
        });

        Self {
            buffer,
            done,
            closed: false,
        }
    }

    /// Wait until `deadline` for the reader to hit EOF.
    fn wait_closed(&mut self, deadline: Instant) -> bool {
        if !self.closed {
            let wait = deadline.saturating_duration_since(Instant::now());
            // a disconnected channel means the reader thread is gone too
            self.closed = !matches!(self.done.recv_timeout(wait), Err(mpsc::RecvTimeoutError::Timeout));
        }
        self.closed
    }

    /// Take whatever has been read so far.
    fn into_text(self) -> String {
        let bytes = match self.buffer.lock() {
            Ok(buf) => buf.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::suite::{InterpreterLauncher, OutcomeKind};
    use std::fs;

    fn script(dir: &Path, name: &str, body: &str) -> BenchmarkArtifact {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        BenchmarkArtifact::new(path, "bench_")
    }

    fn sh() -> InterpreterLauncher {
        InterpreterLauncher::new("sh")
    }

    #[test]
    fn test_captures_stdout_and_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let bench = script(tmp.path(), "bench_io.mojo", "echo out-line\necho err-line >&2\n");

        let outcome = execute(&bench, &sh(), tmp.path(), Duration::from_secs(10));
        assert!(outcome.is_success());
        assert_eq!(outcome.stdout, "out-line\n");
        assert_eq!(outcome.stderr, "err-line\n");
    }

    #[test]
    fn test_nonzero_exit_is_completed_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let bench = script(tmp.path(), "bench_fail.mojo", "echo partial\nexit 3\n");

        let outcome = execute(&bench, &sh(), tmp.path(), Duration::from_secs(10));
        assert_eq!(outcome.kind, OutcomeKind::Completed(Some(3)));
        assert!(!outcome.is_success());
        assert_eq!(outcome.stdout, "partial\n");
    }

    #[test]
    fn test_timeout_kills_child() {
        let tmp = tempfile::tempdir().unwrap();
        let bench = script(tmp.path(), "bench_slow.mojo", "echo started\nexec sleep 30\n");

        let start = Instant::now();
        let outcome = execute(&bench, &sh(), tmp.path(), Duration::from_millis(300));
        assert_eq!(outcome.kind, OutcomeKind::TimedOut);
        assert!(start.elapsed() < Duration::from_secs(10));
        assert_eq!(outcome.stdout, "started\n");
    }

    /// Whether `pid` is still running; a zombie or a vanished pid counts as gone.
    fn is_running(pid: &str) -> bool {
        let ps = std::process::Command::new("ps")
            .args(["-o", "stat=", "-p", pid])
            .output()
            .unwrap();
        let state = String::from_utf8_lossy(&ps.stdout);
        let state = state.trim();
        !state.is_empty() && !state.starts_with('Z')
    }

    /// SIGKILL delivery is asynchronous, so give the worker a moment to actually die.
    fn wait_gone(pid: &str) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while is_running(pid) {
            if Instant::now() > deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(20));
        }
        true
    }

    #[test]
    fn test_timeout_kills_forked_worker() {
        let tmp = tempfile::tempdir().unwrap();
        let bench = script(
            tmp.path(),
            "bench_forks.mojo",
            "sleep 30 &\necho $! > worker.pid\necho started\nwait\n",
        );

        let start = Instant::now();
        let outcome = execute(&bench, &sh(), tmp.path(), Duration::from_millis(500));
        assert_eq!(outcome.kind, OutcomeKind::TimedOut);
        assert!(start.elapsed() < Duration::from_secs(10));
        assert_eq!(outcome.stdout, "started\n");

        let worker = fs::read_to_string(tmp.path().join("worker.pid")).unwrap();
        assert!(wait_gone(worker.trim()), "worker {} outlived its benchmark", worker.trim());
    }

    #[test]
    fn test_worker_left_after_exit_is_killed() {
        let tmp = tempfile::tempdir().unwrap();
        let bench = script(
            tmp.path(),
            "bench_leaks.mojo",
            "sleep 30 &\necho $! > worker.pid\necho done\n",
        );

        let start = Instant::now();
        let outcome = execute(&bench, &sh(), tmp.path(), Duration::from_secs(1));
        assert!(outcome.is_success());
        assert_eq!(outcome.stdout, "done\n");
        assert!(start.elapsed() < Duration::from_secs(10));

        let worker = fs::read_to_string(tmp.path().join("worker.pid")).unwrap();
        assert!(wait_gone(worker.trim()), "worker {} outlived its benchmark", worker.trim());
    }

    #[test]
    fn test_detached_worker_is_killed() {
        let tmp = tempfile::tempdir().unwrap();
        let bench = script(
            tmp.path(),
            "bench_detached.mojo",
            "sleep 30 >/dev/null 2>&1 &\necho $! > worker.pid\n",
        );

        let start = Instant::now();
        let outcome = execute(&bench, &sh(), tmp.path(), Duration::from_secs(10));
        assert!(outcome.is_success());
        assert!(start.elapsed() < Duration::from_secs(5));

        let worker = fs::read_to_string(tmp.path().join("worker.pid")).unwrap();
        assert!(wait_gone(worker.trim()), "worker {} outlived its benchmark", worker.trim());
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let tmp = tempfile::tempdir().unwrap();
        let bench = script(tmp.path(), "bench_a.mojo", "");
        let launcher = InterpreterLauncher::new("/nonexistent/benchsuite-interpreter");

        let outcome = execute(&bench, &launcher, tmp.path(), Duration::from_secs(10));
        match &outcome.kind {
            OutcomeKind::LaunchError(cause) => assert!(cause.contains("benchsuite-interpreter")),
            other => panic!("expected launch error, got {:?}", other),
        }
        assert!(outcome.stdout.is_empty());
    }

    #[test]
    fn test_runs_in_project_root() {
        let root = tempfile::tempdir().unwrap();
        let benches = root.path().join("benchmarks");
        fs::create_dir(&benches).unwrap();
        let bench = script(&benches, "bench_cwd.mojo", "pwd\n");

        let outcome = execute(&bench, &sh(), root.path(), Duration::from_secs(10));
        assert!(outcome.is_success());
        let reported = fs::canonicalize(outcome.stdout.trim()).unwrap();
        assert_eq!(reported, fs::canonicalize(root.path()).unwrap());
    }

    #[test]
    fn test_large_output_does_not_stall() {
        let tmp = tempfile::tempdir().unwrap();
        let bench = script(
            tmp.path(),
            "bench_loud.mojo",
            "i=0\nwhile [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done\n",
        );

        let outcome = execute(&bench, &sh(), tmp.path(), Duration::from_secs(30));
        assert!(outcome.is_success());
        assert_eq!(outcome.stdout.lines().count(), 20000);
    }
}

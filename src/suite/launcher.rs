//! How a benchmark artifact becomes a command line
//!
//! The orchestrator does not know which toolchain runs a benchmark. A [`Launcher`] maps an
//! artifact path to a [`Command`]; the executor then fixes the working directory and the
//! stdio plumbing. Any `Fn(&Path) -> Command` is a launcher, which keeps the loop testable with
//! a fake.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

pub trait Launcher {
    /// Build the command that runs `artifact`.
    fn command(&self, artifact: &Path) -> Command;
}

impl<F> Launcher for F
where
    F: Fn(&Path) -> Command,
{
    fn command(&self, artifact: &Path) -> Command {
        self(artifact)
    }
}

/// Runs each artifact through an interpreter: `<program> [args...] <artifact>`.
///
/// The default is `mojo -I src <artifact>`, where `-I src` puts the project's shared sources on
/// the module search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterLauncher {
    program: OsString,
    args: Vec<OsString>,
}

impl Default for InterpreterLauncher {
    fn default() -> Self {
        Self::new("mojo").with_search_path("-I", "src")
    }
}

impl InterpreterLauncher {
    /// A launcher for `program` with no extra arguments.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    /// Append a search-path flag and its value, e.g. `-I src`.
    pub fn with_search_path(mut self, flag: impl AsRef<OsStr>, path: impl AsRef<OsStr>) -> Self {
        self.args.push(flag.as_ref().to_os_string());
        self.args.push(path.as_ref().to_os_string());
        self
    }

    /// Append a single argument placed before the artifact path.
    pub fn with_arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

impl Launcher for InterpreterLauncher {
    fn command(&self, artifact: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(artifact);
        command
    }
}

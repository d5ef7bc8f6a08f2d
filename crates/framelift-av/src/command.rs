//! Declarative subprocess execution.
//!
//! Pipeline stages describe their invocations as [`CommandSpec`] values and
//! hand them to a [`CommandRunner`]. Production code uses [`SystemRunner`];
//! tests substitute a scripted implementation so pipeline logic can be
//! exercised without spawning real processes.

use crate::{Error, Result};
use std::path::PathBuf;
use std::process::Command;

/// A fully resolved subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Resolved program path.
    pub program: PathBuf,
    /// Arguments, in order.
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a spec with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Render the full command line for logging.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Captured output of a finished subprocess.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Combined stdout and stderr, stdout first.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
            (false, true) => self.stdout.clone(),
            (true, _) => self.stderr.clone(),
        }
    }
}

/// Executes command specs to completion.
pub trait CommandRunner: Send + Sync {
    /// Run the command, capturing stdout and stderr.
    ///
    /// A non-zero exit yields [`Error::CommandFailed`] carrying the combined
    /// captured output.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

/// Runner backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        tracing::debug!("Running: {}", spec.display());

        let output = Command::new(&spec.program).args(&spec.args).output()?;

        let captured = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !output.status.success() {
            return Err(Error::command_failed(
                spec.program.to_string_lossy(),
                output.status.code(),
                captured.combined(),
            ));
        }

        Ok(captured)
    }
}

//! External command execution.
//!
//! Every tool the bootstrap drives (`sh`, `make`) is reached through the
//! [`CommandRunner`] seam. Each [`Invocation`] names its own working directory,
//! so nothing depends on the process's current directory.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::process::Command;
use tracing::{debug, info};

/// A single external command: program, arguments, working directory and
/// extra environment variables layered on top of the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
  pub env: BTreeMap<String, String>,
}

impl Invocation {
  pub fn new(program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.as_ref().to_path_buf(),
      env: BTreeMap::new(),
    }
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }
}

impl fmt::Display for Invocation {
  /// Shell-like rendering, e.g. `CC=musl-gcc sh configure --static`.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (key, value) in &self.env {
      write!(f, "{}={} ", key, value)?;
    }
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// Runs invocations and reports their exit code.
///
/// A non-zero exit is a normal return value, not an error; callers decide what
/// a failure means for their phase. `Err` is reserved for failing to spawn.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
  async fn run(&self, invocation: &Invocation) -> Result<i32, std::io::Error>;
}

/// Runs invocations as child processes with inherited stdio, so the tools'
/// own diagnostics reach the user unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
  async fn run(&self, invocation: &Invocation) -> Result<i32, std::io::Error> {
    info!(cmd = %invocation, cwd = %invocation.cwd.display(), "running");

    let status = Command::new(&invocation.program)
      .args(&invocation.args)
      .current_dir(&invocation.cwd)
      .envs(&invocation.env)
      .status()
      .await?;

    let code = exit_code(status);
    debug!(program = %invocation.program, code, "process exited");
    Ok(code)
  }
}

/// Map an exit status to a shell-style code. Signals become `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
  #[cfg(unix)]
  {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = status.signal() {
      return 128 + signal;
    }
  }
  status.code().unwrap_or(1)
}

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::build::{BuildError, BuildTarget};
use crate::environment::ConfigError;
use crate::fetch::FetchError;

/// Any failure of a bootstrap run, tagged by the phase that raised it.
#[derive(Debug, Error)]
pub enum BootstrapError {
  #[error("configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("fetch error: {0}")]
  Fetch(#[from] FetchError),

  #[error("build error: {0}")]
  Build(#[from] BuildError),
}

impl BootstrapError {
  /// Process exit code for this failure.
  ///
  /// Configuration errors exit with 2, fetch errors with 1, and dependency
  /// build failures with the failing tool's own status.
  pub fn exit_code(&self) -> i32 {
    match self {
      Self::Config(_) => 2,
      Self::Fetch(_) => 1,
      Self::Build(e) => e.exit_code(),
    }
  }
}

/// One step of a bootstrap run, as reported by [`super::plan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PlanStep {
  RemoveStaged { path: PathBuf },
  Clone { url: String, tag: String, dest: PathBuf },
  WriteConfigHeader { path: PathBuf },
  SubstituteCompiler { path: PathBuf, from: String, to: String },
  BuildDependency { name: String, version: String, url: String },
  PatchIncludePaths { include_dirs: Vec<PathBuf> },
  Make { target: BuildTarget, jobs: usize },
}

impl fmt::Display for PlanStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::RemoveStaged { path } => write!(f, "remove {}", path.display()),
      Self::Clone { url, tag, dest } => write!(f, "clone {} at {} into {}", url, tag, dest.display()),
      Self::WriteConfigHeader { path } => write!(f, "write {}", path.display()),
      Self::SubstituteCompiler { path, from, to } => {
        write!(f, "replace {} with {} in {}", from, to, path.display())
      }
      Self::BuildDependency { name, version, url } => write!(f, "build {} {} from {}", name, version, url),
      Self::PatchIncludePaths { include_dirs } => {
        let dirs: Vec<String> = include_dirs.iter().map(|d| d.display().to_string()).collect();
        write!(f, "append include paths {}", dirs.join(" "))
      }
      Self::Make { target, jobs } => write!(f, "make -j{} {}", jobs, target),
    }
  }
}

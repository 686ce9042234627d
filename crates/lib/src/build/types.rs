use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetch::FetchError;

/// Named targets of the htslib makefile this tool invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildTarget {
  #[serde(rename = "lib-static")]
  LibStatic,
  #[serde(rename = "lib-shared")]
  LibShared,
  #[serde(rename = "lib-static-musl")]
  LibStaticMusl,
}

impl BuildTarget {
  /// The make target name.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::LibStatic => "lib-static",
      Self::LibShared => "lib-shared",
      Self::LibStaticMusl => "lib-static-musl",
    }
  }

  /// True for the musl target, after which nothing else is invoked.
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::LibStaticMusl)
  }
}

impl fmt::Display for BuildTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Outcome of the final build invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
  pub exit_code: i32,
  #[serde(rename = "target")]
  pub target_invoked: BuildTarget,
}

impl BuildResult {
  pub fn is_success(&self) -> bool {
    self.exit_code == 0
  }
}

/// Errors raised while building dependencies or patching the staged tree.
#[derive(Debug, Error)]
pub enum BuildError {
  /// A dependency's configure or make step exited non-zero.
  #[error("{dependency}: '{step}' failed with exit code {code}")]
  DependencyCompileFailed {
    dependency: String,
    step: String,
    code: i32,
  },

  /// An external tool could not be started at all.
  #[error("failed to run '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// Reading or rewriting a build configuration file failed.
  #[error("failed to patch '{path}': {source}")]
  Patch {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The variable a patch appends to is not assigned in the file.
  #[error("'{pattern}' not found in '{path}'")]
  PatchTargetMissing { path: PathBuf, pattern: String },

  /// A built artifact could not be found or copied.
  #[error("failed to copy '{from}' to '{to}': {source}")]
  CopyArtifact {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Retrieving or unpacking a dependency archive failed.
  #[error(transparent)]
  Fetch(#[from] FetchError),
}

impl BuildError {
  /// Exit code for this failure. A failed sub-build's own status is kept.
  pub fn exit_code(&self) -> i32 {
    match self {
      Self::DependencyCompileFailed { code, .. } if *code != 0 => *code,
      _ => 1,
    }
  }
}

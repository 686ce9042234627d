//! Types for the resolved build environment.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::TargetTriple;

/// Kind of library artifact requested for a native build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryMode {
  Static,
  #[default]
  Shared,
}

impl LibraryMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Static => "static",
      Self::Shared => "shared",
    }
  }
}

impl fmt::Display for LibraryMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Unvalidated inputs, one string per recognized option.
///
/// Empty strings and `None` are treated the same way by [`super::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
  pub output_dir: Option<String>,
  pub library_version: Option<String>,
  pub target_triple: Option<String>,
  pub library_mode: Option<String>,
}

/// Effective configuration for one bootstrap run.
///
/// Built once by [`super::resolve`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEnvironment {
  pub output_dir: PathBuf,
  pub library_version: String,
  pub target_triple: TargetTriple,
  pub library_mode: LibraryMode,
}

/// Errors raised while validating raw inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  /// No output directory was given, or it is not an existing directory.
  #[error("output directory is missing or not a directory: '{0}'")]
  MissingOutputDir(String),

  /// The output directory exists but a file cannot be created in it.
  #[error("output directory is not writable: '{path}': {reason}")]
  NotWritable { path: String, reason: String },

  /// The library mode is not one of `static`, `shared` or empty.
  #[error("invalid library mode '{0}' (expected 'static' or 'shared')")]
  InvalidMode(String),
}

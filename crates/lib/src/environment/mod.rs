//! Environment resolution.
//!
//! Turns raw option strings into a validated [`BuildEnvironment`]. Nothing here
//! touches the network. The only filesystem access is checking that the output
//! directory exists and accepts a scratch file, which is removed again.

mod types;

pub use types::*;

use std::path::Path;

use tracing::debug;

use crate::consts::DEFAULT_HTSLIB_VERSION;
use crate::platform::TargetTriple;

/// Environment variables the inputs fall back to when no flag is given.
pub mod vars {
  pub const OUT_DIR: &str = "OUT_DIR";
  pub const HTSLIB_VERSION: &str = "HTSLIB_VERSION";
  pub const TARGET: &str = "TARGET";
  pub const HTSLIB_MODE: &str = "HTSLIB_MODE";
  pub const HTSBUILD_JOBS: &str = "HTSBUILD_JOBS";
}

/// Validate raw inputs and fill in defaults.
///
/// The output directory is made absolute so paths derived from it stay valid
/// inside child processes with a different working directory.
///
/// # Errors
///
/// - [`ConfigError::MissingOutputDir`] if the output directory is empty or
///   does not name an existing directory.
/// - [`ConfigError::NotWritable`] if a file cannot be created in it.
/// - [`ConfigError::InvalidMode`] if the mode is not `static`, `shared` or empty.
pub fn resolve(raw: &RawInputs) -> Result<BuildEnvironment, ConfigError> {
  let output_dir = non_empty(raw.output_dir.as_deref()).ok_or_else(|| ConfigError::MissingOutputDir(String::new()))?;
  let output_path = std::path::absolute(output_dir).map_err(|_| ConfigError::MissingOutputDir(output_dir.to_string()))?;
  if !output_path.is_dir() {
    return Err(ConfigError::MissingOutputDir(output_dir.to_string()));
  }
  check_writable(&output_path)?;

  let library_version = non_empty(raw.library_version.as_deref())
    .unwrap_or(DEFAULT_HTSLIB_VERSION)
    .to_string();

  let target_triple = TargetTriple::new(raw.target_triple.clone().unwrap_or_default());

  let library_mode = parse_mode(raw.library_mode.as_deref().unwrap_or_default())?;

  debug!(
    output_dir = %output_path.display(),
    version = %library_version,
    target = %target_triple,
    mode = %library_mode,
    "resolved build environment"
  );

  Ok(BuildEnvironment {
    output_dir: output_path,
    library_version,
    target_triple,
    library_mode,
  })
}

/// Create and drop a scratch file in `dir`.
fn check_writable(dir: &Path) -> Result<(), ConfigError> {
  tempfile::Builder::new()
    .prefix(".htsbuild-")
    .tempfile_in(dir)
    .map(drop)
    .map_err(|e| ConfigError::NotWritable {
      path: dir.display().to_string(),
      reason: e.to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.is_empty())
}

fn parse_mode(raw: &str) -> Result<LibraryMode, ConfigError> {
  match raw {
    "static" => Ok(LibraryMode::Static),
    "shared" | "" => Ok(LibraryMode::Shared),
    other => Err(ConfigError::InvalidMode(other.to_string())),
  }
}

//! Source retrieval.
//!
//! This module handles:
//! - Staging htslib at a given tag under `<output_dir>/htslib`
//! - Writing the fixed `config.h` the htslib makefile expects
//! - Downloading and unpacking the pinned dependency archives
//!
//! Retrieval goes through the [`SourceFetcher`] and [`ArchiveFetcher`] seams;
//! [`GitFetcher`] and [`HttpFetcher`] are the real implementations.

pub mod archive;
pub mod git;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{CONFIG_H, CONFIG_H_NAME, HTSLIB_REPO, STAGED_DIR_NAME};
use crate::environment::BuildEnvironment;

pub use archive::{ArchiveFetcher, HttpFetcher, unpack_tar_gz};
pub use git::GitFetcher;

/// Errors that can occur while retrieving sources.
#[derive(Debug, Error)]
pub enum FetchError {
  /// The remote could not be reached or the transfer failed.
  #[error("failed to reach '{url}': {source}")]
  NetworkUnavailable {
    url: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  /// The requested tag does not exist upstream.
  #[error("version '{version}' not found in '{url}'")]
  VersionNotFound { url: String, version: String },

  /// The server answered with a non-success status.
  #[error("download of '{url}' failed: HTTP {status}")]
  HttpStatus { url: String, status: u16 },

  /// SHA256 hash mismatch after download.
  #[error("hash mismatch for {url}: expected {expected}, got {actual}")]
  HashMismatch {
    url: String,
    expected: String,
    actual: String,
  },

  /// Filesystem operation on the staging area failed.
  #[error("failed to stage '{path}': {source}")]
  Stage {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// An archive entry would be written outside the extraction directory.
  #[error("archive '{archive}' has an entry outside its root: '{entry}'")]
  UnsafeEntry { archive: PathBuf, entry: PathBuf },

  /// The background retrieval task did not complete.
  #[error("retrieval task aborted: {0}")]
  Aborted(String),
}

/// Retrieves a source tree at an exact tag into a destination directory.
///
/// The destination does not exist when this is called.
#[allow(async_fn_in_trait)]
pub trait SourceFetcher {
  async fn fetch_tag(&self, url: &str, tag: &str, dest: &Path) -> Result<(), FetchError>;
}

/// Returns `<output_dir>/htslib`.
pub fn staged_path(output_dir: &Path) -> PathBuf {
  output_dir.join(STAGED_DIR_NAME)
}

/// Stage htslib at `env.library_version` under the output directory.
///
/// Any existing staged tree is removed first, so repeated calls converge on
/// the same state. After retrieval `config.h` is written with fixed content.
///
/// # Returns
///
/// The path of the staged tree.
pub async fn fetch_library(env: &BuildEnvironment, source: &impl SourceFetcher) -> Result<PathBuf, FetchError> {
  let staged = staged_path(&env.output_dir);

  remove_dir_if_exists(&staged).await?;

  info!(version = %env.library_version, path = %staged.display(), "fetching htslib");
  source.fetch_tag(HTSLIB_REPO, &env.library_version, &staged).await?;

  write_config_header(&staged).await?;

  Ok(staged)
}

/// Remove a directory tree. A missing directory is not an error.
pub async fn remove_dir_if_exists(path: &Path) -> Result<(), FetchError> {
  match tokio::fs::remove_dir_all(path).await {
    Ok(()) => {
      debug!(path = %path.display(), "removed stale directory");
      Ok(())
    }
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(FetchError::Stage {
      path: path.to_path_buf(),
      source: e,
    }),
  }
}

async fn write_config_header(staged: &Path) -> Result<(), FetchError> {
  let path = staged.join(CONFIG_H_NAME);
  tokio::fs::write(&path, CONFIG_H)
    .await
    .map_err(|e| FetchError::Stage { path: path.clone(), source: e })?;
  debug!(path = %path.display(), "wrote config header");
  Ok(())
}

//! Git retrieval backed by `gix`.

use std::path::Path;

use tracing::{debug, info};

use super::{FetchError, SourceFetcher};

/// Clones a repository at a tag using `gix`.
///
/// `gix` is blocking, so the clone runs on tokio's blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitFetcher;

impl SourceFetcher for GitFetcher {
  async fn fetch_tag(&self, url: &str, tag: &str, dest: &Path) -> Result<(), FetchError> {
    let url = url.to_string();
    let tag = tag.to_string();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || clone_tag(&url, &tag, &dest))
      .await
      .map_err(|e| FetchError::Aborted(e.to_string()))?
  }
}

/// Clone `url` into `dest` and check out the worktree at `tag`.
fn clone_tag(url: &str, tag: &str, dest: &Path) -> Result<(), FetchError> {
  info!(url, tag, path = %dest.display(), "cloning repository");

  let prepared = gix::prepare_clone(url, dest).map_err(|e| match e {
    gix::clone::Error::Init(e) => FetchError::Stage {
      path: dest.to_path_buf(),
      source: std::io::Error::other(e),
    },
    other => network(url, other),
  })?;

  let mut prepared = prepared
    .with_ref_name(Some(tag))
    .map_err(|_| version_not_found(url, tag))?;

  let (mut checkout, _outcome) = prepared
    .fetch_then_checkout(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED)
    .map_err(|e| match e {
      gix::clone::fetch::Error::RefNameMissing { .. } => version_not_found(url, tag),
      other => network(url, other),
    })?;

  let (repo, _outcome) = checkout
    .main_worktree(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED)
    .map_err(|e| FetchError::Stage {
      path: dest.to_path_buf(),
      source: std::io::Error::other(e),
    })?;

  debug!(tag, head = ?repo.head_id().ok(), "checked out");
  Ok(())
}

fn network(url: &str, e: impl std::error::Error + Send + Sync + 'static) -> FetchError {
  FetchError::NetworkUnavailable {
    url: url.to_string(),
    source: Box::new(e),
  }
}

fn version_not_found(url: &str, tag: &str) -> FetchError {
  FetchError::VersionNotFound {
    url: url.to_string(),
    version: tag.to_string(),
  }
}

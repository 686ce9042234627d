//! Dependency archive download and extraction.
//!
//! Archives are downloaded into a downloads directory, verified against a
//! pinned SHA256 and reused on later runs while the hash still matches.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use tar::Archive;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::FetchError;

/// Downloads an archive into `downloads_dir` and returns its local path.
#[allow(async_fn_in_trait)]
pub trait ArchiveFetcher {
  async fn fetch_archive(&self, url: &str, expected_sha256: &str, downloads_dir: &Path) -> Result<PathBuf, FetchError>;
}

/// Fetches archives over HTTP(S) with `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
  client: reqwest::Client,
}

impl HttpFetcher {
  pub fn new() -> Self {
    Self::default()
  }
}

impl ArchiveFetcher for HttpFetcher {
  async fn fetch_archive(&self, url: &str, expected_sha256: &str, downloads_dir: &Path) -> Result<PathBuf, FetchError> {
    info!(url = %url, "fetching archive");

    tokio::fs::create_dir_all(downloads_dir)
      .await
      .map_err(|e| stage_err(downloads_dir, e))?;

    let dest_path = downloads_dir.join(url_to_filename(url));

    if dest_path.exists() {
      debug!(path = ?dest_path, "checking cached archive");
      if let Ok(actual_hash) = hash_file(&dest_path).await {
        if actual_hash == expected_sha256 {
          info!(path = ?dest_path, "using cached archive");
          return Ok(dest_path);
        }
        debug!(expected = %expected_sha256, actual = %actual_hash, "cached archive hash mismatch, re-downloading");
      }
    }

    let response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| FetchError::NetworkUnavailable {
        url: url.to_string(),
        source: Box::new(e),
      })?;

    if !response.status().is_success() {
      return Err(FetchError::HttpStatus {
        url: url.to_string(),
        status: response.status().as_u16(),
      });
    }

    let bytes = response.bytes().await.map_err(|e| FetchError::NetworkUnavailable {
      url: url.to_string(),
      source: Box::new(e),
    })?;

    verify_sha256(url, &bytes, expected_sha256)?;

    let mut file = tokio::fs::File::create(&dest_path)
      .await
      .map_err(|e| stage_err(&dest_path, e))?;
    file.write_all(&bytes).await.map_err(|e| stage_err(&dest_path, e))?;
    file.flush().await.map_err(|e| stage_err(&dest_path, e))?;

    info!(path = ?dest_path, size = bytes.len(), "download complete");

    Ok(dest_path)
  }
}

/// Check `bytes` against a lowercase hex SHA256.
pub fn verify_sha256(url: &str, bytes: &[u8], expected_sha256: &str) -> Result<(), FetchError> {
  let actual = hash_bytes(bytes);
  if actual != expected_sha256 {
    return Err(FetchError::HashMismatch {
      url: url.to_string(),
      expected: expected_sha256.to_string(),
      actual,
    });
  }
  Ok(())
}

pub fn hash_bytes(bytes: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  hex::encode(hasher.finalize())
}

async fn hash_file(path: &Path) -> Result<String, std::io::Error> {
  let bytes = tokio::fs::read(path).await?;
  Ok(hash_bytes(&bytes))
}

/// Last path component of the URL, without query string.
fn url_to_filename(url: &str) -> String {
  let name = url
    .rsplit('/')
    .next()
    .and_then(|segment| segment.split('?').next())
    .unwrap_or_default();

  if name.is_empty() || name == "." || name == ".." {
    format!("download_{}", &hash_bytes(url.as_bytes())[..16])
  } else {
    name.to_string()
  }
}

/// Unpack a `.tar.gz` archive into `dest`, dropping the archive's top-level
/// directory (e.g., `zlib-1.2.11/`).
///
/// Entries that would land outside `dest` abort the extraction.
pub fn unpack_tar_gz(archive_path: &Path, dest: &Path) -> Result<(), FetchError> {
  let file = File::open(archive_path).map_err(|e| stage_err(archive_path, e))?;
  let decoder = GzDecoder::new(BufReader::new(file));
  let mut archive = Archive::new(decoder);

  fs::create_dir_all(dest).map_err(|e| stage_err(dest, e))?;

  let entries = archive.entries().map_err(|e| stage_err(archive_path, e))?;
  for entry in entries {
    let mut entry = entry.map_err(|e| stage_err(archive_path, e))?;
    let path = entry.path().map_err(|e| stage_err(archive_path, e))?;

    let stripped: PathBuf = path.components().skip(1).collect();
    if stripped.as_os_str().is_empty() {
      continue;
    }
    if !stripped.components().all(|c| matches!(c, Component::Normal(_))) {
      return Err(FetchError::UnsafeEntry {
        archive: archive_path.to_path_buf(),
        entry: path.into_owned(),
      });
    }

    let dest_path = dest.join(&stripped);
    if let Some(parent) = dest_path.parent() {
      fs::create_dir_all(parent).map_err(|e| stage_err(parent, e))?;
    }

    entry.unpack(&dest_path).map_err(|e| stage_err(&dest_path, e))?;
  }

  debug!(archive = %archive_path.display(), dest = %dest.display(), "unpacked archive");
  Ok(())
}

fn stage_err(path: &Path, source: std::io::Error) -> FetchError {
  FetchError::Stage {
    path: path.to_path_buf(),
    source,
  }
}

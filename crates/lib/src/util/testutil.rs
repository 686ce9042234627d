//! Test doubles for the collaborator seams.
//!
//! - [`LocalSource`] stands in for git: it writes a small htslib-like tree.
//! - [`FakeArchives`] serves in-memory tarballs for the pinned dependencies.
//! - [`RecordingRunner`] records invocations and fakes `make` outputs.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::exec::{CommandRunner, Invocation};
use crate::fetch::{ArchiveFetcher, FetchError, SourceFetcher};

/// Trimmed-down htslib makefile with the variables the patcher touches.
pub fn fake_makefile() -> &'static str {
  "CC     = gcc\nAR     = ar\nRANLIB = ranlib\n\nCPPFLAGS =\nCFLAGS   = -g -Wall -O2\nLDFLAGS  =\n\nlib-static: libhts.a\n"
}

/// Build a `.tar.gz` from `(path, content)` pairs.
pub fn tar_gz(entries: &[(&str, &str)]) -> Vec<u8> {
  let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
  for (path, content) in entries {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, path, content.as_bytes()).unwrap();
  }
  builder.into_inner().unwrap().finish().unwrap()
}

/// Source fetcher that knows a fixed set of tags and records every request.
#[derive(Debug, Clone)]
pub struct LocalSource {
  tags: Vec<String>,
  requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl LocalSource {
  pub fn new() -> Self {
    Self {
      tags: vec!["1.9".to_string(), "1.10".to_string()],
      requests: Arc::default(),
    }
  }

  pub fn requests(&self) -> Vec<(String, String)> {
    self.requests.lock().unwrap().clone()
  }
}

impl Default for LocalSource {
  fn default() -> Self {
    Self::new()
  }
}

impl SourceFetcher for LocalSource {
  async fn fetch_tag(&self, url: &str, tag: &str, dest: &Path) -> Result<(), FetchError> {
    self.requests.lock().unwrap().push((url.to_string(), tag.to_string()));

    if !self.tags.iter().any(|t| t == tag) {
      return Err(FetchError::VersionNotFound {
        url: url.to_string(),
        version: tag.to_string(),
      });
    }

    std::fs::create_dir_all(dest).unwrap();
    std::fs::write(dest.join("Makefile"), fake_makefile()).unwrap();
    std::fs::write(dest.join("version.sh"), format!("echo {}\n", tag)).unwrap();
    Ok(())
  }
}

/// Archive fetcher serving tiny zlib and bzip2 source tarballs.
#[derive(Debug, Clone, Default)]
pub struct FakeArchives {
  offline: bool,
}

impl FakeArchives {
  pub fn new() -> Self {
    Self::default()
  }

  /// Every request fails as if the network were down.
  pub fn offline() -> Self {
    Self { offline: true }
  }
}

impl ArchiveFetcher for FakeArchives {
  async fn fetch_archive(&self, url: &str, _expected_sha256: &str, downloads_dir: &Path) -> Result<PathBuf, FetchError> {
    if self.offline {
      return Err(FetchError::NetworkUnavailable {
        url: url.to_string(),
        source: Box::new(std::io::Error::from(std::io::ErrorKind::ConnectionRefused)),
      });
    }

    let filename = url.rsplit('/').next().unwrap();
    let top = filename.trim_end_matches(".tar.gz");
    let bytes = if top.starts_with("zlib") {
      let configure = format!("{}/configure", top);
      let header = format!("{}/zlib.h", top);
      tar_gz(&[(configure.as_str(), "#!/bin/sh\n"), (header.as_str(), "/* zlib */\n")])
    } else {
      let makefile = format!("{}/Makefile", top);
      let header = format!("{}/bzlib.h", top);
      tar_gz(&[
        (makefile.as_str(), "CC=gcc\nAR=ar\n\nlibbz2.a:\n\t$(CC) -c blocksort.c\n"),
        (header.as_str(), "/* bzlib */\n"),
      ])
    };

    std::fs::create_dir_all(downloads_dir).unwrap();
    let path = downloads_dir.join(filename);
    std::fs::write(&path, bytes).unwrap();
    Ok(path)
  }
}

/// Command runner that records invocations instead of spawning processes.
///
/// A successful `make` whose last argument ends in `.a` creates that file in
/// the invocation's working directory, mimicking a real library build.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
  invocations: Arc<Mutex<Vec<Invocation>>>,
  failures: Vec<(String, i32)>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Return `code` for the invocation rendering as `command`.
  pub fn fail_on(mut self, command: &str, code: i32) -> Self {
    self.failures.push((command.to_string(), code));
    self
  }

  pub fn invocations(&self) -> Vec<Invocation> {
    self.invocations.lock().unwrap().clone()
  }
}

impl CommandRunner for RecordingRunner {
  async fn run(&self, invocation: &Invocation) -> Result<i32, std::io::Error> {
    self.invocations.lock().unwrap().push(invocation.clone());

    let rendered = invocation.to_string();
    if let Some((_, code)) = self.failures.iter().find(|(cmd, _)| *cmd == rendered) {
      return Ok(*code);
    }

    let library = invocation
      .args
      .last()
      .filter(|a| invocation.program == "make" && a.ends_with(".a"));
    if let Some(lib) = library {
      std::fs::write(invocation.cwd.join(lib), "!<arch>\n")?;
    }
    Ok(0)
  }
}

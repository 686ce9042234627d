use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

use htsbuild_lib::environment::RawInputs;
use htsbuild_lib::fetch::{ArchiveFetcher, FetchError, SourceFetcher};

pub const MUSL_TARGET: &str = "x86_64-unknown-linux-musl";

/// True when `make` can be spawned. Tests skip themselves otherwise.
pub fn has_make() -> bool {
  std::process::Command::new("make")
    .arg("--version")
    .stdout(std::process::Stdio::null())
    .status()
    .is_ok()
}

pub const HTSLIB_MAKEFILE: &str = "CC       = gcc
CPPFLAGS =
CFLAGS   = -O2

lib-static:
\ttouch libhts.a

lib-shared:
\ttouch libhts.so

lib-static-musl:
\techo \"$(CC) $(CPPFLAGS)\" > flags.txt
\ttouch libhts.a
";

/// Writes a makefile-only htslib tree for the one tag it knows.
pub struct MakefileSource {
  pub tag: String,
  pub makefile: String,
}

impl MakefileSource {
  pub fn new(makefile: &str) -> Self {
    Self {
      tag: "1.9".to_string(),
      makefile: makefile.to_string(),
    }
  }
}

impl SourceFetcher for MakefileSource {
  async fn fetch_tag(&self, url: &str, tag: &str, dest: &Path) -> Result<(), FetchError> {
    if tag != self.tag {
      return Err(FetchError::VersionNotFound {
        url: url.to_string(),
        version: tag.to_string(),
      });
    }
    std::fs::create_dir_all(dest).unwrap();
    std::fs::write(dest.join("Makefile"), &self.makefile).unwrap();
    Ok(())
  }
}

/// Serves zlib and bzip2 tarballs whose build steps only record the compiler.
pub struct ScriptedArchives {
  pub zlib_configure: String,
}

impl Default for ScriptedArchives {
  fn default() -> Self {
    Self {
      zlib_configure: "echo \"CC=$CC\" > configured.txt\n".to_string(),
    }
  }
}

impl ArchiveFetcher for ScriptedArchives {
  async fn fetch_archive(&self, url: &str, _expected_sha256: &str, downloads_dir: &Path) -> Result<PathBuf, FetchError> {
    let filename = url.rsplit('/').next().unwrap();
    let top = filename.trim_end_matches(".tar.gz");

    let entries: Vec<(String, &str)> = if top.starts_with("zlib") {
      vec![
        (format!("{}/configure", top), self.zlib_configure.as_str()),
        (format!("{}/Makefile", top), "libz.a:\n\ttouch libz.a\n"),
        (format!("{}/zlib.h", top), "/* zlib */\n"),
      ]
    } else {
      vec![
        (
          format!("{}/Makefile", top),
          "CC=gcc\n\nlibbz2.a:\n\techo $(CC) > cc.txt\n\ttouch libbz2.a\n",
        ),
        (format!("{}/bzlib.h", top), "/* bzlib */\n"),
      ]
    };

    std::fs::create_dir_all(downloads_dir).unwrap();
    let path = downloads_dir.join(filename);
    std::fs::write(&path, tar_gz(&entries)).unwrap();
    Ok(path)
  }
}

fn tar_gz(entries: &[(String, &str)]) -> Vec<u8> {
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

pub fn inputs(out: &TempDir, target: &str, mode: &str) -> RawInputs {
  RawInputs {
    output_dir: Some(out.path().to_string_lossy().to_string()),
    library_version: None,
    target_triple: Some(target.to_string()),
    library_mode: Some(mode.to_string()),
  }
}

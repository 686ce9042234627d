use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How a dependency's sources are turned into a static library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipe {
  /// Run `./configure --static` with `CC` set, then `make <target>`.
  Configure,
  /// Rewrite the compiler inside the shipped `Makefile`, then `make <target>`.
  PatchMakefile,
}

/// A pinned third-party dependency built for musl targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DependencySpec {
  pub name: &'static str,
  pub version: &'static str,
  pub archive_url: &'static str,
  /// Lowercase hex SHA256 of the archive.
  pub sha256: &'static str,
  /// File produced by the build and copied into the staged root.
  pub library: &'static str,
  pub recipe: Recipe,
}

impl DependencySpec {
  /// Directory the archive is unpacked into, e.g. `zlib-1.2.11`.
  pub fn source_dir_name(&self) -> String {
    format!("{}-{}", self.name, self.version)
  }
}

/// General-purpose compressor.
pub const ZLIB: DependencySpec = DependencySpec {
  name: "zlib",
  version: "1.2.11",
  archive_url: "https://zlib.net/fossils/zlib-1.2.11.tar.gz",
  sha256: "c3e5e9fdd5004dcb542feda5ee4f0ff0744628baf8ed2dd5d66f8ca1197cb1a1",
  library: "libz.a",
  recipe: Recipe::Configure,
};

/// Block-sort compressor.
pub const BZIP2: DependencySpec = DependencySpec {
  name: "bzip2",
  version: "1.0.6",
  archive_url: "https://sourceware.org/pub/bzip2/bzip2-1.0.6.tar.gz",
  sha256: "a2848f34fcd5d6cf47def00461fcb528a0484d8edef8208d6d2e2909dc61d9cd",
  library: "libbz2.a",
  recipe: Recipe::PatchMakefile,
};

/// Build order. zlib comes first; the include patch references both.
pub const DEPENDENCIES: [DependencySpec; 2] = [ZLIB, BZIP2];

/// A dependency's build output as seen by the configuration patcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltArtifact {
  pub static_library: PathBuf,
  pub include_dir: PathBuf,
}

//! Fixed values shared across the bootstrap phases.

/// Upstream htslib repository, cloned by tag.
pub const HTSLIB_REPO: &str = "https://github.com/samtools/htslib.git";

/// Tag checked out when no version override is given.
pub const DEFAULT_HTSLIB_VERSION: &str = "1.9";

/// Name of the staged source tree under the output directory.
pub const STAGED_DIR_NAME: &str = "htslib";

/// Downloaded archives are kept here, relative to the output directory.
pub const DOWNLOADS_DIR_NAME: &str = "downloads";

/// htslib's build does not regenerate this header, so it has to be present
/// byte-for-byte before `make` runs.
pub const CONFIG_H: &str = "#define HAVE_LIBBZ2 1\n#define HAVE_DRAND48 1\n";

pub const CONFIG_H_NAME: &str = "config.h";

pub const MAKEFILE_NAME: &str = "Makefile";

pub const NATIVE_CC: &str = "gcc";

pub const MUSL_CC: &str = "musl-gcc";

/// Substring of a target triple that selects the musl branch.
pub const MUSL_TOKEN: &str = "musl";

/// Default cap on concurrent `make` jobs.
pub const DEFAULT_JOBS: usize = 8;

/// Makefile variable that receives the dependency include paths.
pub const CPPFLAGS_ASSIGNMENT: &str = "CPPFLAGS =";

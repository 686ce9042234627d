//! Cross-compiled compression dependencies for musl targets.
//!
//! htslib links against zlib and bzip2. A musl build cannot use the host's
//! copies, so both are built from pinned archives with the musl compiler and
//! their static libraries dropped into the staged htslib root.

mod types;

pub use types::*;

use std::path::Path;

use tracing::{debug, info};

use crate::build::BuildError;
use crate::consts::{MAKEFILE_NAME, MUSL_CC, NATIVE_CC};
use crate::exec::{CommandRunner, Invocation};
use crate::fetch::{ArchiveFetcher, remove_dir_if_exists, unpack_tar_gz};
use crate::patch::substitute_compiler;
use crate::platform::TargetTriple;

/// Build the compression dependencies for a musl target.
///
/// Steps, in order:
/// 1. Switch the staged htslib makefile from `gcc` to `musl-gcc`
/// 2. Build zlib (configure + make) and copy `libz.a` into `staged`
/// 3. Build bzip2 (patched makefile + make) and copy `libbz2.a` into `staged`
///
/// Returns the artifacts in build order. For a non-musl target nothing runs
/// and the list is empty. The first failing step aborts the whole phase.
pub async fn build_cross_deps(
  target: &TargetTriple,
  staged: &Path,
  downloads_dir: &Path,
  jobs: usize,
  archives: &impl ArchiveFetcher,
  runner: &impl CommandRunner,
) -> Result<Vec<BuiltArtifact>, BuildError> {
  if !target.is_musl() {
    debug!(target = %target, "not a musl target, skipping dependency builds");
    return Ok(Vec::new());
  }

  info!(target = %target, cc = MUSL_CC, "building musl dependencies");
  substitute_compiler(&staged.join(MAKEFILE_NAME), NATIVE_CC, MUSL_CC).await?;

  let mut artifacts = Vec::with_capacity(DEPENDENCIES.len());
  for spec in &DEPENDENCIES {
    artifacts.push(build_dependency(spec, staged, downloads_dir, jobs, archives, runner).await?);
  }
  Ok(artifacts)
}

async fn build_dependency(
  spec: &DependencySpec,
  staged: &Path,
  downloads_dir: &Path,
  jobs: usize,
  archives: &impl ArchiveFetcher,
  runner: &impl CommandRunner,
) -> Result<BuiltArtifact, BuildError> {
  info!(name = spec.name, version = spec.version, "building dependency");

  let archive = archives
    .fetch_archive(spec.archive_url, spec.sha256, downloads_dir)
    .await?;

  let source_dir = staged.join(spec.source_dir_name());
  remove_dir_if_exists(&source_dir).await?;
  unpack_tar_gz(&archive, &source_dir)?;

  match spec.recipe {
    Recipe::Configure => {
      let configure = Invocation::new("sh", &source_dir)
        .args(["configure", "--static"])
        .env("CC", MUSL_CC);
      run_step(spec, runner, &configure).await?;
    }
    Recipe::PatchMakefile => {
      substitute_compiler(&source_dir.join(MAKEFILE_NAME), NATIVE_CC, MUSL_CC).await?;
    }
  }

  let make = Invocation::new("make", &source_dir).args([format!("-j{}", jobs), spec.library.to_string()]);
  run_step(spec, runner, &make).await?;

  let built = source_dir.join(spec.library);
  let static_library = staged.join(spec.library);
  tokio::fs::copy(&built, &static_library)
    .await
    .map_err(|e| BuildError::CopyArtifact {
      from: built.clone(),
      to: static_library.clone(),
      source: e,
    })?;

  debug!(library = %static_library.display(), "dependency ready");

  Ok(BuiltArtifact {
    static_library,
    include_dir: source_dir,
  })
}

async fn run_step(spec: &DependencySpec, runner: &impl CommandRunner, invocation: &Invocation) -> Result<(), BuildError> {
  let code = runner.run(invocation).await.map_err(|e| BuildError::Spawn {
    program: invocation.program.clone(),
    source: e,
  })?;

  if code != 0 {
    return Err(BuildError::DependencyCompileFailed {
      dependency: spec.source_dir_name(),
      step: invocation.to_string(),
      code,
    });
  }
  Ok(())
}

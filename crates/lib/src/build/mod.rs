//! Final htslib build invocation.
//!
//! Chooses one make target and runs it in the staged tree:
//!
//! 1. musl target -> `lib-static-musl` (terminal; the requested mode is ignored)
//! 2. static mode -> `lib-static`
//! 3. otherwise   -> `lib-shared`

mod types;

pub use types::*;

use std::path::Path;

use tracing::{info, warn};

use crate::environment::LibraryMode;
use crate::exec::{CommandRunner, Invocation};
use crate::platform::TargetTriple;

/// Pick the make target for a target triple and library mode.
pub fn select_target(target: &TargetTriple, mode: LibraryMode) -> BuildTarget {
  if target.is_musl() {
    BuildTarget::LibStaticMusl
  } else if mode == LibraryMode::Static {
    BuildTarget::LibStatic
  } else {
    BuildTarget::LibShared
  }
}

/// The `make` invocation for `build_target`, capped at `jobs` parallel jobs.
pub fn make_invocation(staged: &Path, build_target: BuildTarget, jobs: usize) -> Invocation {
  Invocation::new("make", staged).args([format!("-j{}", jobs), build_target.as_str().to_string()])
}

/// Run the selected target and report its exit code.
///
/// A non-zero exit is returned in the [`BuildResult`], not as an error; only
/// failing to start `make` is an error.
pub async fn invoke_build(
  staged: &Path,
  target: &TargetTriple,
  mode: LibraryMode,
  jobs: usize,
  runner: &impl CommandRunner,
) -> Result<BuildResult, BuildError> {
  let build_target = select_target(target, mode);

  if build_target.is_terminal() && mode == LibraryMode::Shared {
    warn!(target = %target, "musl targets always build a static library, ignoring shared mode");
  }

  info!(target = %build_target, jobs, "building htslib");

  let invocation = make_invocation(staged, build_target, jobs);
  let exit_code = runner.run(&invocation).await.map_err(|e| BuildError::Spawn {
    program: invocation.program.clone(),
    source: e,
  })?;

  if exit_code != 0 {
    warn!(target = %build_target, exit_code, "htslib build failed");
  }

  Ok(BuildResult {
    exit_code,
    target_invoked: build_target,
  })
}

//! End-to-end bootstrap: resolve, fetch, cross-build, patch, build.
//!
//! Phases run strictly in sequence, each waiting on its external process.
//! The first failure aborts the run; a partially staged tree is cleaned up by
//! the next run's fetch phase.

mod types;

pub use types::*;

use std::path::Path;

use tracing::info;

use crate::build::{BuildResult, BuildTarget, invoke_build, select_target};
use crate::consts::{CONFIG_H_NAME, DEFAULT_JOBS, DOWNLOADS_DIR_NAME, HTSLIB_REPO, MAKEFILE_NAME, MUSL_CC, NATIVE_CC};
use crate::deps::{DEPENDENCIES, build_cross_deps};
use crate::environment::{BuildEnvironment, RawInputs, resolve};
use crate::exec::{CommandRunner, ProcessRunner};
use crate::fetch::{ArchiveFetcher, GitFetcher, HttpFetcher, SourceFetcher, fetch_library, staged_path};
use crate::patch::patch_include_paths;

/// Orchestrates one bootstrap run over a set of collaborators.
#[derive(Debug, Clone)]
pub struct Bootstrap<S, A, R> {
  source: S,
  archives: A,
  runner: R,
  jobs: usize,
}

impl Default for Bootstrap<GitFetcher, HttpFetcher, ProcessRunner> {
  fn default() -> Self {
    Self::new(GitFetcher, HttpFetcher::new(), ProcessRunner)
  }
}

impl<S, A, R> Bootstrap<S, A, R>
where
  S: SourceFetcher,
  A: ArchiveFetcher,
  R: CommandRunner,
{
  pub fn new(source: S, archives: A, runner: R) -> Self {
    Self {
      source,
      archives,
      runner,
      jobs: DEFAULT_JOBS,
    }
  }

  /// Cap on parallel `make` jobs. Zero is treated as one.
  pub fn with_jobs(mut self, jobs: usize) -> Self {
    self.jobs = jobs.max(1);
    self
  }

  pub fn jobs(&self) -> usize {
    self.jobs
  }

  /// Resolve `raw` and run every phase.
  ///
  /// Input validation happens before anything touches the filesystem or the
  /// network.
  pub async fn run(&self, raw: &RawInputs) -> Result<BuildResult, BootstrapError> {
    let env = resolve(raw)?;
    self.run_resolved(&env).await
  }

  /// Run every phase for an already resolved environment.
  pub async fn run_resolved(&self, env: &BuildEnvironment) -> Result<BuildResult, BootstrapError> {
    info!(
      version = %env.library_version,
      target = %env.target_triple,
      mode = %env.library_mode,
      "starting htslib bootstrap"
    );

    let staged = fetch_library(env, &self.source).await?;

    if env.target_triple.is_musl() {
      let downloads = env.output_dir.join(DOWNLOADS_DIR_NAME);
      let artifacts = build_cross_deps(
        &env.target_triple,
        &staged,
        &downloads,
        self.jobs,
        &self.archives,
        &self.runner,
      )
      .await?;
      patch_include_paths(&staged, &artifacts).await?;
    }

    let result = invoke_build(&staged, &env.target_triple, env.library_mode, self.jobs, &self.runner).await?;

    info!(target = %result.target_invoked, exit_code = result.exit_code, "bootstrap finished");
    Ok(result)
  }
}

/// The steps a run would take for `env`, without performing any of them.
pub fn plan(env: &BuildEnvironment, jobs: usize) -> Vec<PlanStep> {
  let staged = staged_path(&env.output_dir);
  let mut steps = vec![
    PlanStep::RemoveStaged { path: staged.clone() },
    PlanStep::Clone {
      url: HTSLIB_REPO.to_string(),
      tag: env.library_version.clone(),
      dest: staged.clone(),
    },
    PlanStep::WriteConfigHeader {
      path: staged.join(CONFIG_H_NAME),
    },
  ];

  if env.target_triple.is_musl() {
    steps.push(PlanStep::SubstituteCompiler {
      path: staged.join(MAKEFILE_NAME),
      from: NATIVE_CC.to_string(),
      to: MUSL_CC.to_string(),
    });
    for spec in &DEPENDENCIES {
      steps.push(PlanStep::BuildDependency {
        name: spec.name.to_string(),
        version: spec.version.to_string(),
        url: spec.archive_url.to_string(),
      });
    }
    steps.push(PlanStep::PatchIncludePaths {
      include_dirs: DEPENDENCIES
        .iter()
        .map(|spec| staged.join(spec.source_dir_name()))
        .collect(),
    });
  }

  steps.push(PlanStep::Make {
    target: select_target(&env.target_triple, env.library_mode),
    jobs: jobs.max(1),
  });
  steps
}

/// `cargo:` directives that link a `build.rs` consumer against the result.
///
/// musl builds link htslib and both dependencies statically from the staged
/// root; native static builds link zlib and bzip2 from the system.
pub fn link_directives(staged: &Path, build_target: BuildTarget) -> Vec<String> {
  let mut lines = vec![format!("cargo:rustc-link-search=native={}", staged.display())];
  match build_target {
    BuildTarget::LibStaticMusl => {
      lines.push("cargo:rustc-link-lib=static=hts".to_string());
      for spec in &DEPENDENCIES {
        let lib = spec.library.trim_start_matches("lib").trim_end_matches(".a");
        lines.push(format!("cargo:rustc-link-lib=static={}", lib));
      }
    }
    BuildTarget::LibStatic => {
      lines.push("cargo:rustc-link-lib=static=hts".to_string());
      lines.push("cargo:rustc-link-lib=z".to_string());
      lines.push("cargo:rustc-link-lib=bz2".to_string());
    }
    BuildTarget::LibShared => {
      lines.push("cargo:rustc-link-lib=dylib=hts".to_string());
    }
  }
  lines
}

//! Implementation of the `htsbuild build` command.
//!
//! Runs a full bootstrap against the real collaborators: git for htslib,
//! HTTP for the pinned musl dependencies, and `make`/`sh` as child processes.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use htsbuild_lib::bootstrap::{Bootstrap, BootstrapError, link_directives};
use htsbuild_lib::build::BuildTarget;
use htsbuild_lib::environment::resolve;
use htsbuild_lib::fetch::staged_path;

use crate::InputArgs;
use crate::output::{OutputFormat, format_duration, print_error, print_json, print_stat, print_success};

#[derive(Serialize)]
struct BuildReport {
  exit_code: i32,
  target: BuildTarget,
  staged: PathBuf,
  elapsed_ms: u128,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  link_directives: Vec<String>,
}

#[derive(Serialize)]
struct FailureReport {
  error: String,
  exit_code: i32,
}

/// Returns the process exit code for the run.
pub fn cmd_build(inputs: &InputArgs, cargo: bool, format: OutputFormat) -> Result<i32> {
  let raw = inputs.raw();
  debug!(?raw, jobs = inputs.jobs, cargo, "build requested");
  let bootstrap = Bootstrap::default().with_jobs(inputs.jobs);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let start = Instant::now();
  let outcome = rt.block_on(async {
    let env = resolve(&raw)?;
    let result = bootstrap.run_resolved(&env).await?;
    Ok::<_, BootstrapError>((staged_path(&env.output_dir), result))
  });
  let elapsed = start.elapsed();

  let (staged, result) = match outcome {
    Ok(done) => done,
    Err(err) => {
      let exit_code = err.exit_code();
      if format.is_json() {
        print_json(&FailureReport {
          error: err.to_string(),
          exit_code,
        })?;
      } else {
        print_error(&err.to_string());
      }
      return Ok(exit_code);
    }
  };

  let directives = if cargo && result.is_success() {
    link_directives(&staged, result.target_invoked)
  } else {
    Vec::new()
  };

  if format.is_json() {
    print_json(&BuildReport {
      exit_code: result.exit_code,
      target: result.target_invoked,
      staged,
      elapsed_ms: elapsed.as_millis(),
      link_directives: directives,
    })?;
    return Ok(result.exit_code);
  }

  if !result.is_success() {
    print_error(&format!(
      "make {} exited with status {}",
      result.target_invoked, result.exit_code
    ));
    return Ok(result.exit_code);
  }

  if cargo {
    for line in &directives {
      println!("{}", line);
    }
  } else {
    print_success(&format!("Built {} in {}", result.target_invoked, format_duration(elapsed)));
    print_stat("Staged", &staged.display().to_string());
  }
  Ok(0)
}

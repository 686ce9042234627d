//! Implementation of the `htsbuild plan` command.
//!
//! Resolves the inputs exactly as `build` would and prints the steps a run
//! would take. Nothing is fetched, written, or executed.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use htsbuild_lib::bootstrap::{PlanStep, plan};
use htsbuild_lib::environment::{LibraryMode, resolve};
use htsbuild_lib::fetch::staged_path;
use htsbuild_lib::platform::TargetTriple;

use crate::InputArgs;
use crate::output::{OutputFormat, print_error, print_info, print_json, print_step};

#[derive(Serialize)]
struct PlanReport {
  version: String,
  target: TargetTriple,
  mode: LibraryMode,
  staged: PathBuf,
  steps: Vec<PlanStep>,
}

pub fn cmd_plan(inputs: &InputArgs, format: OutputFormat) -> Result<i32> {
  let env = match resolve(&inputs.raw()) {
    Ok(env) => env,
    Err(err) => {
      print_error(&format!("configuration error: {}", err));
      return Ok(2);
    }
  };

  let steps = plan(&env, inputs.jobs);

  if format.is_json() {
    print_json(&PlanReport {
      version: env.library_version.clone(),
      target: env.target_triple.clone(),
      mode: env.library_mode,
      staged: staged_path(&env.output_dir),
      steps,
    })?;
    return Ok(0);
  }

  print_info(&format!(
    "htslib {} for {} ({} steps)",
    env.library_version,
    env.target_triple,
    steps.len()
  ));
  for (i, step) in steps.iter().enumerate() {
    print_step(i + 1, &step.to_string());
  }
  Ok(0)
}

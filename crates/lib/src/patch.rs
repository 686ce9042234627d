//! In-place edits of makefiles in the staged tree.
//!
//! Two kinds of edit are supported: replacing every occurrence of the
//! compiler name, and prepending flags to a variable assignment's value.

use std::path::Path;

use tracing::{debug, info};

use crate::build::BuildError;
use crate::consts::{CPPFLAGS_ASSIGNMENT, MAKEFILE_NAME};
use crate::deps::BuiltArtifact;

/// Replace every occurrence of `from` with `to` in the file at `path`.
///
/// Returns the number of replacements made.
pub async fn substitute_compiler(path: &Path, from: &str, to: &str) -> Result<usize, BuildError> {
  let content = read(path).await?;
  let count = content.matches(from).count();
  write(path, &content.replace(from, to)).await?;
  debug!(path = %path.display(), from, to, count, "substituted compiler");
  Ok(count)
}

/// Insert `-I<include_dir>` for each artifact at the start of the staged
/// makefile's `CPPFLAGS` value, keeping whatever the assignment already held.
pub async fn patch_include_paths(staged: &Path, artifacts: &[BuiltArtifact]) -> Result<(), BuildError> {
  let makefile = staged.join(MAKEFILE_NAME);
  let content = read(&makefile).await?;

  let flags: Vec<String> = artifacts
    .iter()
    .map(|a| format!("-I{}", a.include_dir.display()))
    .collect();

  let patched = prepend_to_assignment(&content, CPPFLAGS_ASSIGNMENT, &flags.join(" ")).ok_or_else(|| {
    BuildError::PatchTargetMissing {
      path: makefile.clone(),
      pattern: CPPFLAGS_ASSIGNMENT.to_string(),
    }
  })?;

  write(&makefile, &patched).await?;
  info!(flags = %flags.join(" "), "added include paths");
  Ok(())
}

/// Insert `addition` right after `assignment` on the first line starting with it.
///
/// `CPPFLAGS = -DX` with addition `-I/a` becomes `CPPFLAGS = -I/a -DX`.
/// Returns `None` when no line starts with `assignment`.
fn prepend_to_assignment(content: &str, assignment: &str, addition: &str) -> Option<String> {
  let mut out = String::with_capacity(content.len() + addition.len() + 1);
  let mut patched = false;

  for line in content.split_inclusive('\n') {
    match line.strip_prefix(assignment) {
      Some(rest) if !patched => {
        out.push_str(assignment);
        out.push(' ');
        out.push_str(addition);
        out.push_str(rest);
        patched = true;
      }
      _ => out.push_str(line),
    }
  }

  patched.then_some(out)
}

async fn read(path: &Path) -> Result<String, BuildError> {
  tokio::fs::read_to_string(path).await.map_err(|e| BuildError::Patch {
    path: path.to_path_buf(),
    source: e,
  })
}

async fn write(path: &Path, content: &str) -> Result<(), BuildError> {
  tokio::fs::write(path, content).await.map_err(|e| BuildError::Patch {
    path: path.to_path_buf(),
    source: e,
  })
}

use tempfile::TempDir;

use htsbuild_lib::bootstrap::Bootstrap;
use htsbuild_lib::build::BuildTarget;
use htsbuild_lib::exec::ProcessRunner;

use super::common::{HTSLIB_MAKEFILE, MakefileSource, ScriptedArchives, has_make, inputs};

#[tokio::test]
async fn static_build_produces_library() {
  if !has_make() {
    eprintln!("skipping: make not found");
    return;
  }
  let out = TempDir::new().unwrap();

  let result = Bootstrap::new(MakefileSource::new(HTSLIB_MAKEFILE), ScriptedArchives::default(), ProcessRunner)
    .with_jobs(2)
    .run(&inputs(&out, "", "static"))
    .await
    .unwrap();

  assert!(result.is_success());
  assert_eq!(result.target_invoked, BuildTarget::LibStatic);

  let staged = out.path().join("htslib");
  assert!(staged.join("libhts.a").exists());
  assert!(staged.join("config.h").exists());
  assert!(!out.path().join("downloads").exists());
}

#[tokio::test]
async fn shared_is_the_default_mode() {
  if !has_make() {
    eprintln!("skipping: make not found");
    return;
  }
  let out = TempDir::new().unwrap();

  let result = Bootstrap::new(MakefileSource::new(HTSLIB_MAKEFILE), ScriptedArchives::default(), ProcessRunner)
    .run(&inputs(&out, "x86_64-unknown-linux-gnu", ""))
    .await
    .unwrap();

  assert_eq!(result.target_invoked, BuildTarget::LibShared);
  assert!(out.path().join("htslib/libhts.so").exists());
}

#[tokio::test]
async fn failing_make_is_reported_in_the_result() {
  if !has_make() {
    eprintln!("skipping: make not found");
    return;
  }
  let out = TempDir::new().unwrap();
  let makefile = "CPPFLAGS =\n\nlib-static:\n\ttouch libhts.a\n";

  let result = Bootstrap::new(MakefileSource::new(makefile), ScriptedArchives::default(), ProcessRunner)
    .run(&inputs(&out, "", "shared"))
    .await
    .unwrap();

  assert!(!result.is_success());
  assert_eq!(result.target_invoked, BuildTarget::LibShared);
  assert_ne!(result.exit_code, 0);
}

#[tokio::test]
async fn rerun_replaces_previous_build() {
  if !has_make() {
    eprintln!("skipping: make not found");
    return;
  }
  let out = TempDir::new().unwrap();
  let bootstrap = Bootstrap::new(MakefileSource::new(HTSLIB_MAKEFILE), ScriptedArchives::default(), ProcessRunner);

  bootstrap.run(&inputs(&out, "", "shared")).await.unwrap();
  assert!(out.path().join("htslib/libhts.so").exists());

  bootstrap.run(&inputs(&out, "", "static")).await.unwrap();
  assert!(out.path().join("htslib/libhts.a").exists());
  assert!(!out.path().join("htslib/libhts.so").exists());
}

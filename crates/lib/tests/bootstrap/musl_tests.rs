use tempfile::TempDir;

use htsbuild_lib::bootstrap::{Bootstrap, BootstrapError};
use htsbuild_lib::build::{BuildError, BuildTarget};
use htsbuild_lib::exec::ProcessRunner;

use super::common::{HTSLIB_MAKEFILE, MUSL_TARGET, MakefileSource, ScriptedArchives, has_make, inputs};

#[tokio::test]
async fn musl_build_cross_compiles_dependencies() {
  if !has_make() {
    eprintln!("skipping: make not found");
    return;
  }
  let out = TempDir::new().unwrap();

  let result = Bootstrap::new(MakefileSource::new(HTSLIB_MAKEFILE), ScriptedArchives::default(), ProcessRunner)
    .with_jobs(2)
    .run(&inputs(&out, MUSL_TARGET, "shared"))
    .await
    .unwrap();

  assert!(result.is_success());
  assert_eq!(result.target_invoked, BuildTarget::LibStaticMusl);

  let staged = out.path().join("htslib");
  for lib in ["libz.a", "libbz2.a", "libhts.a"] {
    assert!(staged.join(lib).exists(), "{} missing", lib);
  }

  let configured = std::fs::read_to_string(staged.join("zlib-1.2.11/configured.txt")).unwrap();
  assert_eq!(configured.trim(), "CC=musl-gcc");

  let bzip2_cc = std::fs::read_to_string(staged.join("bzip2-1.0.6/cc.txt")).unwrap();
  assert_eq!(bzip2_cc.trim(), "musl-gcc");

  let flags = std::fs::read_to_string(staged.join("flags.txt")).unwrap();
  assert!(flags.starts_with("musl-gcc "));
  assert!(flags.contains(&format!("-I{}", staged.join("zlib-1.2.11").display())));
  assert!(flags.contains(&format!("-I{}", staged.join("bzip2-1.0.6").display())));
}

#[tokio::test]
async fn failing_configure_aborts_with_its_exit_code() {
  if !has_make() {
    eprintln!("skipping: make not found");
    return;
  }
  let out = TempDir::new().unwrap();
  let archives = ScriptedArchives {
    zlib_configure: "exit 3\n".to_string(),
  };

  let err = Bootstrap::new(MakefileSource::new(HTSLIB_MAKEFILE), archives, ProcessRunner)
    .run(&inputs(&out, MUSL_TARGET, ""))
    .await
    .unwrap_err();

  assert_eq!(err.exit_code(), 3);
  match err {
    BootstrapError::Build(BuildError::DependencyCompileFailed { dependency, code, .. }) => {
      assert_eq!(dependency, "zlib-1.2.11");
      assert_eq!(code, 3);
    }
    other => panic!("unexpected error: {other}"),
  }

  let staged = out.path().join("htslib");
  assert!(!staged.join("bzip2-1.0.6").exists());
  assert!(!staged.join("libhts.a").exists());
}

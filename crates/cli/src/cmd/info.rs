use anyhow::Result;
use serde::Serialize;

use htsbuild_lib::build::{BuildTarget, select_target};
use htsbuild_lib::environment::LibraryMode;
use htsbuild_lib::platform::{TargetTriple, host_triple};

use crate::output::{OutputFormat, print_json, print_stat};

#[derive(Serialize)]
struct InfoReport {
  host: String,
  target: TargetTriple,
  cross_build_deps: bool,
  static_target: BuildTarget,
  shared_target: BuildTarget,
}

pub fn cmd_info(target: Option<&str>, format: OutputFormat) -> Result<i32> {
  let target = TargetTriple::new(target.unwrap_or_default());
  let report = InfoReport {
    host: host_triple(),
    cross_build_deps: target.is_musl(),
    static_target: select_target(&target, LibraryMode::Static),
    shared_target: select_target(&target, LibraryMode::Shared),
    target,
  };

  if format.is_json() {
    print_json(&report)?;
    return Ok(0);
  }

  println!("System:");
  print_stat("Host", &report.host);
  print_stat("Target", &report.target.to_string());
  print_stat(
    "Dependencies",
    if report.cross_build_deps {
      "zlib and bzip2 built from source with musl-gcc"
    } else {
      "system libraries"
    },
  );
  print_stat("Static mode", report.static_target.as_str());
  print_stat("Shared mode", report.shared_target.as_str());
  Ok(0)
}

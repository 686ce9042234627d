use std::fmt;

/// Host platform the bootstrap runs on, reported by `htsbuild info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Host {
  pub arch: &'static str,
  pub os: &'static str,
  pub env: &'static str,
}

impl Host {
  /// Detect the host from the compile-time target of this binary.
  pub fn current() -> Self {
    Self {
      arch: std::env::consts::ARCH,
      os: std::env::consts::OS,
      env: host_env(),
    }
  }

  /// Returns a triple in the `arch-os[-env]` form used for `TARGET`.
  pub fn triple(&self) -> String {
    if self.env.is_empty() {
      format!("{}-{}", self.arch, self.os)
    } else {
      format!("{}-{}-{}", self.arch, self.os, self.env)
    }
  }
}

impl fmt::Display for Host {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}

#[cfg(target_env = "musl")]
fn host_env() -> &'static str {
  "musl"
}

#[cfg(target_env = "gnu")]
fn host_env() -> &'static str {
  "gnu"
}

#[cfg(not(any(target_env = "musl", target_env = "gnu")))]
fn host_env() -> &'static str {
  ""
}

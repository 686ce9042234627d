use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::MUSL_TOKEN;

/// A compilation target triple as handed in by the caller.
///
/// The value is kept verbatim. An empty triple means "build for the host".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetTriple(String);

impl TargetTriple {
  pub fn new(triple: impl Into<String>) -> Self {
    Self(triple.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// True when no target was given.
  pub fn is_native(&self) -> bool {
    self.0.is_empty()
  }

  /// True when the triple selects the musl cross-compile branch.
  ///
  /// Plain, case-sensitive substring match.
  pub fn is_musl(&self) -> bool {
    self.0.contains(MUSL_TOKEN)
  }
}

impl fmt::Display for TargetTriple {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_native() {
      write!(f, "native")
    } else {
      write!(f, "{}", self.0)
    }
  }
}

impl From<&str> for TargetTriple {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

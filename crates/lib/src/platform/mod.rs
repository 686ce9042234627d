//! Host and target platform identification.

pub mod host;
pub mod target;

pub use host::Host;
pub use target::TargetTriple;

/// Returns the host triple (e.g., "x86_64-linux-gnu").
pub fn host_triple() -> String {
  Host::current().triple()
}

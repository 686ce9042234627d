//! End-to-end bootstrap runs against real `sh` and `make`.
//!
//! Sources come from local fakes, but every phase runs its real commands in
//! a temporary output directory. The fake makefiles only `touch` their
//! outputs, so no compiler is needed.

mod common;
mod musl_tests;
mod native_tests;

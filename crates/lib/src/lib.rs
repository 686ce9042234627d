//! htsbuild-lib: staging and building htslib from source.
//!
//! The bootstrap runs five phases in order:
//! - `environment`: validate raw inputs into a `BuildEnvironment`
//! - `fetch`: stage htslib at the requested tag and write `config.h`
//! - `deps`: for musl targets, cross-build zlib and bzip2
//! - `patch`: point the staged makefile at the musl compiler and dependency headers
//! - `build`: run the selected htslib make target
//!
//! `bootstrap` ties the phases together behind the collaborator traits in
//! `fetch` and `exec`.

pub mod bootstrap;
pub mod build;
pub mod consts;
pub mod deps;
pub mod environment;
pub mod exec;
pub mod fetch;
pub mod patch;
pub mod platform;
pub mod util;

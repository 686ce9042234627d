mod cmd;
mod output;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use htsbuild_lib::consts::DEFAULT_JOBS;
use htsbuild_lib::environment::{RawInputs, vars};

use crate::cmd::{cmd_build, cmd_info, cmd_plan};
use crate::output::{OutputFormat, print_error};

/// htsbuild - fetch and build htslib, natively or for musl targets
#[derive(Parser)]
#[command(name = "htsbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t)]
  format: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

/// Inputs shared by `build` and `plan`. Values are validated by the library.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
  /// Directory htslib is staged and built under (must exist)
  #[arg(long, env = vars::OUT_DIR)]
  pub out_dir: Option<String>,

  /// htslib tag to check out [default: 1.9]
  #[arg(long = "hts-version", env = vars::HTSLIB_VERSION)]
  pub hts_version: Option<String>,

  /// Target triple; any triple containing "musl" cross-builds zlib and bzip2
  #[arg(long, env = vars::TARGET)]
  pub target: Option<String>,

  /// Library kind for native builds: static or shared [default: shared]
  #[arg(long, env = vars::HTSLIB_MODE)]
  pub mode: Option<String>,

  /// Maximum parallel make jobs
  #[arg(short, long, env = vars::HTSBUILD_JOBS, default_value_t = DEFAULT_JOBS)]
  pub jobs: usize,
}

impl InputArgs {
  pub fn raw(&self) -> RawInputs {
    RawInputs {
      output_dir: self.out_dir.clone(),
      library_version: self.hts_version.clone(),
      target_triple: self.target.clone(),
      library_mode: self.mode.clone(),
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Fetch htslib, build musl dependencies if needed, and run the library build
  Build {
    #[command(flatten)]
    inputs: InputArgs,

    /// Print cargo link directives for a build script on success
    #[arg(long)]
    cargo: bool,
  },

  /// Show the steps a build would take without running them
  Plan {
    #[command(flatten)]
    inputs: InputArgs,
  },

  /// Show the host platform and how a target would be built
  Info {
    /// Target triple to describe
    #[arg(long, env = vars::TARGET)]
    target: Option<String>,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Build { inputs, cargo } => cmd_build(&inputs, cargo, cli.format),
    Commands::Plan { inputs } => cmd_plan(&inputs, cli.format),
    Commands::Info { target } => cmd_info(target.as_deref(), cli.format),
  };

  match result {
    Ok(0) => {}
    Ok(code) => std::process::exit(code),
    Err(err) => {
      print_error(&format!("{:#}", err));
      std::process::exit(1);
    }
  }
}

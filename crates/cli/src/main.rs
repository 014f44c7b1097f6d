mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// podres - resolve Podfile dependencies against spec repositories
#[derive(Parser)]
#[command(name = "podres")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve a podfile and print the specifications of each target
  Resolve {
    /// Path to the podfile (JSON)
    podfile: PathBuf,

    /// Spec repository to search, in order (default: every repository in the repos directory)
    #[arg(long = "repo", value_name = "DIR")]
    repos: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Show configuration paths and available spec repositories
  Info {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .without_time()
    .with_writer(std::io::stderr)
    .init();

  match cli.command {
    Commands::Resolve { podfile, repos, format } => cmd::cmd_resolve(&podfile, &repos, format),
    Commands::Info { format } => cmd::cmd_info(format),
  }
}

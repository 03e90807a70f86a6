mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use output::{OutputFormat, print_error};

/// lanserve - import and reconcile game server bundles
#[derive(Parser)]
#[command(name = "lanserve")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Data directory for server records, games and locks
  #[arg(long, global = true, value_name = "DIR")]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Import a server bundle
  Import {
    /// Bundle file name under the archive directory, or a path to a bundle
    bundle: String,

    /// Reconcile and plan file writes without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Base directory for server working directories
    #[arg(long, value_name = "DIR")]
    storage_root: Option<PathBuf>,

    /// Directory bundle names are resolved against
    #[arg(long, value_name = "DIR")]
    archive_dir: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// Show a stored server
  Show {
    /// Server ID
    id: Uuid,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// Manage locally known games
  Games {
    #[command(subcommand)]
    command: GamesCommands,
  },
}

#[derive(Subcommand)]
enum GamesCommands {
  /// Register a game so imported servers can link to it
  Add {
    /// Game ID
    id: Uuid,

    /// Display title
    #[arg(long, default_value = "")]
    title: String,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "info" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(err) = run(cli) {
    print_error(&format!("{err:#}"));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  let data_dir = cli.data_dir;

  match cli.command {
    Commands::Import {
      bundle,
      dry_run,
      storage_root,
      archive_dir,
      output,
    } => cmd::cmd_import(
      &bundle,
      cmd::ImportArgs {
        dry_run,
        data_dir,
        storage_root,
        archive_dir,
      },
      output,
    ),
    Commands::Show { id, output } => cmd::cmd_show(id, data_dir, output),
    Commands::Games { command } => match command {
      GamesCommands::Add { id, title } => cmd::cmd_games_add(id, title, data_dir),
    },
  }
}

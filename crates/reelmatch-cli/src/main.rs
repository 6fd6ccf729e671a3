use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::Context;
use commands::{config, normalize, scan, search, update};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelmatch")]
#[command(about = "ReelMatch - filename-driven metadata agent for adult-film libraries")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Use an alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write logs to this file (rotated daily)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a library directory and run the search phase for every video file
    #[command(long_about = "Walk a library directory, parse every video filename, and confirm each film against the enabled sites. With --write, the update phase also runs for confirmed films and a metadata JSON is written next to each file.")]
    Scan {
        /// Library directory to walk
        dir: PathBuf,

        /// Run the update phase for confirmed films and write
        /// <file>.metadata.json beside each one
        #[arg(long, action = ArgAction::SetTrue)]
        write: bool,
    },
    /// Run the search phase for one file and print the opaque identifier
    Search {
        /// Video file (only the name is parsed; it does not need to exist)
        file: PathBuf,

        /// Probed file duration in minutes, when known
        #[arg(long, value_name = "MINS")]
        duration: Option<i64>,

        /// Write the identifier to a file instead of stdout
        #[arg(long, value_name = "PATH")]
        id_file: Option<PathBuf>,
    },
    /// Run the update phase from a stored identifier and emit the metadata bundle
    Update {
        /// File containing the identifier produced by `search`
        id_file: PathBuf,

        /// Write the bundle to a file instead of stdout
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Show the canonical comparison key for a title or name
    Normalize {
        /// Text to normalize
        text: String,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.clone())
        .context("failed to initialize logging")?;
    let out = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Scan { dir, write } => scan::run(&out, cli.config.as_deref(), &dir, write).await,
        Commands::Search {
            file,
            duration,
            id_file,
        } => search::run(&out, cli.config.as_deref(), &file, duration, id_file.as_deref()).await,
        Commands::Update { id_file, out: dest } => {
            update::run(&out, cli.config.as_deref(), &id_file, dest.as_deref()).await
        }
        Commands::Normalize { text } => normalize::run(&out, &text),
        Commands::Config { action } => config::run(&out, cli.config.as_deref(), action),
    }
}

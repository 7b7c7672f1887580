//! SoundMap CLI - remap the instrument sounds of a MusicXML score.
//!
//! This binary is a thin front-end over `soundmap-core`: it lists the sound
//! catalog and the parts of a score, applies library, category and sound
//! selections given on the command line, and previews sounds in MuseScore.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::Assignment;

#[derive(Parser, Debug)]
#[command(name = "soundmap")]
#[command(about = "Assign MuseScore sound libraries to the parts of a MusicXML score")]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the sound libraries, categories and sounds
    Catalog {
        /// Skip the platform's MuseScore directories
        #[arg(long)]
        no_discovery: bool,

        /// Extra directory to probe for sound metadata (repeatable)
        #[arg(long = "search-path", value_name = "DIR")]
        search_paths: Vec<PathBuf>,
    },

    /// List the parts of a score with their default selections
    Parts {
        /// MusicXML score file
        file: PathBuf,
    },

    /// Apply selections to a score and save it
    Map {
        /// MusicXML score file
        file: PathBuf,

        /// Select a library for a part (repeatable)
        #[arg(long = "library", value_name = "PART=LIB", value_parser = commands::parse_assignment)]
        libraries: Vec<Assignment>,

        /// Select a category for a part (repeatable)
        #[arg(long = "category", value_name = "PART=CAT", value_parser = commands::parse_assignment)]
        categories: Vec<Assignment>,

        /// Set a part's sound identifier verbatim (repeatable)
        #[arg(long = "sound", value_name = "PART=SOUND", value_parser = commands::parse_assignment)]
        sounds: Vec<Assignment>,

        /// Write to this file instead of overwriting the score
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open a one-note score with the given sound in MuseScore
    Preview {
        /// Sound identifier, e.g. strings.violin.berlin
        sound: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging; RUST_LOG takes precedence over --debug
    let log_level = if args.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    debug!("Running {:?}", args.command);

    match args.command {
        Command::Catalog {
            no_discovery,
            search_paths,
        } => commands::catalog(!no_discovery, search_paths).await,
        Command::Parts { file } => commands::parts(file).await,
        Command::Map {
            file,
            libraries,
            categories,
            sounds,
            output,
        } => {
            let selections = commands::Selections {
                libraries,
                categories,
                sounds,
            };
            commands::map(file, selections, output).await
        }
        Command::Preview { sound } => commands::preview(&sound).await,
    }
}

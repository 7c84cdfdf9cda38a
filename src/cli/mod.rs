use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod entries;
mod load;

pub use load::LoadOptions;

/// peaklist - Inspect serialized peak lists and project archives
#[derive(Parser)]
#[command(name = "peaklist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the entries of a project archive
    Entries {
        /// Project archive (ZIP) path
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
    },

    /// Load a peak list and print its summary
    Load {
        /// Peak list XML file or project archive
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Archive entry holding the peak list
        #[arg(short, long, value_name = "NAME")]
        entry: Option<String>,

        /// Raw data catalog (JSON) used to resolve file and scan references
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Reject trailing array bytes and multiple preferred identities
        #[arg(long)]
        strict: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Entries { archive } => entries::run(archive),
        Commands::Load {
            input,
            entry,
            catalog,
            config,
            strict,
            json,
        } => load::run(LoadOptions {
            input,
            entry,
            catalog,
            config,
            strict,
            json,
        }),
    }
}

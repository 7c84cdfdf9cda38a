//! # peaklist
//!
//! A command-line tool for inspecting serialized peak lists.
//!
//! ## Usage
//!
//! ```bash
//! # List the entries of a project archive
//! peaklist entries project.zip
//!
//! # Load a peak list entry and print its summary
//! peaklist load project.zip --entry "Aligned peak list.xml" --catalog raw_files.json
//!
//! # Load a bare XML document, rejecting tolerated anomalies, as JSON
//! peaklist -v load peaklist.xml --catalog raw_files.json --strict --json
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}

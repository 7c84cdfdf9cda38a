use anyhow::{Context, Result};
use std::path::PathBuf;

use peaklist::archive::{ProjectArchive, PEAK_LIST_EXTENSION};

/// List the entries of a project archive
pub fn run(archive: PathBuf) -> Result<()> {
    if !archive.exists() {
        anyhow::bail!("File does not exist: {}", archive.display());
    }

    let project = ProjectArchive::open(&archive)
        .with_context(|| format!("Failed to open archive: {}", archive.display()))?;

    let names = project.entry_names();
    println!("Archive: {}", archive.display());
    println!("Entries: {}", names.len());
    for name in &names {
        let marker = if name.ends_with(PEAK_LIST_EXTENSION) {
            "*"
        } else {
            " "
        };
        println!("  {} {}", marker, name);
    }

    Ok(())
}

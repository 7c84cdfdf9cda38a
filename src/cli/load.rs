use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};

use peaklist::archive::ProjectArchive;
use peaklist::models::PeakList;
use peaklist::raw_data::RawDataCatalog;
use peaklist::streamer::{PeakListStreamer, StreamerConfig};

use super::config::Config;

/// Arguments of the load command
pub struct LoadOptions {
    pub input: PathBuf,
    pub entry: Option<String>,
    pub catalog: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub strict: bool,
    pub json: bool,
}

/// Load a peak list and print its summary
pub fn run(options: LoadOptions) -> Result<()> {
    if !options.input.exists() {
        anyhow::bail!("File does not exist: {}", options.input.display());
    }

    let file_config = match &options.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    }
    .load;

    let catalog = match options.catalog.as_ref().or(file_config.catalog.as_ref()) {
        Some(path) => RawDataCatalog::from_file(path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?,
        None => {
            warn!("No raw data catalog given; peaks referencing raw files will fail to resolve");
            RawDataCatalog::new()
        }
    };
    info!("Catalog holds {} raw data files", catalog.len());

    let streamer_config = file_config.streamer_config(options.strict);
    let entry = options.entry.or(file_config.entry);

    let peak_list = if is_xml(&options.input) {
        load_xml(&options.input, &catalog, streamer_config)?
    } else {
        load_from_archive(&options.input, entry, &catalog, streamer_config)?
    };

    let summary = peak_list.summary();
    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    } else {
        print!("{}", summary);
    }

    Ok(())
}

fn is_xml(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("xml"))
        .unwrap_or(false)
}

fn load_xml(path: &Path, catalog: &RawDataCatalog, config: StreamerConfig) -> Result<PeakList> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    PeakListStreamer::with_config(std::io::BufReader::new(file), catalog, config)
        .read_peak_list()
        .with_context(|| format!("Failed to load peak list: {}", path.display()))
}

fn load_from_archive(
    path: &Path,
    entry: Option<String>,
    catalog: &RawDataCatalog,
    config: StreamerConfig,
) -> Result<PeakList> {
    let mut archive = ProjectArchive::open(path)
        .with_context(|| format!("Failed to open archive: {}", path.display()))?;

    let entry = match entry {
        Some(entry) => entry,
        None => {
            let mut candidates = archive.peak_list_entries();
            if candidates.len() != 1 {
                anyhow::bail!(
                    "Archive holds {} peak list entries, choose one with --entry: {}",
                    candidates.len(),
                    candidates.join(", ")
                );
            }
            candidates.remove(0)
        }
    };

    archive
        .load_peak_list_with(&entry, catalog, config, None)
        .with_context(|| format!("Failed to load entry '{}' from {}", entry, path.display()))
}

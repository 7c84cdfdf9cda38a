//! Project archives holding peak list documents
//!
//! A project archive is a ZIP container with one entry per serialized peak
//! list (plus whatever else the producing application stored). Entries are
//! streamed straight from the archive into the peak list streamer.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::Arc;

use log::info;
use zip::ZipArchive;

use crate::models::PeakList;
use crate::raw_data::RawDataLookup;
use crate::streamer::{LoadProgress, PeakListError, PeakListStreamer, StreamerConfig};

/// File extension of peak list entries
pub const PEAK_LIST_EXTENSION: &str = ".xml";

/// Errors that can occur while reading a project archive
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Requested entry is not in the archive
    #[error("Archive has no entry named '{0}'")]
    MissingEntry(String),

    /// Entry could not be loaded as a peak list
    #[error("Failed to load peak list: {0}")]
    PeakList(#[from] PeakListError),
}

/// Read access to a project archive
pub struct ProjectArchive<R: Read + Seek = BufReader<File>> {
    archive: ZipArchive<R>,
}

impl ProjectArchive<BufReader<File>> {
    /// Open a project archive on disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> ProjectArchive<R> {
    /// Read an archive from any seekable source
    pub fn from_reader(reader: R) -> Result<Self, ArchiveError> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// Names of all entries, in archive order
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Entries that look like serialized peak lists, sorted by name
    pub fn peak_list_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .archive
            .file_names()
            .filter(|name| name.ends_with(PEAK_LIST_EXTENSION))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    /// Whether the archive holds an entry with this name
    pub fn contains(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Load a peak list entry with default settings
    pub fn load_peak_list<L: RawDataLookup + ?Sized>(
        &mut self,
        entry: &str,
        lookup: &L,
    ) -> Result<PeakList, ArchiveError> {
        self.load_peak_list_with(entry, lookup, StreamerConfig::default(), None)
    }

    /// Load a peak list entry, optionally reporting into a shared progress tracker
    pub fn load_peak_list_with<L: RawDataLookup + ?Sized>(
        &mut self,
        entry: &str,
        lookup: &L,
        config: StreamerConfig,
        progress: Option<Arc<LoadProgress>>,
    ) -> Result<PeakList, ArchiveError> {
        let file = match self.archive.by_name(entry) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ArchiveError::MissingEntry(entry.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        info!("Reading peak list entry '{}' ({} bytes)", entry, file.size());

        let mut streamer = PeakListStreamer::with_config(BufReader::new(file), lookup, config);
        if let Some(progress) = progress {
            streamer = streamer.with_progress(progress);
        }
        Ok(streamer.read_peak_list()?)
    }
}

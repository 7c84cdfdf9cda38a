//! Raw data files and scans referenced by peak lists
//!
//! Peak list documents never embed raw data. They refer to raw files by a
//! small integer ID and to scans by scan number, both of which must already
//! be known to the caller. This module holds the in-memory catalog those IDs
//! resolve against.
//!
//! A catalog can be built programmatically or loaded from JSON:
//!
//! ```json
//! {
//!   "files": [
//!     { "id": 1, "name": "sample_a.mzML",
//!       "scans": [ { "number": 1, "retention_time": 0.52, "ms_level": 1 } ] }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifier of a raw data file within a project
pub type RawFileId = i32;

/// One acquisition timepoint of a raw data file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    /// Native scan number
    pub number: i32,

    /// Retention time in minutes
    pub retention_time: f64,

    /// MS level (1 for MS1, 2 for MS2, ...)
    #[serde(default = "default_ms_level")]
    pub ms_level: u8,
}

fn default_ms_level() -> u8 {
    1
}

impl Scan {
    /// Create an MS1 scan
    pub fn new(number: i32, retention_time: f64) -> Self {
        Self {
            number,
            retention_time,
            ms_level: 1,
        }
    }
}

/// A raw measurement file and its scans, keyed by scan number
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataFile {
    id: RawFileId,
    name: String,
    scans: BTreeMap<i32, Scan>,
}

impl RawDataFile {
    /// Create a raw data file from its scans
    ///
    /// Later scans with a repeated number replace earlier ones.
    pub fn new(id: RawFileId, name: impl Into<String>, scans: impl IntoIterator<Item = Scan>) -> Self {
        Self {
            id,
            name: name.into(),
            scans: scans.into_iter().map(|s| (s.number, s)).collect(),
        }
    }

    /// Project-wide ID
    pub fn id(&self) -> RawFileId {
        self.id
    }

    /// File name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a scan by number
    pub fn scan(&self, number: i32) -> Option<&Scan> {
        self.scans.get(&number)
    }

    /// Number of scans
    pub fn scan_count(&self) -> usize {
        self.scans.len()
    }

    /// Iterate scans in ascending scan number order
    pub fn scans(&self) -> impl Iterator<Item = &Scan> {
        self.scans.values()
    }
}

impl fmt::Display for RawDataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

/// Lookup of raw data files by ID
///
/// The peak list streamer only ever reads through this trait; it never
/// mutates or constructs raw data files.
pub trait RawDataLookup {
    /// Resolve a raw file ID
    fn raw_data_file(&self, id: RawFileId) -> Option<Arc<RawDataFile>>;
}

impl RawDataLookup for HashMap<RawFileId, Arc<RawDataFile>> {
    fn raw_data_file(&self, id: RawFileId) -> Option<Arc<RawDataFile>> {
        self.get(&id).cloned()
    }
}

impl RawDataLookup for BTreeMap<RawFileId, Arc<RawDataFile>> {
    fn raw_data_file(&self, id: RawFileId) -> Option<Arc<RawDataFile>> {
        self.get(&id).cloned()
    }
}

/// Errors that can occur while building a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// I/O error reading the catalog file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Two files share an ID
    #[error("Duplicate raw file ID: {0}")]
    DuplicateFile(RawFileId),
}

/// Owned set of raw data files, shared with loaded peaks through `Arc`
#[derive(Debug, Clone, Default)]
pub struct RawDataCatalog {
    files: BTreeMap<RawFileId, Arc<RawDataFile>>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Deserialize)]
struct FileEntry {
    id: RawFileId,
    name: String,
    #[serde(default)]
    scans: Vec<Scan>,
}

impl RawDataCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, rejecting duplicate IDs
    pub fn insert(&mut self, file: RawDataFile) -> Result<Arc<RawDataFile>, CatalogError> {
        let id = file.id();
        if self.files.contains_key(&id) {
            return Err(CatalogError::DuplicateFile(id));
        }
        let file = Arc::new(file);
        self.files.insert(id, Arc::clone(&file));
        Ok(file)
    }

    /// Parse a catalog from a JSON string
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for entry in document.files {
            catalog.insert(RawDataFile::new(entry.id, entry.name, entry.scans))?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the catalog holds no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate files in ID order
    pub fn files(&self) -> impl Iterator<Item = &Arc<RawDataFile>> {
        self.files.values()
    }
}

impl RawDataLookup for RawDataCatalog {
    fn raw_data_file(&self, id: RawFileId) -> Option<Arc<RawDataFile>> {
        self.files.get(&id).cloned()
    }
}

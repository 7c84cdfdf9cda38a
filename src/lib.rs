//! # peaklist - Streaming loader for serialized peak lists
//!
//! `peaklist` reconstructs peak lists (tables of chromatographic features
//! detected across one or more raw data files) from their XML
//! serialization. The document is read in a single forward pass: structural
//! elements are plain tags, while bulk per-peak arrays (scan numbers, m/z
//! values, intensities) are Base64-encoded big-endian binary stored as
//! element text.
//!
//! ## Key Features
//!
//! - **Single-pass streaming**: A quick-xml pull parser drives an explicit
//!   state machine; the document is never held in memory as a tree.
//!
//! - **Reference resolution**: Peaks refer to raw data files and scans by
//!   number. These are resolved against a caller-supplied catalog
//!   ([`raw_data::RawDataLookup`]) that the loader never mutates.
//!
//! - **Derived statistics**: Retention time, m/z and intensity ranges are
//!   accumulated per peak while the arrays are decoded.
//!
//! - **Progress and cancellation**: A shared [`streamer::LoadProgress`]
//!   exposes the fraction of rows parsed and accepts a cancellation request
//!   from any thread.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use peaklist::archive::ProjectArchive;
//! use peaklist::raw_data::RawDataCatalog;
//!
//! let catalog = RawDataCatalog::from_file("raw_files.json")?;
//! let mut archive = ProjectArchive::open("project.zip")?;
//!
//! for entry in archive.peak_list_entries() {
//!     let peak_list = archive.load_peak_list(&entry, &catalog)?;
//!     println!("{}", peak_list.summary());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Loading From Any Reader
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use peaklist::raw_data::{RawDataFile, Scan};
//! use peaklist::streamer::PeakListStreamer;
//!
//! let mut files: HashMap<i32, Arc<RawDataFile>> = HashMap::new();
//! files.insert(1, Arc::new(RawDataFile::new(1, "run1.mzML", vec![Scan::new(1, 12.5)])));
//!
//! let xml = "<peaklist><name>Example</name><quantity>0</quantity><raw_file>1</raw_file></peaklist>";
//! let peak_list = PeakListStreamer::new(xml.as_bytes(), &files).read_peak_list()?;
//!
//! assert_eq!(peak_list.name(), "Example");
//! assert_eq!(peak_list.raw_data_files().len(), 1);
//! # Ok::<(), peaklist::streamer::PeakListError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`streamer`]: XML tokenizer loop and element state machine
//! - [`binary`]: Base64 + big-endian array decoding
//! - [`models`]: Peak list, rows, peaks, identities, isotope patterns
//! - [`range`]: Incremental range accumulation
//! - [`raw_data`]: Raw data file and scan catalog
//! - [`resolver`]: ID to raw file / retention time resolution
//! - [`archive`]: ZIP project archives holding peak list entries
//! - [`summary`]: Printable summary statistics

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod archive;
pub mod binary;
pub mod models;
pub mod range;
pub mod raw_data;
pub mod resolver;
pub mod streamer;
pub mod summary;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::archive::{ArchiveError, ProjectArchive};
    pub use crate::models::{
        AppliedMethod, ChromatographicPeak, DataPoint, IsotopePattern, IsotopePatternStatus,
        PeakIdentity, PeakList, PeakListRow, PeakStatus,
    };
    pub use crate::range::Range;
    pub use crate::raw_data::{RawDataCatalog, RawDataFile, RawDataLookup, RawFileId, Scan};
    pub use crate::streamer::{
        load_peak_list, ErrorKind, LoadProgress, PeakListError, PeakListStreamer, StreamerConfig,
    };
    pub use crate::summary::PeakListSummary;
}

//! Streaming peak list loader using quick-xml
//!
//! This module reconstructs a [`PeakList`] from its XML serialization in a
//! single forward pass. Structural elements are plain tags; bulk per-peak
//! arrays are Base64-encoded big-endian binary embedded as element text.
//!
//! ## Document Structure
//!
//! ```text
//! peaklist
//! ├── name, date, quantity (total rows)
//! ├── raw_file* (raw data file ID)
//! ├── applied_method*
//! │   ├── method_name
//! │   └── method_parameters
//! └── row* (id)
//!     ├── peak_identity* (id, preferred)
//!     │   ├── identity_name
//!     │   ├── formula
//!     │   └── identification_method
//!     └── peak* (column, mz, rt, height, area, status)
//!         ├── mzpeaks (quantity)
//!         │   ├── scan_id   (base64 int32[quantity])
//!         │   ├── mz        (base64 float32[quantity])
//!         │   └── height    (base64 float32[quantity])
//!         ├── representative_scan
//!         ├── fragment_scan
//!         └── isotope_pattern (status, charge, description)
//!             └── isotope* ("mass:intensity")
//! ```
//!
//! Raw data files and scans are never constructed here; they are resolved
//! by ID against a caller-supplied [`RawDataLookup`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::models::PeakList;
use crate::raw_data::RawDataLookup;

pub use error::{ErrorKind, PeakListError};
pub use progress::LoadProgress;

use builder::PeakListBuilder;

mod builder;
mod elements;
mod error;
mod helpers;
mod progress;


/// Default number of rows between progress log lines
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Configuration for loading peak lists
#[derive(Debug, Clone)]
pub struct StreamerConfig {
    /// Reject binary arrays holding more bytes than the declared count needs
    pub strict_array_length: bool,

    /// Reject rows that mark more than one identity as preferred
    pub reject_multiple_preferred: bool,

    /// Rows between progress log lines (0 disables them)
    pub progress_interval: usize,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            strict_array_length: false,
            reject_multiple_preferred: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl StreamerConfig {
    /// Configuration that rejects every tolerated anomaly
    pub fn strict() -> Self {
        Self {
            strict_array_length: true,
            reject_multiple_preferred: true,
            ..Self::default()
        }
    }
}

/// Streaming loader for one peak list document
pub struct PeakListStreamer<'a, R: BufRead, L: RawDataLookup + ?Sized> {
    reader: Reader<R>,
    builder: PeakListBuilder<'a, L>,
    progress: Arc<LoadProgress>,
}

impl<'a, L: RawDataLookup + ?Sized> PeakListStreamer<'a, BufReader<File>, L> {
    /// Open a peak list XML file
    pub fn open<P: AsRef<Path>>(path: P, lookup: &'a L) -> Result<Self, PeakListError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), lookup))
    }
}

impl<'a, R: BufRead, L: RawDataLookup + ?Sized> PeakListStreamer<'a, R, L> {
    /// Create a new streamer from a BufRead source
    pub fn new(reader: R, lookup: &'a L) -> Self {
        Self::with_config(reader, lookup, StreamerConfig::default())
    }

    /// Create a new streamer with custom configuration
    pub fn with_config(reader: R, lookup: &'a L, config: StreamerConfig) -> Self {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().expand_empty_elements = true;

        let progress = Arc::new(LoadProgress::new());
        Self {
            reader: xml_reader,
            builder: PeakListBuilder::new(lookup, &config, Arc::clone(&progress)),
            progress,
        }
    }

    /// Report progress into (and accept cancellation from) an existing tracker
    ///
    /// The tracker's row counters restart at zero for this load. A pending
    /// cancellation is kept, so a tracker canceled earlier stops this load
    /// before its first tag.
    pub fn with_progress(mut self, progress: Arc<LoadProgress>) -> Self {
        progress.reset_rows();
        self.builder.set_progress(Arc::clone(&progress));
        self.progress = progress;
        self
    }

    /// Handle for polling progress or canceling from another thread
    pub fn progress(&self) -> Arc<LoadProgress> {
        Arc::clone(&self.progress)
    }

    /// Parse the whole document
    pub fn read_peak_list(mut self) -> Result<PeakList, PeakListError> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    self.check_canceled()?;
                    self.builder.start_element(e)?;
                }
                Ok(Event::End(ref e)) => {
                    self.check_canceled()?;
                    self.builder.end_element(e.name().as_ref())?;
                }
                Ok(Event::Text(ref t)) => {
                    self.builder.characters(&t.unescape()?);
                }
                Ok(Event::CData(ref t)) => {
                    self.builder.characters(std::str::from_utf8(t)?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(PeakListError::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }

        self.builder.finish()
    }

    fn check_canceled(&self) -> Result<(), PeakListError> {
        if self.progress.is_canceled() {
            return Err(PeakListError::Canceled);
        }
        Ok(())
    }
}

/// Load a peak list from an in-memory document
pub fn load_peak_list<L: RawDataLookup + ?Sized>(
    xml: &str,
    lookup: &L,
) -> Result<PeakList, PeakListError> {
    PeakListStreamer::new(xml.as_bytes(), lookup).read_peak_list()
}

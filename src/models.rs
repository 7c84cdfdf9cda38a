//! Data models for loaded peak lists
//!
//! These models represent a peak list reconstructed from its serialized
//! form. Raw data files are shared with the caller's catalog through `Arc`;
//! everything else is owned by the peak list.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::raw_data::{RawDataFile, RawFileId};

mod isotope;
mod peak;

pub(crate) use isotope::parse_isotope;
pub use isotope::{IsotopePattern, IsotopePatternStatus};
pub use peak::{ChromatographicPeak, PeakStatus};

/// A single (m/z, intensity) observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    /// Mass-to-charge ratio
    pub mz: f64,
    /// Signal intensity
    pub intensity: f64,
}

impl DataPoint {
    /// Create a data point
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

/// Record of a processing step that was run over a peak list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMethod {
    /// Method name
    pub name: String,
    /// Method parameters, serialized as free text
    pub parameters: String,
}

impl AppliedMethod {
    /// Create an applied-method record
    pub fn new(name: impl Into<String>, parameters: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.into(),
        }
    }
}

/// A putative identification attached to a row
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PeakIdentity {
    /// Opaque identifier (e.g. a database accession)
    pub id: String,
    /// Display name
    pub name: String,
    /// Molecular formula
    pub formula: Option<String>,
    /// How the identity was assigned
    pub identification_method: Option<String>,
}

/// One detected feature: at most one peak per raw data file
#[derive(Debug, Clone)]
pub struct PeakListRow {
    id: i32,
    peaks: BTreeMap<RawFileId, ChromatographicPeak>,
    identities: Vec<PeakIdentity>,
    preferred_identity: Option<usize>,
}

impl PeakListRow {
    /// Create an empty row
    pub fn new(id: i32) -> Self {
        Self {
            id,
            peaks: BTreeMap::new(),
            identities: Vec::new(),
            preferred_identity: None,
        }
    }

    /// Row ID, unique within its peak list
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Insert a peak keyed by its raw data file
    ///
    /// Returns the peak previously stored for that file, if any.
    pub fn add_peak(&mut self, peak: ChromatographicPeak) -> Option<ChromatographicPeak> {
        self.peaks.insert(peak.data_file.id(), peak)
    }

    /// Peak detected in the given raw file
    pub fn peak(&self, file_id: RawFileId) -> Option<&ChromatographicPeak> {
        self.peaks.get(&file_id)
    }

    /// Peaks in raw file ID order
    pub fn peaks(&self) -> impl Iterator<Item = &ChromatographicPeak> {
        self.peaks.values()
    }

    /// Number of peaks in this row
    pub fn peak_count(&self) -> usize {
        self.peaks.len()
    }

    /// Attach an identity; a preferred identity replaces any earlier preference
    pub fn add_identity(&mut self, identity: PeakIdentity, preferred: bool) {
        self.identities.push(identity);
        if preferred {
            self.preferred_identity = Some(self.identities.len() - 1);
        }
    }

    /// All identities in declaration order
    pub fn identities(&self) -> &[PeakIdentity] {
        &self.identities
    }

    /// The identity marked preferred, if any
    pub fn preferred_identity(&self) -> Option<&PeakIdentity> {
        self.preferred_identity.map(|i| &self.identities[i])
    }

    /// Mean m/z across the row's peaks
    pub fn average_mz(&self) -> Option<f64> {
        if self.peaks.is_empty() {
            return None;
        }
        Some(self.peaks.values().map(|p| p.mz).sum::<f64>() / self.peaks.len() as f64)
    }

    /// Mean retention time across the row's peaks
    pub fn average_rt(&self) -> Option<f64> {
        if self.peaks.is_empty() {
            return None;
        }
        Some(self.peaks.values().map(|p| p.rt).sum::<f64>() / self.peaks.len() as f64)
    }
}

/// Table of detected features across one or more raw data files
#[derive(Debug, Clone)]
pub struct PeakList {
    name: String,
    raw_data_files: Vec<Arc<RawDataFile>>,
    rows: Vec<PeakListRow>,
    applied_methods: Vec<AppliedMethod>,
    date_created: Option<String>,
}

impl PeakList {
    /// Create an empty peak list over a fixed set of raw data files
    pub fn new(name: impl Into<String>, raw_data_files: Vec<Arc<RawDataFile>>) -> Self {
        Self {
            name: name.into(),
            raw_data_files,
            rows: Vec::new(),
            applied_methods: Vec::new(),
            date_created: None,
        }
    }

    /// Peak list name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation timestamp as stored (format is not interpreted)
    pub fn date_created(&self) -> Option<&str> {
        self.date_created.as_deref()
    }

    /// Set the creation timestamp
    pub fn set_date_created(&mut self, date: Option<String>) {
        self.date_created = date;
    }

    /// Raw data files, in declaration order
    pub fn raw_data_files(&self) -> &[Arc<RawDataFile>] {
        &self.raw_data_files
    }

    /// Append a row
    pub fn add_row(&mut self, row: PeakListRow) {
        self.rows.push(row);
    }

    /// Rows in the order they were added
    pub fn rows(&self) -> &[PeakListRow] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find a row by ID
    pub fn row(&self, id: i32) -> Option<&PeakListRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Record an applied processing step
    pub fn add_applied_method(&mut self, method: AppliedMethod) {
        self.applied_methods.push(method);
    }

    /// Applied processing steps, in declaration order
    pub fn applied_methods(&self) -> &[AppliedMethod] {
        &self.applied_methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_data::Scan;

    fn peak(file: &Arc<RawDataFile>, mz: f64, rt: f64) -> ChromatographicPeak {
        ChromatographicPeak {
            data_file: Arc::clone(file),
            mz,
            rt,
            height: 1.0,
            area: 1.0,
            status: PeakStatus::Detected,
            scan_numbers: Vec::new(),
            data_points: Vec::new(),
            representative_scan: None,
            fragment_scan: None,
            rt_range: None,
            mz_range: None,
            intensity_range: None,
            isotope_pattern: None,
        }
    }

    #[test]
    fn test_row_keeps_one_peak_per_file() {
        let a = Arc::new(RawDataFile::new(1, "a", vec![Scan::new(1, 1.0)]));
        let b = Arc::new(RawDataFile::new(2, "b", vec![Scan::new(1, 1.0)]));

        let mut row = PeakListRow::new(3);
        assert!(row.add_peak(peak(&a, 100.0, 2.0)).is_none());
        assert!(row.add_peak(peak(&b, 102.0, 4.0)).is_none());
        assert!(row.add_peak(peak(&a, 101.0, 2.0)).is_some());

        assert_eq!(row.peak_count(), 2);
        assert_eq!(row.peak(1).unwrap().mz, 101.0);
        assert_eq!(row.average_mz(), Some(101.5));
        assert_eq!(row.average_rt(), Some(3.0));
    }

    #[test]
    fn test_preferred_identity_last_wins() {
        let mut row = PeakListRow::new(1);
        assert!(row.preferred_identity().is_none());

        row.add_identity(
            PeakIdentity {
                id: "A".to_string(),
                ..Default::default()
            },
            true,
        );
        row.add_identity(
            PeakIdentity {
                id: "B".to_string(),
                ..Default::default()
            },
            false,
        );
        assert_eq!(row.preferred_identity().unwrap().id, "A");

        row.add_identity(
            PeakIdentity {
                id: "C".to_string(),
                ..Default::default()
            },
            true,
        );
        assert_eq!(row.preferred_identity().unwrap().id, "C");
        assert_eq!(row.identities().len(), 3);
    }

    #[test]
    fn test_peak_list_rows() {
        let mut list = PeakList::new("aligned", Vec::new());
        list.add_row(PeakListRow::new(10));
        list.add_row(PeakListRow::new(4));
        list.add_applied_method(AppliedMethod::new("Join aligner", "tolerance=0.01"));

        assert_eq!(list.row_count(), 2);
        assert_eq!(list.rows()[0].id(), 10);
        assert!(list.row(4).is_some());
        assert!(list.row(5).is_none());
        assert_eq!(list.applied_methods()[0].name, "Join aligner");
    }
}

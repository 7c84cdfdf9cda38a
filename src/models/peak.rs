use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use super::{DataPoint, IsotopePattern};
use crate::range::Range;
use crate::raw_data::RawDataFile;

/// How a peak came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeakStatus {
    /// Found by a peak detection algorithm
    Detected,
    /// Filled in by gap filling
    Estimated,
    /// Drawn by a user
    Manual,
    /// Origin not recorded
    Unknown,
}

impl PeakStatus {
    /// Token used in serialized peak lists
    pub fn as_str(&self) -> &'static str {
        match self {
            PeakStatus::Detected => "DETECTED",
            PeakStatus::Estimated => "ESTIMATED",
            PeakStatus::Manual => "MANUAL",
            PeakStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for PeakStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeakStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DETECTED" => Ok(PeakStatus::Detected),
            "ESTIMATED" => Ok(PeakStatus::Estimated),
            "MANUAL" => Ok(PeakStatus::Manual),
            "UNKNOWN" => Ok(PeakStatus::Unknown),
            _ => Err(format!(
                "Unknown peak status '{}'. Valid options: DETECTED, ESTIMATED, MANUAL, UNKNOWN",
                s
            )),
        }
    }
}

/// A chromatographic feature within one raw data file
///
/// `scan_numbers` and `data_points` are index-aligned. A `None` data point
/// marks a scan the peak spans without a real detection; it keeps the
/// position so that indices still line up with scan numbers.
#[derive(Debug, Clone)]
pub struct ChromatographicPeak {
    /// Raw data file this peak was detected in
    pub data_file: Arc<RawDataFile>,

    /// Representative m/z
    pub mz: f64,

    /// Representative retention time
    pub rt: f64,

    /// Peak height
    pub height: f64,

    /// Peak area
    pub area: f64,

    /// Origin of the peak
    pub status: PeakStatus,

    /// Scan numbers spanned by the peak
    pub scan_numbers: Vec<i32>,

    /// Per-scan data points, aligned with `scan_numbers`
    pub data_points: Vec<Option<DataPoint>>,

    /// Scan that best represents the peak
    pub representative_scan: Option<i32>,

    /// MS/MS scan associated with the peak
    pub fragment_scan: Option<i32>,

    /// Retention time range over all spanned scans
    pub rt_range: Option<Range>,

    /// m/z range over detected data points only
    pub mz_range: Option<Range>,

    /// Intensity range over all spanned scans
    pub intensity_range: Option<Range>,

    /// Isotopic envelope, if one was determined
    pub isotope_pattern: Option<IsotopePattern>,
}

impl ChromatographicPeak {
    /// Number of scans spanned, including gaps
    pub fn scan_count(&self) -> usize {
        self.scan_numbers.len()
    }

    /// Data point at the given scan number, if that scan holds a detection
    pub fn data_point(&self, scan_number: i32) -> Option<&DataPoint> {
        self.scan_numbers
            .iter()
            .position(|&s| s == scan_number)
            .and_then(|i| self.data_points.get(i))
            .and_then(Option::as_ref)
    }

    /// Detected data points with their scan numbers, gaps skipped
    pub fn detected_points(&self) -> impl Iterator<Item = (i32, &DataPoint)> {
        self.scan_numbers
            .iter()
            .zip(self.data_points.iter())
            .filter_map(|(&scan, dp)| dp.as_ref().map(|dp| (scan, dp)))
    }
}

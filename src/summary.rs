//! Summary statistics for loaded peak lists

use std::fmt;

use serde::Serialize;

use crate::models::PeakList;
use crate::range::{Range, RangeAccumulator};

/// Summary statistics about a loaded peak list
#[derive(Debug, Clone, Serialize)]
pub struct PeakListSummary {
    /// Peak list name
    pub name: String,
    /// Creation timestamp as stored
    pub date_created: Option<String>,
    /// Names of the raw data files, in declaration order
    pub raw_data_files: Vec<String>,
    /// Number of rows
    pub num_rows: usize,
    /// Number of peaks across all rows
    pub num_peaks: usize,
    /// Rows carrying at least one identity
    pub num_identified_rows: usize,
    /// Peaks with an attached isotope pattern
    pub num_isotope_patterns: usize,
    /// Scans that carry no detected data point
    pub num_gap_points: usize,
    /// Applied processing steps, in order
    pub applied_methods: Vec<String>,
    /// Peak retention time range
    pub rt_range: Option<Range>,
    /// Peak m/z range
    pub mz_range: Option<Range>,
}

impl PeakList {
    /// Get summary statistics about the peak list
    pub fn summary(&self) -> PeakListSummary {
        let mut rt_range = RangeAccumulator::new();
        let mut mz_range = RangeAccumulator::new();
        let mut num_peaks = 0;
        let mut num_isotope_patterns = 0;
        let mut num_gap_points = 0;

        for peak in self.rows().iter().flat_map(|row| row.peaks()) {
            num_peaks += 1;
            rt_range.push(peak.rt);
            mz_range.push(peak.mz);
            if peak.isotope_pattern.is_some() {
                num_isotope_patterns += 1;
            }
            num_gap_points += peak.data_points.iter().filter(|p| p.is_none()).count();
        }

        PeakListSummary {
            name: self.name().to_string(),
            date_created: self.date_created().map(str::to_string),
            raw_data_files: self
                .raw_data_files()
                .iter()
                .map(|f| f.name().to_string())
                .collect(),
            num_rows: self.row_count(),
            num_peaks,
            num_identified_rows: self
                .rows()
                .iter()
                .filter(|row| !row.identities().is_empty())
                .count(),
            num_isotope_patterns,
            num_gap_points,
            applied_methods: self
                .applied_methods()
                .iter()
                .map(|m| m.name.clone())
                .collect(),
            rt_range: rt_range.finish(),
            mz_range: mz_range.finish(),
        }
    }
}

impl fmt::Display for PeakListSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Peak List Summary")?;
        writeln!(f, "=================")?;
        writeln!(f, "Name: {}", self.name)?;
        if let Some(date) = &self.date_created {
            writeln!(f, "Created: {}", date)?;
        }
        writeln!(f, "Raw data files: {}", self.raw_data_files.len())?;
        for name in &self.raw_data_files {
            writeln!(f, "  {}", name)?;
        }
        writeln!(f, "Rows: {}", self.num_rows)?;
        writeln!(f, "  Identified: {}", self.num_identified_rows)?;
        writeln!(f, "Peaks: {}", self.num_peaks)?;
        writeln!(f, "  With isotope pattern: {}", self.num_isotope_patterns)?;
        writeln!(f, "  Gap data points: {}", self.num_gap_points)?;
        if let Some(range) = &self.rt_range {
            writeln!(f, "RT range: {:.2} - {:.2}", range.min, range.max)?;
        }
        if let Some(range) = &self.mz_range {
            writeln!(f, "m/z range: {}", range)?;
        }
        if !self.applied_methods.is_empty() {
            writeln!(f, "Applied methods:")?;
            for (i, method) in self.applied_methods.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, method)?;
            }
        }
        Ok(())
    }
}

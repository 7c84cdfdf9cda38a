//! Resolution of raw file IDs and scan numbers against a caller's catalog

use std::sync::Arc;

use crate::raw_data::{RawDataFile, RawDataLookup, RawFileId};

/// Errors raised when a reference cannot be resolved
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    /// Raw file ID not present in the catalog
    #[error("Unknown raw data file ID {0}")]
    UnknownRawFile(RawFileId),

    /// Scan number not present in the raw file
    #[error("Scan {scan} not found in raw data file {file} (#{file_id})")]
    UnknownScan {
        /// Raw file ID
        file_id: RawFileId,
        /// Raw file name
        file: String,
        /// Scan number that failed to resolve
        scan: i32,
    },
}

/// Read-only view over a [`RawDataLookup`] that turns misses into errors
pub struct ReferenceResolver<'a, L: RawDataLookup + ?Sized> {
    lookup: &'a L,
}

impl<'a, L: RawDataLookup + ?Sized> ReferenceResolver<'a, L> {
    /// Wrap a lookup table
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Raw file ID to raw data file
    pub fn raw_data_file(&self, id: RawFileId) -> Result<Arc<RawDataFile>, ResolveError> {
        self.lookup
            .raw_data_file(id)
            .ok_or(ResolveError::UnknownRawFile(id))
    }

    /// (raw file, scan number) to the scan's retention time
    pub fn retention_time(&self, file: &RawDataFile, scan: i32) -> Result<f64, ResolveError> {
        file.scan(scan)
            .map(|s| s.retention_time)
            .ok_or_else(|| ResolveError::UnknownScan {
                file_id: file.id(),
                file: file.name().to_string(),
                scan,
            })
    }
}

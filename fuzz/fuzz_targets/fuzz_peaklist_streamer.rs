#![no_main]

use libfuzzer_sys::fuzz_target;
use peaklist::raw_data::{RawDataCatalog, RawDataFile, Scan};
use peaklist::streamer::PeakListStreamer;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let mut catalog = RawDataCatalog::new();
    for id in 1..=2 {
        let scans = (1..=16).map(|n| Scan::new(n, n as f64));
        if catalog.insert(RawDataFile::new(id, "fuzz.mzML", scans)).is_err() {
            return;
        }
    }

    // Loading must either succeed or return an error, never panic
    let _ = PeakListStreamer::new(Cursor::new(data), &catalog).read_peak_list();
});

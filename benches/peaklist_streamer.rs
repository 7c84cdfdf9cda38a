use std::io::{BufReader, Cursor};
use std::sync::Arc;

use base64::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use peaklist::raw_data::{RawDataCatalog, RawDataFile, Scan};
use peaklist::streamer::PeakListStreamer;

fn encode<const N: usize>(values: impl Iterator<Item = [u8; N]>) -> String {
    let bytes: Vec<u8> = values.flatten().collect();
    BASE64_STANDARD.encode(bytes)
}

fn generate_catalog(num_files: i32, num_scans: i32) -> RawDataCatalog {
    let mut catalog = RawDataCatalog::new();
    for id in 1..=num_files {
        let scans = (1..=num_scans).map(|n| Scan::new(n, n as f64 * 0.25));
        catalog
            .insert(RawDataFile::new(id, format!("bench_{}.mzML", id), scans))
            .expect("unique file IDs");
    }
    catalog
}

fn generate_test_peaklist(num_rows: usize, num_files: i32, points_per_peak: i32) -> Vec<u8> {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>
<peaklist>
  <name>Benchmark peak list</name>
  <quantity>"#);
    xml.push_str(&num_rows.to_string());
    xml.push_str("</quantity>\n");
    for id in 1..=num_files {
        xml.push_str(&format!("  <raw_file>{}</raw_file>\n", id));
    }

    for row in 0..num_rows {
        xml.push_str(&format!("  <row id=\"{}\">\n", row + 1));
        for file in 1..=num_files {
            let scans = encode((1..=points_per_peak).map(|s| s.to_be_bytes()));
            // every tenth point is a gap
            let mzs = encode((1..=points_per_peak).map(|s| {
                let mz = if s % 10 == 0 {
                    0.0f32
                } else {
                    150.0 + row as f32 * 0.5 + s as f32 * 0.0001
                };
                mz.to_be_bytes()
            }));
            let heights = encode((1..=points_per_peak).map(|s| (1000.0f32 + s as f32 * 25.0).to_be_bytes()));

            xml.push_str(&format!(
                r#"    <peak column="{}" mz="{}" rt="{}" height="2000.0" area="50000.0" status="DETECTED">
      <mzpeaks quantity="{}">
        <scan_id>{}</scan_id>
        <mz>{}</mz>
        <height>{}</height>
      </mzpeaks>
      <isotope_pattern status="DETECTED" charge="1" description="bench">
        <isotope>{}:2000.0</isotope>
        <isotope>{}:800.0</isotope>
      </isotope_pattern>
    </peak>
"#,
                file,
                150.0 + row as f64 * 0.5,
                points_per_peak as f64 * 0.125,
                points_per_peak,
                scans,
                mzs,
                heights,
                150.0 + row as f64 * 0.5,
                151.0 + row as f64 * 0.5
            ));
        }
        xml.push_str("  </row>\n");
    }

    xml.push_str("</peaklist>\n");
    xml.into_bytes()
}

fn bench_read_peak_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("peaklist_streamer_read_peak_list");

    let num_files = 4;
    let points_per_peak = 50;
    let catalog = generate_catalog(num_files, points_per_peak);

    for num_rows in [100, 500, 1000] {
        let total_points = num_rows * num_files as usize * points_per_peak as usize;
        let xml_bytes = Arc::new(generate_test_peaklist(num_rows, num_files, points_per_peak));

        group.throughput(Throughput::Elements(total_points as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_rows),
            &xml_bytes,
            |b, bytes| {
                b.iter_batched(
                    || BufReader::new(Cursor::new(bytes.as_ref().clone())),
                    |reader| {
                        let peak_list = PeakListStreamer::new(reader, &catalog)
                            .read_peak_list()
                            .unwrap();
                        black_box(peak_list.row_count());
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_read_peak_list);
criterion_main!(benches);

//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use base64::prelude::*;
use peaklist::raw_data::{RawDataCatalog, RawDataFile, Scan};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub fn encode_i32(values: &[i32]) -> String {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
    BASE64_STANDARD.encode(bytes)
}

pub fn encode_f32(values: &[f32]) -> String {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
    BASE64_STANDARD.encode(bytes)
}

/// Retention time assigned to every catalog scan
pub fn scan_rt(scan: i32) -> f64 {
    scan as f64 * 0.5
}

/// Catalog of raw files `1..=num_files`, each with scans `1..=num_scans`
pub fn catalog(num_files: i32, num_scans: i32) -> RawDataCatalog {
    let mut catalog = RawDataCatalog::new();
    for id in 1..=num_files {
        let scans = (1..=num_scans).map(|n| Scan::new(n, scan_rt(n)));
        catalog
            .insert(RawDataFile::new(id, format!("sample_{}.mzML", id), scans))
            .unwrap();
    }
    catalog
}

/// JSON rendition of [`catalog`]
pub fn catalog_json(num_files: i32, num_scans: i32) -> String {
    let files: Vec<serde_json::Value> = (1..=num_files)
        .map(|id| {
            let scans: Vec<serde_json::Value> = (1..=num_scans)
                .map(|n| serde_json::json!({ "number": n, "retention_time": scan_rt(n) }))
                .collect();
            serde_json::json!({ "id": id, "name": format!("sample_{}.mzML", id), "scans": scans })
        })
        .collect();
    serde_json::json!({ "files": files }).to_string()
}

pub fn peak_xml(column: i32, scans: &[i32], mzs: &[f32], heights: &[f32]) -> String {
    let apex = heights
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let mz = mzs.get(apex).copied().unwrap_or(0.0);
    let rt = scans.get(apex).map(|&s| scan_rt(s)).unwrap_or(0.0);
    let height = heights.get(apex).copied().unwrap_or(0.0);
    let area: f32 = heights.iter().sum();

    format!(
        r#"<peak column="{}" mz="{}" rt="{}" height="{}" area="{}" status="DETECTED">
  <mzpeaks quantity="{}">
    <scan_id>{}</scan_id>
    <mz>{}</mz>
    <height>{}</height>
  </mzpeaks>
</peak>"#,
        column,
        mz,
        rt,
        height,
        area,
        scans.len(),
        encode_i32(scans),
        encode_f32(mzs),
        encode_f32(heights)
    )
}

pub fn row_xml(id: i32, peaks: &[String]) -> String {
    format!("<row id=\"{}\">\n{}\n</row>", id, peaks.join("\n"))
}

pub fn peak_list_xml(name: &str, files: &[i32], rows: &[String]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<peaklist>\n");
    xml.push_str(&format!("<name>{}</name>\n", name));
    xml.push_str("<date>2024-03-01 10:15:00</date>\n");
    xml.push_str(&format!("<quantity>{}</quantity>\n", rows.len()));
    for id in files {
        xml.push_str(&format!("<raw_file>{}</raw_file>\n", id));
    }
    xml.push_str(
        "<applied_method>\n<method_name>Chromatogram builder</method_name>\n<method_parameters>min height=100</method_parameters>\n</applied_method>\n",
    );
    for row in rows {
        xml.push_str(row);
        xml.push('\n');
    }
    xml.push_str("</peaklist>\n");
    xml
}

/// Peak list with `num_rows` rows, one peak per raw file per row
pub fn generate_peak_list(name: &str, num_rows: i32, num_files: i32, points: i32) -> String {
    let files: Vec<i32> = (1..=num_files).collect();
    let rows: Vec<String> = (0..num_rows)
        .map(|r| {
            let peaks: Vec<String> = files
                .iter()
                .map(|&file| {
                    let scans: Vec<i32> = (1..=points).collect();
                    let mzs: Vec<f32> = scans
                        .iter()
                        .map(|&s| 100.0 + r as f32 + s as f32 * 0.001)
                        .collect();
                    let heights: Vec<f32> = scans
                        .iter()
                        .map(|&s| 1000.0 - ((s - points / 2) as f32).abs() * 10.0)
                        .collect();
                    peak_xml(file, &scans, &mzs, &heights)
                })
                .collect();
            row_xml(r + 1, &peaks)
        })
        .collect();
    peak_list_xml(name, &files, &rows)
}

/// Write a ZIP archive with the given entries
pub fn write_archive(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

//! Tag-driven state machine that assembles a peak list
//!
//! The tokenizer pushes open tags, text and close tags in document order.
//! Attribute-carried fields are captured when an element opens, text is
//! buffered until the element closes, and composite objects (peak, row,
//! isotope pattern, identity) are finalized on their closing tag.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use quick_xml::events::BytesStart;

use super::elements::{attr, PeakListElement};
use super::helpers::{
    bool_attribute, clean_element_text, get_attribute, parse_attribute, parse_text,
    required_attribute,
};
use super::{LoadProgress, PeakListError, StreamerConfig};
use crate::binary::BinaryDecoder;
use crate::models::{
    parse_isotope, AppliedMethod, ChromatographicPeak, DataPoint, IsotopePattern, IsotopePatternStatus,
    PeakIdentity, PeakList, PeakListRow, PeakStatus,
};
use crate::range::RangeAccumulator;
use crate::raw_data::{RawDataFile, RawDataLookup, RawFileId};
use crate::resolver::ReferenceResolver;

/// Innermost composite element currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    PeakList,
    Row,
    Peak,
    MzPeaks,
    IsotopePattern,
    Identity,
}

impl Scope {
    /// Scope in which `element` may open
    fn required_for(element: PeakListElement) -> Scope {
        match element {
            PeakListElement::PeakList
            | PeakListElement::PeakListName
            | PeakListElement::PeakListDate
            | PeakListElement::Quantity
            | PeakListElement::RawFile
            | PeakListElement::AppliedMethod
            | PeakListElement::MethodName
            | PeakListElement::MethodParameters
            | PeakListElement::Row => Scope::PeakList,
            PeakListElement::Peak | PeakListElement::PeakIdentity => Scope::Row,
            PeakListElement::MzPeaks
            | PeakListElement::IsotopePattern
            | PeakListElement::RepresentativeScan
            | PeakListElement::FragmentScan => Scope::Peak,
            PeakListElement::ScanId | PeakListElement::Mz | PeakListElement::Height => {
                Scope::MzPeaks
            }
            PeakListElement::Isotope => Scope::IsotopePattern,
            PeakListElement::IdentityName
            | PeakListElement::Formula
            | PeakListElement::IdentificationMethod => Scope::Identity,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::PeakList => "peaklist",
            Scope::Row => "row",
            Scope::Peak => "peak",
            Scope::MzPeaks => "mzpeaks",
            Scope::IsotopePattern => "isotope_pattern",
            Scope::Identity => "peak_identity",
        };
        f.write_str(name)
    }
}

/// Peak list metadata collected before the container exists
#[derive(Debug, Default)]
struct Header {
    name: Option<String>,
    date: Option<String>,
    raw_files: Vec<Arc<RawDataFile>>,
    method_names: Vec<String>,
    method_parameters: Vec<String>,
    methods_applied: usize,
}

impl Header {
    /// Pair up method names and parameters not yet handed to the peak list
    fn take_applied_methods(&mut self) -> Result<Vec<AppliedMethod>, PeakListError> {
        if self.method_names.len() != self.method_parameters.len() {
            return Err(PeakListError::SchemaViolation(format!(
                "{} <method_name> elements but {} <method_parameters> elements",
                self.method_names.len(),
                self.method_parameters.len()
            )));
        }
        let start = self.methods_applied;
        self.methods_applied = self.method_names.len();
        Ok(self.method_names[start..]
            .iter()
            .zip(&self.method_parameters[start..])
            .map(|(name, parameters)| AppliedMethod::new(name.clone(), parameters.clone()))
            .collect())
    }
}

#[derive(Debug)]
struct RowBuilder {
    row: PeakListRow,
    has_preferred: bool,
}

#[derive(Debug)]
struct PeakBuilder {
    data_file: Arc<RawDataFile>,
    mz: f64,
    rt: f64,
    height: f64,
    area: f64,
    status: PeakStatus,
    quantity: Option<usize>,
    scan_numbers: Option<Vec<i32>>,
    masses: Option<Vec<f64>>,
    intensities: Option<Vec<f64>>,
    representative_scan: Option<i32>,
    fragment_scan: Option<i32>,
    isotope_pattern: Option<IsotopePattern>,
}

#[derive(Debug)]
struct IdentityBuilder {
    identity: PeakIdentity,
    preferred: bool,
}

/// Mutable parse state for one document
pub(super) struct PeakListBuilder<'a, L: RawDataLookup + ?Sized> {
    resolver: ReferenceResolver<'a, L>,
    decoder: BinaryDecoder,
    reject_multiple_preferred: bool,
    progress_interval: usize,
    progress: Arc<LoadProgress>,
    scope: Scope,
    text: String,
    root_opened: bool,
    root_closed: bool,
    header: Header,
    peak_list: Option<PeakList>,
    row_ids: HashSet<i32>,
    row: Option<RowBuilder>,
    peak: Option<PeakBuilder>,
    isotope_pattern: Option<IsotopePattern>,
    identity: Option<IdentityBuilder>,
}

impl<'a, L: RawDataLookup + ?Sized> PeakListBuilder<'a, L> {
    pub(super) fn new(lookup: &'a L, config: &StreamerConfig, progress: Arc<LoadProgress>) -> Self {
        let decoder = if config.strict_array_length {
            BinaryDecoder::strict()
        } else {
            BinaryDecoder::new()
        };
        Self {
            resolver: ReferenceResolver::new(lookup),
            decoder,
            reject_multiple_preferred: config.reject_multiple_preferred,
            progress_interval: config.progress_interval,
            progress,
            scope: Scope::PeakList,
            text: String::new(),
            root_opened: false,
            root_closed: false,
            header: Header::default(),
            peak_list: None,
            row_ids: HashSet::new(),
            row: None,
            peak: None,
            isotope_pattern: None,
            identity: None,
        }
    }

    pub(super) fn set_progress(&mut self, progress: Arc<LoadProgress>) {
        self.progress = progress;
    }

    /// Handle an opening tag
    pub(super) fn start_element(&mut self, e: &BytesStart) -> Result<(), PeakListError> {
        self.text.clear();

        let Some(element) = PeakListElement::from_name(e.name().as_ref()) else {
            return Ok(());
        };
        self.check_scope(element)?;

        match element {
            PeakListElement::PeakList => {
                if self.root_opened {
                    return Err(PeakListError::SchemaViolation(
                        "More than one <peaklist> element".to_string(),
                    ));
                }
                self.root_opened = true;
            }
            PeakListElement::PeakListName
            | PeakListElement::PeakListDate
            | PeakListElement::RawFile => {
                if self.peak_list.is_some() {
                    return Err(PeakListError::SchemaViolation(format!(
                        "<{}> after the first <row>",
                        element.name()
                    )));
                }
            }
            PeakListElement::Row => {
                let id: i32 = parse_attribute(e, element, attr::ID)?;
                if !self.row_ids.insert(id) {
                    return Err(PeakListError::SchemaViolation(format!(
                        "Duplicate row ID {}",
                        id
                    )));
                }
                self.ensure_peak_list()?;
                self.row = Some(RowBuilder {
                    row: PeakListRow::new(id),
                    has_preferred: false,
                });
                self.scope = Scope::Row;
            }
            PeakListElement::Peak => {
                let column: RawFileId = parse_attribute(e, element, attr::COLUMN)?;
                let mz = parse_attribute(e, element, attr::MZ)?;
                let rt = parse_attribute(e, element, attr::RT)?;
                let height = parse_attribute(e, element, attr::HEIGHT)?;
                let area = parse_attribute(e, element, attr::AREA)?;
                let status: PeakStatus = parse_attribute(e, element, attr::STATUS)?;
                let data_file = self.resolver.raw_data_file(column)?;

                self.peak = Some(PeakBuilder {
                    data_file,
                    mz,
                    rt,
                    height,
                    area,
                    status,
                    quantity: None,
                    scan_numbers: None,
                    masses: None,
                    intensities: None,
                    representative_scan: None,
                    fragment_scan: None,
                    isotope_pattern: None,
                });
                self.scope = Scope::Peak;
            }
            PeakListElement::MzPeaks => {
                let quantity: usize = parse_attribute(e, element, attr::QUANTITY)?;
                let peak = self.current_peak()?;
                peak.quantity = Some(quantity);
                peak.scan_numbers = None;
                peak.masses = None;
                peak.intensities = None;
                self.scope = Scope::MzPeaks;
            }
            PeakListElement::IsotopePattern => {
                let status: IsotopePatternStatus = parse_attribute(e, element, attr::STATUS)?;
                let charge: i32 = parse_attribute(e, element, attr::CHARGE)?;
                let description = get_attribute(e, attr::DESCRIPTION)?.unwrap_or_default();
                self.isotope_pattern = Some(IsotopePattern {
                    charge,
                    status,
                    description,
                    data_points: Vec::new(),
                });
                self.scope = Scope::IsotopePattern;
            }
            PeakListElement::PeakIdentity => {
                let id = required_attribute(e, element, attr::ID)?;
                let preferred = bool_attribute(e, attr::PREFERRED)?;
                self.identity = Some(IdentityBuilder {
                    identity: PeakIdentity {
                        id,
                        ..Default::default()
                    },
                    preferred,
                });
                self.scope = Scope::Identity;
            }
            _ => {}
        }

        Ok(())
    }

    /// Buffer element text
    pub(super) fn characters(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Handle a closing tag
    pub(super) fn end_element(&mut self, name: &[u8]) -> Result<(), PeakListError> {
        let Some(element) = PeakListElement::from_name(name) else {
            return Ok(());
        };

        match element {
            PeakListElement::PeakListName => {
                let name = self.take_text();
                info!("Loading peak list: {}", name);
                self.header.name = Some(name);
            }
            PeakListElement::PeakListDate => {
                self.header.date = Some(self.take_text());
            }
            PeakListElement::Quantity => {
                let total: usize = parse_text(element, &self.take_text())?;
                self.progress.set_total_rows(total);
            }
            PeakListElement::RawFile => {
                let id: RawFileId = parse_text(element, &self.take_text())?;
                let file = self.resolver.raw_data_file(id)?;
                self.header.raw_files.push(file);
            }
            PeakListElement::MethodName => {
                let name = self.take_text();
                self.header.method_names.push(name);
            }
            PeakListElement::MethodParameters => {
                let parameters = self.take_text();
                self.header.method_parameters.push(parameters);
            }
            PeakListElement::ScanId => {
                let text = self.take_text();
                let count = self.declared_quantity()?;
                let values = self
                    .decoder
                    .decode_i32(&text, count)
                    .map_err(|source| PeakListError::MalformedArray {
                        element: element.name(),
                        source,
                    })?;
                self.current_peak()?.scan_numbers = Some(values);
            }
            PeakListElement::Mz | PeakListElement::Height => {
                let text = self.take_text();
                let count = self.declared_quantity()?;
                let values = self
                    .decoder
                    .decode_f32_as_f64(&text, count)
                    .map_err(|source| PeakListError::MalformedArray {
                        element: element.name(),
                        source,
                    })?;
                let peak = self.current_peak()?;
                if element == PeakListElement::Mz {
                    peak.masses = Some(values);
                } else {
                    peak.intensities = Some(values);
                }
            }
            PeakListElement::RepresentativeScan => {
                let scan: i32 = parse_text(element, &self.take_text())?;
                self.current_peak()?.representative_scan = Some(scan);
            }
            PeakListElement::FragmentScan => {
                let scan: i32 = parse_text(element, &self.take_text())?;
                self.current_peak()?.fragment_scan = Some(scan);
            }
            PeakListElement::Isotope => {
                let text = self.take_text();
                let point = parse_isotope(&text).map_err(PeakListError::SchemaViolation)?;
                self.isotope_pattern
                    .as_mut()
                    .ok_or_else(|| missing_context(element, Scope::IsotopePattern))?
                    .data_points
                    .push(point);
            }
            PeakListElement::IdentityName
            | PeakListElement::Formula
            | PeakListElement::IdentificationMethod => {
                let text = self.take_text();
                let identity = &mut self
                    .identity
                    .as_mut()
                    .ok_or_else(|| missing_context(element, Scope::Identity))?
                    .identity;
                match element {
                    PeakListElement::IdentityName => identity.name = text,
                    PeakListElement::Formula => identity.formula = Some(text),
                    _ => identity.identification_method = Some(text),
                }
            }
            PeakListElement::MzPeaks => {
                self.scope = Scope::Peak;
            }
            PeakListElement::IsotopePattern => {
                let pattern = self
                    .isotope_pattern
                    .take()
                    .ok_or_else(|| missing_context(element, Scope::IsotopePattern))?;
                self.current_peak()?.isotope_pattern = Some(pattern);
                self.scope = Scope::Peak;
            }
            PeakListElement::Peak => {
                self.finish_peak()?;
                self.scope = Scope::Row;
            }
            PeakListElement::PeakIdentity => {
                self.finish_identity()?;
                self.scope = Scope::Row;
            }
            PeakListElement::Row => {
                self.finish_row()?;
                self.scope = Scope::PeakList;
            }
            PeakListElement::PeakList => {
                self.root_closed = true;
            }
            PeakListElement::AppliedMethod => {}
        }

        Ok(())
    }

    /// Complete the document and hand back the peak list
    pub(super) fn finish(mut self) -> Result<PeakList, PeakListError> {
        if self.scope != Scope::PeakList {
            return Err(PeakListError::SchemaViolation(format!(
                "Document ended inside <{}>",
                self.scope
            )));
        }
        if self.root_opened && !self.root_closed {
            return Err(PeakListError::SchemaViolation(
                "Document ended inside <peaklist>".to_string(),
            ));
        }

        self.ensure_peak_list()?;
        let methods = self.header.take_applied_methods()?;
        let mut peak_list = self
            .peak_list
            .take()
            .ok_or_else(|| PeakListError::SchemaViolation("Peak list was not created".to_string()))?;
        for method in methods {
            peak_list.add_applied_method(method);
        }

        info!(
            "Loaded peak list '{}': {} rows over {} raw data files",
            peak_list.name(),
            peak_list.row_count(),
            peak_list.raw_data_files().len()
        );
        Ok(peak_list)
    }

    fn check_scope(&self, element: PeakListElement) -> Result<(), PeakListError> {
        let required = Scope::required_for(element);
        if self.scope != required {
            return Err(PeakListError::SchemaViolation(format!(
                "<{}> is not allowed inside <{}>, expected inside <{}>",
                element.name(),
                self.scope,
                required
            )));
        }
        Ok(())
    }

    fn take_text(&mut self) -> String {
        let text = clean_element_text(&self.text);
        self.text.clear();
        text
    }

    fn current_peak(&mut self) -> Result<&mut PeakBuilder, PeakListError> {
        self.peak
            .as_mut()
            .ok_or_else(|| PeakListError::SchemaViolation("No <peak> is open".to_string()))
    }

    fn declared_quantity(&mut self) -> Result<usize, PeakListError> {
        self.current_peak()?.quantity.ok_or_else(|| {
            PeakListError::SchemaViolation("Array element before <mzpeaks> quantity".to_string())
        })
    }

    /// Create the peak list container the first time it is needed
    fn ensure_peak_list(&mut self) -> Result<(), PeakListError> {
        if self.peak_list.is_some() {
            return Ok(());
        }

        let name = match self.header.name.clone() {
            Some(name) => name,
            None => {
                warn!("Peak list has no <name> element");
                String::new()
            }
        };
        let mut peak_list = PeakList::new(name, self.header.raw_files.clone());
        peak_list.set_date_created(self.header.date.clone());
        for method in self.header.take_applied_methods()? {
            peak_list.add_applied_method(method);
        }

        self.peak_list = Some(peak_list);
        Ok(())
    }

    fn finish_peak(&mut self) -> Result<(), PeakListError> {
        let peak = self
            .peak
            .take()
            .ok_or_else(|| PeakListError::SchemaViolation("No <peak> is open".to_string()))?;

        let quantity = peak.quantity.ok_or_else(|| {
            PeakListError::SchemaViolation(format!(
                "<peak> in {} closed without <mzpeaks>",
                peak.data_file
            ))
        })?;
        let scan_numbers = require_array(peak.scan_numbers, quantity, PeakListElement::ScanId)?;
        let masses = require_array(peak.masses, quantity, PeakListElement::Mz)?;
        let intensities = require_array(peak.intensities, quantity, PeakListElement::Height)?;

        let mut rt_range = RangeAccumulator::new();
        let mut mz_range = RangeAccumulator::new();
        let mut intensity_range = RangeAccumulator::new();
        let mut data_points = Vec::with_capacity(quantity);

        for ((&scan, &mz), &intensity) in scan_numbers.iter().zip(&masses).zip(&intensities) {
            let retention_time = self.resolver.retention_time(&peak.data_file, scan)?;
            rt_range.push(retention_time);
            intensity_range.push(intensity);

            // m/z <= 0 marks a scan without a real detection
            if mz > 0.0 {
                data_points.push(Some(DataPoint::new(mz, intensity)));
                mz_range.push(mz);
            } else {
                data_points.push(None);
            }
        }

        let isotope_pattern = peak.isotope_pattern.filter(|p| !p.is_empty());

        let chromatographic_peak = ChromatographicPeak {
            data_file: peak.data_file,
            mz: peak.mz,
            rt: peak.rt,
            height: peak.height,
            area: peak.area,
            status: peak.status,
            scan_numbers,
            data_points,
            representative_scan: peak.representative_scan,
            fragment_scan: peak.fragment_scan,
            rt_range: rt_range.finish(),
            mz_range: mz_range.finish(),
            intensity_range: intensity_range.finish(),
            isotope_pattern,
        };

        let row = self
            .row
            .as_mut()
            .ok_or_else(|| missing_context(PeakListElement::Peak, Scope::Row))?;
        let file_id = chromatographic_peak.data_file.id();
        if row.row.peak(file_id).is_some() {
            return Err(PeakListError::SchemaViolation(format!(
                "Row {} has more than one peak for raw data file {}",
                row.row.id(),
                chromatographic_peak.data_file
            )));
        }
        row.row.add_peak(chromatographic_peak);
        Ok(())
    }

    fn finish_identity(&mut self) -> Result<(), PeakListError> {
        let IdentityBuilder {
            identity,
            preferred,
        } = self
            .identity
            .take()
            .ok_or_else(|| missing_context(PeakListElement::PeakIdentity, Scope::Identity))?;
        let reject_multiple_preferred = self.reject_multiple_preferred;
        let row = self
            .row
            .as_mut()
            .ok_or_else(|| missing_context(PeakListElement::PeakIdentity, Scope::Row))?;

        if preferred && row.has_preferred {
            if reject_multiple_preferred {
                return Err(PeakListError::SchemaViolation(format!(
                    "Row {} has more than one preferred identity",
                    row.row.id()
                )));
            }
            warn!(
                "Row {} has more than one preferred identity, keeping '{}'",
                row.row.id(),
                identity.id
            );
        }
        row.has_preferred |= preferred;
        row.row.add_identity(identity, preferred);
        Ok(())
    }

    fn finish_row(&mut self) -> Result<(), PeakListError> {
        let RowBuilder { row, .. } = self
            .row
            .take()
            .ok_or_else(|| missing_context(PeakListElement::Row, Scope::PeakList))?;
        self.peak_list
            .as_mut()
            .ok_or_else(|| PeakListError::SchemaViolation("Peak list was not created".to_string()))?
            .add_row(row);

        let parsed = self.progress.record_row();
        if self.progress_interval > 0 && parsed % self.progress_interval == 0 {
            debug!(
                "Parsed {} of {} rows ({:.1}%)",
                parsed,
                self.progress.total_rows(),
                self.progress.progress() * 100.0
            );
        }
        Ok(())
    }
}

/// Unwrap a decoded array, treating an absent array as empty only when zero values are declared
fn require_array<T>(
    values: Option<Vec<T>>,
    quantity: usize,
    element: PeakListElement,
) -> Result<Vec<T>, PeakListError> {
    match values {
        Some(values) if values.len() == quantity => Ok(values),
        Some(values) => Err(PeakListError::SchemaViolation(format!(
            "<{}> holds {} values but <mzpeaks> declares {}",
            element.name(),
            values.len(),
            quantity
        ))),
        None if quantity == 0 => Ok(Vec::new()),
        None => Err(PeakListError::SchemaViolation(format!(
            "<peak> closed without <{}>",
            element.name()
        ))),
    }
}

fn missing_context(element: PeakListElement, scope: Scope) -> PeakListError {
    PeakListError::SchemaViolation(format!(
        "<{}> closed without an open <{}>",
        element.name(),
        scope
    ))
}

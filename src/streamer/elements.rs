//! Element and attribute vocabulary of serialized peak lists

/// Elements the streamer reacts to; anything else is skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PeakListElement {
    PeakList,
    PeakListName,
    PeakListDate,
    Quantity,
    RawFile,
    AppliedMethod,
    MethodName,
    MethodParameters,
    Row,
    PeakIdentity,
    IdentityName,
    Formula,
    IdentificationMethod,
    Peak,
    MzPeaks,
    ScanId,
    Mz,
    Height,
    RepresentativeScan,
    FragmentScan,
    IsotopePattern,
    Isotope,
}

impl PeakListElement {
    pub(super) fn from_name(name: &[u8]) -> Option<Self> {
        let element = match name {
            b"peaklist" => PeakListElement::PeakList,
            b"name" => PeakListElement::PeakListName,
            b"date" => PeakListElement::PeakListDate,
            b"quantity" => PeakListElement::Quantity,
            b"raw_file" => PeakListElement::RawFile,
            b"applied_method" => PeakListElement::AppliedMethod,
            b"method_name" => PeakListElement::MethodName,
            b"method_parameters" => PeakListElement::MethodParameters,
            b"row" => PeakListElement::Row,
            b"peak_identity" => PeakListElement::PeakIdentity,
            b"identity_name" => PeakListElement::IdentityName,
            b"formula" => PeakListElement::Formula,
            b"identification_method" => PeakListElement::IdentificationMethod,
            b"peak" => PeakListElement::Peak,
            b"mzpeaks" => PeakListElement::MzPeaks,
            b"scan_id" => PeakListElement::ScanId,
            b"mz" => PeakListElement::Mz,
            b"height" => PeakListElement::Height,
            b"representative_scan" => PeakListElement::RepresentativeScan,
            b"fragment_scan" => PeakListElement::FragmentScan,
            b"isotope_pattern" => PeakListElement::IsotopePattern,
            b"isotope" => PeakListElement::Isotope,
            _ => return None,
        };
        Some(element)
    }

    pub(super) fn name(&self) -> &'static str {
        match self {
            PeakListElement::PeakList => "peaklist",
            PeakListElement::PeakListName => "name",
            PeakListElement::PeakListDate => "date",
            PeakListElement::Quantity => "quantity",
            PeakListElement::RawFile => "raw_file",
            PeakListElement::AppliedMethod => "applied_method",
            PeakListElement::MethodName => "method_name",
            PeakListElement::MethodParameters => "method_parameters",
            PeakListElement::Row => "row",
            PeakListElement::PeakIdentity => "peak_identity",
            PeakListElement::IdentityName => "identity_name",
            PeakListElement::Formula => "formula",
            PeakListElement::IdentificationMethod => "identification_method",
            PeakListElement::Peak => "peak",
            PeakListElement::MzPeaks => "mzpeaks",
            PeakListElement::ScanId => "scan_id",
            PeakListElement::Mz => "mz",
            PeakListElement::Height => "height",
            PeakListElement::RepresentativeScan => "representative_scan",
            PeakListElement::FragmentScan => "fragment_scan",
            PeakListElement::IsotopePattern => "isotope_pattern",
            PeakListElement::Isotope => "isotope",
        }
    }
}

pub(super) mod attr {
    pub const ID: &str = "id";
    pub const PREFERRED: &str = "preferred";
    pub const COLUMN: &str = "column";
    pub const MZ: &str = "mz";
    pub const RT: &str = "rt";
    pub const HEIGHT: &str = "height";
    pub const AREA: &str = "area";
    pub const STATUS: &str = "status";
    pub const QUANTITY: &str = "quantity";
    pub const CHARGE: &str = "charge";
    pub const DESCRIPTION: &str = "description";
}

use crate::binary::BinaryDecodeError;
use crate::resolver::ResolveError;

/// Coarse classification of a [`PeakListError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A binary array failed to decode or was shorter than declared
    MalformedArray,
    /// The document does not follow the peak list schema
    SchemaViolation,
    /// A raw file ID or scan number is missing from the catalog
    UnresolvedReference,
    /// Loading was canceled by the caller
    Canceled,
    /// The underlying byte stream failed
    Io,
}

/// Errors that can occur while loading a peak list
#[derive(Debug, thiserror::Error)]
pub enum PeakListError {
    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// UTF-8 encoding error in text content
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// Error decoding a binary data array
    #[error("Malformed <{element}> array: {source}")]
    MalformedArray {
        /// Element holding the array
        element: &'static str,
        /// Underlying decode error
        #[source]
        source: BinaryDecodeError,
    },

    /// Reference to a raw file or scan that the catalog does not know
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(#[from] ResolveError),

    /// Invalid peak list document structure or value
    #[error("Invalid peak list document: {0}")]
    SchemaViolation(String),

    /// Required XML attribute is missing
    #[error("Missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        /// Element name
        element: &'static str,
        /// Attribute name
        attribute: &'static str,
    },

    /// Invalid value for an XML attribute
    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>: {reason}")]
    InvalidAttributeValue {
        /// Element name
        element: &'static str,
        /// Attribute name
        attribute: &'static str,
        /// Raw attribute value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Loading was canceled through [`LoadProgress::cancel`](super::LoadProgress::cancel)
    #[error("Parsing canceled")]
    Canceled,
}

impl PeakListError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PeakListError::MalformedArray { .. } => ErrorKind::MalformedArray,
            PeakListError::UnresolvedReference(_) => ErrorKind::UnresolvedReference,
            PeakListError::Canceled => ErrorKind::Canceled,
            PeakListError::IoError(_) | PeakListError::XmlError(quick_xml::Error::Io(_)) => {
                ErrorKind::Io
            }
            PeakListError::XmlError(_)
            | PeakListError::Utf8Error(_)
            | PeakListError::SchemaViolation(_)
            | PeakListError::MissingAttribute { .. }
            | PeakListError::InvalidAttributeValue { .. } => ErrorKind::SchemaViolation,
        }
    }

    /// Whether this error was caused by cancellation
    pub fn is_canceled(&self) -> bool {
        matches!(self, PeakListError::Canceled)
    }
}

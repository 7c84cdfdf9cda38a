use std::fmt::Display;
use std::str::FromStr;

use quick_xml::events::BytesStart;

use super::elements::PeakListElement;
use super::PeakListError;

/// Helper function to get an attribute value from a BytesStart
pub(super) fn get_attribute(e: &BytesStart, name: &str) -> Result<Option<String>, PeakListError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| PeakListError::XmlError(quick_xml::Error::from(e)))?;
        if attr.key.as_ref() == name.as_bytes() {
            let raw = std::str::from_utf8(&attr.value)?;
            let value = quick_xml::escape::unescape(raw)
                .map_err(quick_xml::Error::from)?
                .into_owned();
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// Get an attribute that must be present
pub(super) fn required_attribute(
    e: &BytesStart,
    element: PeakListElement,
    name: &'static str,
) -> Result<String, PeakListError> {
    get_attribute(e, name)?.ok_or(PeakListError::MissingAttribute {
        element: element.name(),
        attribute: name,
    })
}

/// Get a required attribute and parse it
pub(super) fn parse_attribute<T>(
    e: &BytesStart,
    element: PeakListElement,
    name: &'static str,
) -> Result<T, PeakListError>
where
    T: FromStr,
    T::Err: Display,
{
    let value = required_attribute(e, element, name)?;
    value
        .trim()
        .parse()
        .map_err(|err: T::Err| PeakListError::InvalidAttributeValue {
            element: element.name(),
            attribute: name,
            reason: err.to_string(),
            value,
        })
}

/// Parse an optional boolean attribute; anything but `true` is false
pub(super) fn bool_attribute(e: &BytesStart, name: &str) -> Result<bool, PeakListError> {
    Ok(get_attribute(e, name)?
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false))
}

/// Element text as stored: drops newlines, carriage returns and tabs
/// anywhere, then leading whitespace. Inner spaces are kept.
pub(super) fn clean_element_text(raw: &str) -> String {
    let text: String = raw
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect();
    match text.find(|c: char| !c.is_ascii_whitespace()) {
        Some(0) => text,
        Some(start) => text[start..].to_string(),
        None => String::new(),
    }
}

/// Parse element text into a value
pub(super) fn parse_text<T>(element: PeakListElement, text: &str) -> Result<T, PeakListError>
where
    T: FromStr,
    T::Err: Display,
{
    text.trim().parse().map_err(|err: T::Err| {
        PeakListError::SchemaViolation(format!(
            "Invalid value '{}' in <{}>: {}",
            text,
            element.name(),
            err
        ))
    })
}

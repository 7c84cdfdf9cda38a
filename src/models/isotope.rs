use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::DataPoint;

/// Whether an isotope pattern was observed or calculated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IsotopePatternStatus {
    /// Observed in the raw data
    Detected,
    /// Calculated from a formula
    Predicted,
}

impl IsotopePatternStatus {
    /// Token used in serialized peak lists
    pub fn as_str(&self) -> &'static str {
        match self {
            IsotopePatternStatus::Detected => "DETECTED",
            IsotopePatternStatus::Predicted => "PREDICTED",
        }
    }
}

impl fmt::Display for IsotopePatternStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IsotopePatternStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DETECTED" => Ok(IsotopePatternStatus::Detected),
            "PREDICTED" => Ok(IsotopePatternStatus::Predicted),
            _ => Err(format!(
                "Unknown isotope pattern status '{}'. Valid options: DETECTED, PREDICTED",
                s
            )),
        }
    }
}

/// Cluster of (m/z, intensity) pairs forming one peak's isotopic envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsotopePattern {
    /// Charge state
    pub charge: i32,
    /// Observed or predicted
    pub status: IsotopePatternStatus,
    /// Free-text description
    pub description: String,
    /// Isotopes in declaration order
    pub data_points: Vec<DataPoint>,
}

impl IsotopePattern {
    /// Number of isotopes
    pub fn len(&self) -> usize {
        self.data_points.len()
    }

    /// Whether the pattern holds no isotopes
    pub fn is_empty(&self) -> bool {
        self.data_points.is_empty()
    }

    /// Most intense isotope
    pub fn base_peak(&self) -> Option<&DataPoint> {
        self.data_points
            .iter()
            .max_by(|a, b| {
                a.intensity
                    .partial_cmp(&b.intensity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Parse one `mass:intensity` isotope entry
pub(crate) fn parse_isotope(text: &str) -> Result<DataPoint, String> {
    let mut items = text.split(':');
    let (Some(mz), Some(intensity), None) = (items.next(), items.next(), items.next()) else {
        return Err(format!("Expected 'mass:intensity', got '{}'", text));
    };
    let mz = mz
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("Invalid isotope mass '{}': {}", mz, e))?;
    let intensity = intensity
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("Invalid isotope intensity '{}': {}", intensity, e))?;
    Ok(DataPoint::new(mz, intensity))
}

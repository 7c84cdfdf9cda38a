//! Inclusive numeric ranges built incrementally while values stream in

use std::fmt;

use serde::Serialize;

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Range {
    /// Degenerate range holding a single value
    pub fn single(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Range from two bounds in any order
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Grow the range so that it contains `value`
    pub fn extend(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Whether `value` lies inside the range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// `max - min`
    pub fn size(&self) -> f64 {
        self.max - self.min
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} - {:.4}", self.min, self.max)
    }
}

/// Running min/max over a sequence of observations
///
/// Non-finite observations are skipped so that a single NaN cannot poison
/// the interval. The accumulator stays empty until the first valid value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeAccumulator {
    range: Option<Range>,
}

impl RangeAccumulator {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a value
    pub fn push(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        match self.range.as_mut() {
            Some(range) => range.extend(value),
            None => self.range = Some(Range::single(value)),
        }
    }

    /// Current interval, `None` if nothing valid was observed
    pub fn range(&self) -> Option<Range> {
        self.range
    }

    /// Consume the accumulator
    pub fn finish(self) -> Option<Range> {
        self.range
    }
}

impl Extend<f64> for RangeAccumulator {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for value in iter {
            self.push(value);
        }
    }
}

impl FromIterator<f64> for RangeAccumulator {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_accumulator() {
        assert_eq!(RangeAccumulator::new().finish(), None);
    }

    #[test]
    fn test_accumulates_min_max() {
        let acc: RangeAccumulator = [5.0, 1.5, 9.25, 3.0].into_iter().collect();
        assert_eq!(acc.range(), Some(Range::new(1.5, 9.25)));
    }

    #[test]
    fn test_single_value() {
        let mut acc = RangeAccumulator::new();
        acc.push(42.0);
        let range = acc.finish().unwrap();
        assert_eq!(range.min, 42.0);
        assert_eq!(range.max, 42.0);
        assert_eq!(range.size(), 0.0);
    }

    #[test]
    fn test_skips_non_finite() {
        let acc: RangeAccumulator = [f64::NAN, 2.0, f64::INFINITY, 1.0]
            .into_iter()
            .collect();
        assert_eq!(acc.range(), Some(Range::new(1.0, 2.0)));
    }

    #[test]
    fn test_range_contains() {
        let range = Range::new(10.0, 2.0);
        assert_eq!(range.min, 2.0);
        assert!(range.contains(2.0));
        assert!(range.contains(10.0));
        assert!(!range.contains(10.5));
    }
}

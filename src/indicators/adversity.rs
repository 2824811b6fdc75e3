use serde::Serialize;
use std::fmt;

/// Five-level adversity label derived from the aggregated health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AdversityLevel {
    #[serde(rename = "very low")]
    VeryLow,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "average")]
    Average,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

pub const BINS: usize = 5;

impl AdversityLevel {
    const ASCENDING: [AdversityLevel; BINS] = [
        AdversityLevel::VeryLow,
        AdversityLevel::Low,
        AdversityLevel::Average,
        AdversityLevel::High,
        AdversityLevel::VeryHigh,
    ];

    /// Label for bin `i` when higher values mean more adversity.
    pub fn from_bin(i: usize) -> Self {
        Self::ASCENDING[i.min(BINS - 1)]
    }

    /// Label for bin `i` when higher values mean less adversity.
    pub fn from_bin_reversed(i: usize) -> Self {
        Self::ASCENDING[BINS - 1 - i.min(BINS - 1)]
    }

    pub fn label(self) -> &'static str {
        match self {
            AdversityLevel::VeryLow => "very low",
            AdversityLevel::Low => "low",
            AdversityLevel::Average => "average",
            AdversityLevel::High => "high",
            AdversityLevel::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for AdversityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Places `value` into one of [`BINS`] equal-width bins spanning
/// `[min, max]`. The first bin is closed on both ends, the others are
/// `(lo, hi]`. Values outside the range have no bin. A zero-width range
/// puts everything in the middle bin.
pub fn equal_width_bin(value: f64, min: f64, max: f64) -> Option<usize> {
    if !(value.is_finite() && min <= value && value <= max) {
        return None;
    }
    if min == max {
        return Some(BINS / 2);
    }

    let width = (max - min) / BINS as f64;
    let edge = |i: usize| if i == BINS { max } else { min + width * i as f64 };

    (0..BINS).find(|&i| value <= edge(i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_boundaries() {
        assert_eq!(equal_width_bin(0.0, 0.0, 10.0), Some(0));
        assert_eq!(equal_width_bin(2.0, 0.0, 10.0), Some(0));
        assert_eq!(equal_width_bin(2.01, 0.0, 10.0), Some(1));
        assert_eq!(equal_width_bin(6.0, 0.0, 10.0), Some(2));
        assert_eq!(equal_width_bin(8.5, 0.0, 10.0), Some(4));
        assert_eq!(equal_width_bin(10.0, 0.0, 10.0), Some(4));
    }

    #[test]
    fn test_out_of_range_and_degenerate() {
        assert_eq!(equal_width_bin(-0.1, 0.0, 10.0), None);
        assert_eq!(equal_width_bin(f64::NAN, 0.0, 10.0), None);
        assert_eq!(equal_width_bin(3.0, 3.0, 3.0), Some(2));
    }

    #[test]
    fn test_labels() {
        assert_eq!(AdversityLevel::from_bin(0), AdversityLevel::VeryLow);
        assert_eq!(AdversityLevel::from_bin(4), AdversityLevel::VeryHigh);
        assert_eq!(AdversityLevel::from_bin_reversed(0), AdversityLevel::VeryHigh);
        assert_eq!(AdversityLevel::from_bin_reversed(3), AdversityLevel::Low);
        assert_eq!(AdversityLevel::High.to_string(), "high");
    }
}

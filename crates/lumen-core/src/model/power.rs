// ── Power ranges ──

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive power interval in dBm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerRange {
    pub lower: f64,
    pub upper: f64,
}

impl PowerRange {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

impl fmt::Display for PowerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}..{:?}]", self.lower, self.upper)
    }
}

/// Which of the two ranges a port reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerRangeKind {
    /// RX-direction port.
    Input,
    /// TX-direction / configurable port.
    Target,
}

/// A power range tagged with its kind. A port only ever carries one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortPowerRange {
    pub kind: PowerRangeKind,
    pub range: PowerRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let range = PowerRange::new(-10.0, 5.0);
        assert!(range.contains(-10.0));
        assert!(range.contains(5.0));
        assert!(range.contains(0.0));
        assert!(!range.contains(5.01));
        assert!(!range.contains(-10.5));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn display_uses_interval_notation() {
        assert_eq!(PowerRange::new(-10.0, 5.0).to_string(), "[-10.0..5.0]");
        assert_eq!(PowerRange::new(-2.5, 3.25).to_string(), "[-2.5..3.25]");
    }
}

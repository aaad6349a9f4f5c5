// ── Per-field resolution results ──
//
// A port fact is either a known value, unknown (expected but not
// reported), or not applicable (the port or device has no such thing).
// The two sentinels render to distinct fixed strings at the boundary.

use serde::{Deserialize, Serialize};

/// Display string for a value that exists but could not be read.
pub const UNKNOWN: &str = "unknown";

/// Display string for a value the port or device does not have.
pub const NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Fact<T> {
    Known(T),
    Unknown,
    NotApplicable,
}

impl<T> Fact<T> {
    /// `Known` for `Some`, `Unknown` for `None`.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown | Self::NotApplicable => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fact<U> {
        match self {
            Self::Known(v) => Fact::Known(f(v)),
            Self::Unknown => Fact::Unknown,
            Self::NotApplicable => Fact::NotApplicable,
        }
    }

    /// Render for display, formatting a known value with `f`.
    pub fn render_with(&self, f: impl FnOnce(&T) -> String) -> String {
        match self {
            Self::Known(v) => f(v),
            Self::Unknown => UNKNOWN.to_owned(),
            Self::NotApplicable => NOT_APPLICABLE.to_owned(),
        }
    }
}

impl<T: ToString> Fact<T> {
    pub fn render(&self) -> String {
        self.render_with(ToString::to_string)
    }
}

/// Render a double the way the UI expects (`5.0`, `-3.25`, `193.1`).
pub fn fmt_double(value: f64) -> String {
    format!("{value:?}")
}

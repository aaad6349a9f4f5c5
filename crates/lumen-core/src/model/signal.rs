// ── Optical signal types ──
//
// Frequencies are kept as integral hertz so grid arithmetic stays exact;
// display conversions to THz / GHz happen at the response boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

const HZ_PER_MHZ: u64 = 1_000_000;
const HZ_PER_GHZ: u64 = 1_000_000_000;
const HZ_PER_THZ: u64 = 1_000_000_000_000;

// ── Frequency ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency(u64);

impl Frequency {
    /// ITU-T G.694.1 anchor frequency, 193.1 THz.
    pub const GRID_ANCHOR: Self = Self(193_100 * HZ_PER_GHZ);

    pub const fn from_hz(hz: u64) -> Self {
        Self(hz)
    }

    pub const fn from_ghz(ghz: u64) -> Self {
        Self(ghz * HZ_PER_GHZ)
    }

    /// Convert a THz reading, rounded to the nearest hertz.
    ///
    /// Returns `None` for non-finite or negative input.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    pub fn from_thz(thz: f64) -> Option<Self> {
        if !thz.is_finite() || thz < 0.0 {
            return None;
        }
        let hz = (thz * 1e12).round();
        if hz > u64::MAX as f64 {
            return None;
        }
        Some(Self(hz as u64))
    }

    pub const fn as_hz(self) -> u64 {
        self.0
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn as_thz(self) -> f64 {
        self.0 as f64 / HZ_PER_THZ as f64
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn as_ghz(self) -> f64 {
        self.0 as f64 / HZ_PER_GHZ as f64
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn as_mhz(self) -> f64 {
        self.0 as f64 / HZ_PER_MHZ as f64
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} THz", self.as_thz())
    }
}

// ── Grid ────────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GridType {
    Dwdm,
    Cwdm,
    Flex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum ChannelSpacing {
    #[serde(rename = "CHL_100GHZ")]
    #[strum(serialize = "CHL_100GHZ")]
    Ghz100,
    #[serde(rename = "CHL_50GHZ")]
    #[strum(serialize = "CHL_50GHZ")]
    Ghz50,
    #[serde(rename = "CHL_25GHZ")]
    #[strum(serialize = "CHL_25GHZ")]
    Ghz25,
    #[serde(rename = "CHL_12P5GHZ")]
    #[strum(serialize = "CHL_12P5GHZ")]
    Ghz12p5,
    #[serde(rename = "CHL_6P25GHZ")]
    #[strum(serialize = "CHL_6P25GHZ")]
    Ghz6p25,
}

impl ChannelSpacing {
    pub const fn frequency(self) -> Frequency {
        match self {
            Self::Ghz100 => Frequency::from_hz(100 * HZ_PER_GHZ),
            Self::Ghz50 => Frequency::from_hz(50 * HZ_PER_GHZ),
            Self::Ghz25 => Frequency::from_hz(25 * HZ_PER_GHZ),
            Self::Ghz12p5 => Frequency::from_hz(12_500 * HZ_PER_MHZ),
            Self::Ghz6p25 => Frequency::from_hz(6_250 * HZ_PER_MHZ),
        }
    }
}

// ── OchSignal ───────────────────────────────────────────────────────

/// One channel assignment on a port's grid.
///
/// The central frequency is `GRID_ANCHOR + spacing_multiplier * channel_spacing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OchSignal {
    pub grid: GridType,
    pub channel_spacing: ChannelSpacing,
    pub spacing_multiplier: i32,
    #[serde(default = "default_slot_granularity")]
    pub slot_granularity: u32,
}

fn default_slot_granularity() -> u32 {
    4
}

impl OchSignal {
    pub fn new(grid: GridType, channel_spacing: ChannelSpacing, spacing_multiplier: i32) -> Self {
        Self {
            grid,
            channel_spacing,
            spacing_multiplier,
            slot_granularity: default_slot_granularity(),
        }
    }

    /// Default template used when a port exposes no grid of its own.
    pub fn dwdm_50ghz() -> Self {
        Self::new(GridType::Dwdm, ChannelSpacing::Ghz50, 0)
    }

    pub fn central_frequency(&self) -> Frequency {
        let spacing = i128::from(self.channel_spacing.frequency().as_hz());
        let offset = i128::from(self.spacing_multiplier) * spacing;
        let hz = i128::from(Frequency::GRID_ANCHOR.as_hz()) + offset;
        Frequency::from_hz(u64::try_from(hz).unwrap_or(0))
    }

    /// Build the signal on `template`'s grid whose central frequency is
    /// closest to `frequency`.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn anchored_at(template: &Self, frequency: Frequency) -> Self {
        let spacing = i128::from(template.channel_spacing.frequency().as_hz());
        let delta = i128::from(frequency.as_hz()) - i128::from(Frequency::GRID_ANCHOR.as_hz());
        // Round half away from zero.
        let half = spacing / 2;
        let steps = if delta >= 0 {
            (delta + half) / spacing
        } else {
            (delta - half) / spacing
        };
        let multiplier = i32::try_from(steps).unwrap_or(if steps < 0 { i32::MIN } else { i32::MAX });
        Self {
            spacing_multiplier: multiplier,
            ..*template
        }
    }
}

impl fmt::Display for OchSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/x{} ({})",
            self.grid,
            self.channel_spacing,
            self.spacing_multiplier,
            self.central_frequency()
        )
    }
}

// ── Modulation ──────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModulationScheme {
    DpQpsk,
    #[strum(serialize = "DP_8QAM")]
    #[serde(rename = "DP_8QAM")]
    Dp8Qam,
    #[strum(serialize = "DP_16QAM")]
    #[serde(rename = "DP_16QAM")]
    Dp16Qam,
}

// ── Device and port domain types ──

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};

use super::signal::OchSignal;

// ── DeviceId ────────────────────────────────────────────────────────

/// Opaque device identifier (e.g. `of:0000000000000001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── PortNumber ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortNumber(u64);

impl PortNumber {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PortNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PortNumber {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

// ── ConnectPoint ────────────────────────────────────────────────────

/// A (device, port) pair. Identifies protection groups and path outputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectPoint {
    pub device_id: DeviceId,
    pub port: PortNumber,
}

impl ConnectPoint {
    pub fn new(device_id: impl Into<DeviceId>, port: impl Into<PortNumber>) -> Self {
        Self {
            device_id: device_id.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for ConnectPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_id, self.port)
    }
}

/// Error returned when a `device/port` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid connect point '{0}': expected <device>/<port>")]
pub struct ParseConnectPointError(String);

impl FromStr for ConnectPoint {
    type Err = ParseConnectPointError;

    // Device ids may contain '/', so split at the last one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (device, port) = s
            .rsplit_once('/')
            .ok_or_else(|| ParseConnectPointError(s.to_owned()))?;
        if device.is_empty() {
            return Err(ParseConnectPointError(s.to_owned()));
        }
        let port: u64 = port
            .parse()
            .map_err(|_| ParseConnectPointError(s.to_owned()))?;
        Ok(Self::new(device, port))
    }
}

// ── Device ──────────────────────────────────────────────────────────

/// Role of a managed optical network element.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    /// Reconfigurable optical add-drop multiplexer (generic optical switch).
    Roadm,
    /// Optical protection / fiber switch.
    FiberSwitch,
    Other,
}

impl DeviceType {
    pub fn is_protection_switch(self) -> bool {
        matches!(self, Self::FiberSwitch)
    }
}

/// Inventory view of a device. Availability is not part of it: it is
/// always asked of the device service at request time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[serde(default)]
    pub name: Option<String>,
}

// ── Port ────────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortType {
    /// Line-side optical channel port.
    Och,
    /// Optical multiplex section port.
    Oms,
    Fiber,
    Other,
}

impl PortType {
    /// Only line-side channel ports carry a modulation format.
    pub fn carries_modulation(self) -> bool {
        matches!(self, Self::Och)
    }
}

/// Port on a device, as enumerated by the device service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub number: PortNumber,
    #[serde(rename = "type")]
    pub port_type: PortType,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub name: Option<String>,
    /// Paired port annotation. Lookup only.
    #[serde(default)]
    pub reverse_port: Option<String>,
    /// The signal template of the port's grid, when the port exposes one.
    #[serde(default)]
    pub lambda: Option<OchSignal>,
}

fn default_enabled() -> bool {
    true
}

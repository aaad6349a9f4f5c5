// ── Command system ──
//
// Operator mutations arrive as typed `Command` values and are checked
// by the validator before any backend write. Validation failures are
// results, not errors: they come back as `valid = false` plus a message.

mod validate;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ConnectPoint, DeviceId, Fact, PortNumber};

pub(crate) use validate::CommandValidator;

/// A mutation requested by the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    SetTargetPower {
        device_id: DeviceId,
        port: PortNumber,
        power: f64,
    },
    SyncTargetPower {
        device_id: DeviceId,
        port: PortNumber,
    },
    /// The scheme is forwarded to the backend without interpretation.
    SetModulation {
        device_id: DeviceId,
        port: PortNumber,
        scheme: String,
    },
    /// `frequency` is the operator's THz text, parsed at execution.
    SetFrequency {
        device_id: DeviceId,
        port: PortNumber,
        frequency: String,
    },
    /// `operation` is the raw keyword. `group` selects the protection
    /// group; the first reported group is used when absent.
    SetProtectionMode {
        device_id: DeviceId,
        operation: String,
        index: i32,
        group: Option<ConnectPoint>,
    },
}

impl Command {
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::SetTargetPower { device_id, .. }
            | Self::SyncTargetPower { device_id, .. }
            | Self::SetModulation { device_id, .. }
            | Self::SetFrequency { device_id, .. }
            | Self::SetProtectionMode { device_id, .. } => device_id,
        }
    }
}

/// Outcome of an executed command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    TargetPower {
        port: PortNumber,
        valid: bool,
        message: String,
    },
    SyncedTargetPower {
        port: PortNumber,
        power: Fact<f64>,
        message: String,
    },
    Modulation {
        port: PortNumber,
        scheme: String,
        message: String,
    },
    Frequency {
        port: PortNumber,
        frequency: String,
        message: String,
    },
    ProtectionMode(Result<(), OpsRejection>),
}

impl CommandResult {
    /// Human-readable outcome line, when there is one.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::TargetPower { message, .. }
            | Self::SyncedTargetPower { message, .. }
            | Self::Modulation { message, .. }
            | Self::Frequency { message, .. } => Some(message.clone()),
            Self::ProtectionMode(Ok(())) => None,
            Self::ProtectionMode(Err(rejection)) => Some(rejection.to_string()),
        }
    }
}

/// Why a protection mode change was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpsRejection {
    DeviceUnavailable,
    InvalidDeviceType,
    NoProtectionGroup,
    InvalidOperation,
}

impl fmt::Display for OpsRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::DeviceUnavailable => "device is offline or unavailable",
            Self::InvalidDeviceType => "invalid device type",
            Self::NoProtectionGroup => "no protection group available",
            Self::InvalidOperation => "invalid operation",
        };
        write!(f, "Apply failed: {reason}.")
    }
}

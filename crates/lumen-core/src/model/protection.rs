// ── Protection switching state ──

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumString};

use super::device::ConnectPoint;

/// Path attribute carrying the input port status of a protection path.
pub const INPUT_PORT_STATUS: &str = "inputPortStatus";

/// Path index used for the automatic operation, which pins no path.
pub const ACTIVE_UNKNOWN: i32 = -1;

/// State of one candidate path of a protected connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathState {
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// The connect point this path reports on.
    pub output: ConnectPoint,
}

impl PathState {
    pub fn input_port_status(&self) -> Option<&str> {
        self.attributes.get(INPUT_PORT_STATUS).map(String::as_str)
    }
}

/// Protection endpoint state for one connect-point identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionEndpointState {
    #[serde(default)]
    pub path_states: Vec<PathState>,
}

/// Identifier → endpoint state, in the order the backend reported them.
pub type ProtectionStates = IndexMap<ConnectPoint, ProtectionEndpointState>;

/// Switching operation kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpsOperation {
    /// Let the device choose the path.
    Automatic,
    /// Pin a path, overriding signal-failure switching.
    Force,
    /// Pin a path while still allowing failure-driven switching.
    Manual,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn operation_keywords() {
        assert_eq!(OpsOperation::Automatic.to_string(), "AUTOMATIC");
        assert_eq!("force".parse::<OpsOperation>().unwrap(), OpsOperation::Force);
        assert!("SOMETIMES".parse::<OpsOperation>().is_err());
    }

    #[test]
    fn input_port_status_reads_attribute() {
        let mut path = PathState {
            id: "primary".into(),
            attributes: BTreeMap::new(),
            output: ConnectPoint::new("fs:1", 1),
        };
        assert_eq!(path.input_port_status(), None);
        path.attributes
            .insert(INPUT_PORT_STATUS.into(), "ACTIVE".into());
        assert_eq!(path.input_port_status(), Some("ACTIVE"));
    }
}

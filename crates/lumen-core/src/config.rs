// ── Runtime handler configuration ──
//
// Tuning for the commands that create connections. Built by the config
// crate or the CLI and handed in; core never reads config files.

use serde::{Deserialize, Serialize};

/// Defaults applied to connections created by `SetFrequency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDefaults {
    pub priority: u32,
    /// Permanent connections survive a device restart.
    pub permanent: bool,
    /// Seconds until an impermanent connection is removed (0 = never).
    pub timeout_secs: u32,
}

impl Default for ConnectionDefaults {
    fn default() -> Self {
        Self {
            priority: 100,
            permanent: true,
            timeout_secs: 0,
        }
    }
}

/// Configuration for a [`PortViewHandler`](crate::PortViewHandler).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    #[serde(default)]
    pub connection: ConnectionDefaults,
}

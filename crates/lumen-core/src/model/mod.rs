// ── Domain model ──
//
// Canonical types for devices, ports, optical signals, power ranges and
// protection-switching state. Every type here is constructed per request
// and dropped with the response.

pub mod device;
pub mod fact;
pub mod power;
pub mod protection;
pub mod signal;

// ── Re-exports ──────────────────────────────────────────────────────

pub use device::{
    ConnectPoint, Device, DeviceId, DeviceType, ParseConnectPointError, Port, PortNumber, PortType,
};
pub use fact::{Fact, NOT_APPLICABLE, UNKNOWN, fmt_double};
pub use power::{PortPowerRange, PowerRange, PowerRangeKind};
pub use protection::{
    ACTIVE_UNKNOWN, INPUT_PORT_STATUS, OpsOperation, PathState, ProtectionEndpointState,
    ProtectionStates,
};
pub use signal::{ChannelSpacing, Frequency, GridType, ModulationScheme, OchSignal};

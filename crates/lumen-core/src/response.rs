// ── Outbound messages ──
//
// Pure shaping: typed views and command results in, wire payloads out.
// All sentinel and number formatting for the UI happens here.

use serde::{Deserialize, Serialize};

use crate::assembler::PortView;
use crate::command::CommandResult;
use crate::model::{DeviceType, Frequency, NOT_APPLICABLE, fmt_double};
use crate::protection::Operation;

/// Shown by the UI when a device yields no port rows.
pub const NO_ROWS_MESSAGE: &str = "No items found";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum Response {
    #[serde(rename = "portDataResponse")]
    PortData(PortDataPayload),
    #[serde(rename = "setTargetPowerResponse")]
    SetTargetPower(ValidationPayload<bool>),
    #[serde(rename = "syncTargetPowerResponse")]
    SyncTargetPower(ValidationPayload<bool>),
    #[serde(rename = "setModulationResponse")]
    SetModulation(ValidationPayload<String>),
    #[serde(rename = "setFrequencyResponse")]
    SetFrequency(ValidationPayload<String>),
    #[serde(rename = "showPortItemsResponse")]
    ShowPortItems(ShowItemsPayload),
    #[serde(rename = "setOpsModeResponse")]
    SetOpsMode(OpsModePayload),
}

// ── Port rows ───────────────────────────────────────────────────────

/// One table row, every cell already rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRow {
    pub id: u64,
    pub reverse_port: String,
    #[serde(rename = "type")]
    pub port_type: String,
    pub name: String,
    pub enabled: bool,
    pub min_freq: String,
    pub max_freq: String,
    pub grid: String,
    pub curr_freq: String,
    pub power_range: String,
    pub current_power: String,
    pub current_input_power: String,
    pub service_state: String,
    pub target_power: String,
    pub modulation: String,
    pub has_target_power: bool,
}

fn thz(freq: Option<Frequency>) -> String {
    freq.map_or_else(|| NOT_APPLICABLE.to_owned(), |f| fmt_double(f.as_thz()))
}

fn ghz(freq: Option<Frequency>) -> String {
    freq.map_or_else(|| NOT_APPLICABLE.to_owned(), |f| fmt_double(f.as_ghz()))
}

impl From<&PortView> for PortRow {
    fn from(view: &PortView) -> Self {
        let power = |v: &f64| fmt_double(*v);
        Self {
            id: view.port.number.as_u64(),
            reverse_port: view.port.reverse_port.clone().unwrap_or_default(),
            port_type: view.port.port_type.to_string(),
            name: view.port.name.clone().unwrap_or_default(),
            enabled: view.port.enabled,
            min_freq: thz(view.limits.min),
            max_freq: thz(view.limits.max),
            grid: ghz(view.limits.spacing),
            curr_freq: view.wavelength.render(),
            power_range: view.power_range.render_with(|r| r.range.to_string()),
            current_power: view.current_power.render_with(power),
            current_input_power: view.current_input_power.render_with(power),
            service_state: view.service_state.render(),
            target_power: view.target_power.render_with(power),
            modulation: view.modulation.render(),
            has_target_power: view.has_target_power,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDataPayload {
    pub ports: Vec<PortRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_rows_message: Option<String>,
}

// ── Command payloads ────────────────────────────────────────────────

/// `valid` is a flag for power commands and an echo of the operator's
/// input for modulation and frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationPayload<V> {
    pub id: String,
    pub valid: V,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpsModePayload {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ── Show items ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowItemsPayload {
    pub show_target_power: bool,
    pub show_service_state: bool,
    pub show_flow_icon: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops_operations: Option<Vec<Operation>>,
}

// ── Builders ────────────────────────────────────────────────────────

pub fn port_data(views: &[PortView]) -> PortDataPayload {
    let ports: Vec<PortRow> = views.iter().map(PortRow::from).collect();
    let no_rows_message = ports.is_empty().then(|| NO_ROWS_MESSAGE.to_owned());
    PortDataPayload {
        ports,
        no_rows_message,
    }
}

/// Column visibility for a device type. `operations` is only used for
/// protection switches.
pub fn show_items(device_type: DeviceType, operations: Vec<Operation>) -> ShowItemsPayload {
    let fiber_switch = device_type.is_protection_switch();
    ShowItemsPayload {
        show_target_power: !fiber_switch,
        show_service_state: fiber_switch,
        show_flow_icon: device_type == DeviceType::Roadm,
        ops_operations: fiber_switch.then_some(operations),
    }
}

pub fn command(result: CommandResult) -> Response {
    match result {
        CommandResult::TargetPower {
            port,
            valid,
            message,
        } => Response::SetTargetPower(ValidationPayload {
            id: port.to_string(),
            valid,
            message,
        }),
        CommandResult::SyncedTargetPower { port, message, .. } => {
            Response::SyncTargetPower(ValidationPayload {
                id: port.to_string(),
                valid: true,
                message,
            })
        }
        CommandResult::Modulation {
            port,
            scheme,
            message,
        } => Response::SetModulation(ValidationPayload {
            id: port.to_string(),
            valid: scheme,
            message,
        }),
        CommandResult::Frequency {
            port,
            frequency,
            message,
        } => Response::SetFrequency(ValidationPayload {
            id: port.to_string(),
            valid: frequency,
            message,
        }),
        CommandResult::ProtectionMode(outcome) => Response::SetOpsMode(OpsModePayload {
            valid: outcome.is_ok(),
            message: outcome.err().map(|r| r.to_string()),
        }),
    }
}

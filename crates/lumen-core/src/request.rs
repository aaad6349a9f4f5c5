// ── Inbound messages ──
//
// Wire envelope: `{"event": "<name>", "payload": {...}}`. Payload keys
// are the UI's (`devId`, `id`, `targetPower`, ...).

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::command::Command;
use crate::model::{ConnectPoint, DeviceId, PortNumber};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum Request {
    #[serde(rename = "portDataRequest")]
    PortData(DevicePayload),
    #[serde(rename = "setTargetPowerRequest")]
    SetTargetPower(SetTargetPowerPayload),
    #[serde(rename = "syncTargetPowerRequest")]
    SyncTargetPower(PortPayload),
    #[serde(rename = "setModulationRequest")]
    SetModulation(SetModulationPayload),
    #[serde(rename = "setFrequencyRequest")]
    SetFrequency(SetFrequencyPayload),
    #[serde(rename = "showPortItemsRequest")]
    ShowPortItems(DevicePayload),
    #[serde(rename = "setOpsModeRequest")]
    SetOpsMode(SetOpsModePayload),
}

impl Request {
    /// The mutation this request asks for, if it is one.
    pub fn into_command(self) -> Option<Command> {
        match self {
            Self::PortData(_) | Self::ShowPortItems(_) => None,
            Self::SetTargetPower(p) => Some(Command::SetTargetPower {
                device_id: p.dev_id,
                port: p.id,
                power: p.target_power,
            }),
            Self::SyncTargetPower(p) => Some(Command::SyncTargetPower {
                device_id: p.dev_id,
                port: p.id,
            }),
            Self::SetModulation(p) => Some(Command::SetModulation {
                device_id: p.dev_id,
                port: p.id,
                scheme: p.modulation,
            }),
            Self::SetFrequency(p) => Some(Command::SetFrequency {
                device_id: p.dev_id,
                port: p.id,
                frequency: p.curr_freq,
            }),
            Self::SetOpsMode(p) => Some(Command::SetProtectionMode {
                device_id: p.dev_id,
                operation: p.operation,
                index: p.index,
                group: p.group,
            }),
        }
    }
}

// ── Payloads ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePayload {
    pub dev_id: DeviceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortPayload {
    pub dev_id: DeviceId,
    #[serde(deserialize_with = "port_number")]
    pub id: PortNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTargetPowerPayload {
    pub dev_id: DeviceId,
    #[serde(deserialize_with = "port_number")]
    pub id: PortNumber,
    #[serde(deserialize_with = "number_or_text")]
    pub target_power: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetModulationPayload {
    pub dev_id: DeviceId,
    #[serde(deserialize_with = "port_number")]
    pub id: PortNumber,
    pub modulation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFrequencyPayload {
    pub dev_id: DeviceId,
    #[serde(deserialize_with = "port_number")]
    pub id: PortNumber,
    /// Kept as the operator's text; numbers are accepted and rendered.
    #[serde(deserialize_with = "text_or_number")]
    pub curr_freq: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetOpsModePayload {
    pub dev_id: DeviceId,
    pub operation: String,
    #[serde(deserialize_with = "number_or_text")]
    pub index: i32,
    /// Protection group identifier, `"<device>/<port>"`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "connect_point_text",
        deserialize_with = "connect_point"
    )]
    pub group: Option<ConnectPoint>,
}

/// A scalar the UI may send either as a JSON number or as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar<N> {
    Number(N),
    Text(String),
}

/// Numeric fields arrive as numbers or as numeric strings.
fn number_or_text<'de, D, N>(deserializer: D) -> Result<N, D::Error>
where
    D: Deserializer<'de>,
    N: Deserialize<'de> + FromStr,
{
    match Scalar::<N>::deserialize(deserializer)? {
        Scalar::Number(n) => Ok(n),
        Scalar::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid number '{s}'"))),
    }
}

fn port_number<'de, D>(deserializer: D) -> Result<PortNumber, D::Error>
where
    D: Deserializer<'de>,
{
    number_or_text::<D, u64>(deserializer).map(PortNumber::new)
}

/// Text fields that a UI may also send as a bare number.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::<f64>::deserialize(deserializer)? {
        Scalar::Number(n) => n.to_string(),
        Scalar::Text(s) => s,
    })
}

/// Group identifiers arrive as `"<device>/<port>"` strings.
fn connect_point<'de, D>(deserializer: D) -> Result<Option<ConnectPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| s.parse().map_err(serde::de::Error::custom))
        .transpose()
}

#[allow(clippy::ref_option)]
fn connect_point_text<S>(group: &Option<ConnectPoint>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match group {
        Some(cp) => serializer.collect_str(cp),
        None => serializer.serialize_none(),
    }
}

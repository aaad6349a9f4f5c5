// ── In-memory backend ──
//
// A self-contained implementation of both service traits, loaded from a
// serde `Inventory` document. Used by the CLI when no live controller is
// wired in, and by tests. Every trait call is counted per operation name.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BackendError, ConnectionRequest, DeviceService, OpticalService};
use crate::model::{
    ConnectPoint, Device, DeviceId, DeviceType, Frequency, ModulationScheme, OchSignal,
    OpsOperation, PathState, Port, PortNumber, PortType, PowerRange, ProtectionEndpointState,
    ProtectionStates,
};

// ── Inventory document ──────────────────────────────────────────────

/// Serializable description of a set of devices and their port state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: DeviceId,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub ports: Vec<PortRecord>,
    #[serde(default)]
    pub protection: Vec<ProtectionGroupRecord>,
    #[serde(skip)]
    connections: Vec<ConnectionRequest>,
    #[serde(skip)]
    last_switch: Option<ProtectionSwitch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortRecord {
    pub number: PortNumber,
    #[serde(rename = "type")]
    pub port_type: PortType,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub reverse_port: Option<String>,
    #[serde(default)]
    pub lambda: Option<OchSignal>,
    #[serde(default)]
    pub signals: Vec<OchSignal>,
    #[serde(default)]
    pub input_power_range: Option<PowerRange>,
    #[serde(default)]
    pub target_power_range: Option<PowerRange>,
    #[serde(default)]
    pub current_power: Option<f64>,
    #[serde(default)]
    pub current_input_power: Option<f64>,
    #[serde(default)]
    pub target_power: Option<f64>,
    #[serde(default)]
    pub modulation: Option<ModulationScheme>,
    #[serde(default)]
    pub frequency_thz: Option<f64>,
    /// Every read and write against this port fails.
    #[serde(default)]
    pub faulty: bool,
}

impl PortRecord {
    /// A bare port with no optical state.
    pub fn new(number: u64, port_type: PortType) -> Self {
        Self {
            number: PortNumber::new(number),
            port_type,
            enabled: true,
            name: None,
            reverse_port: None,
            lambda: None,
            signals: Vec::new(),
            input_power_range: None,
            target_power_range: None,
            current_power: None,
            current_input_power: None,
            target_power: None,
            modulation: None,
            frequency_thz: None,
            faulty: false,
        }
    }

    fn to_port(&self) -> Port {
        Port {
            number: self.number,
            port_type: self.port_type,
            enabled: self.enabled,
            name: self.name.clone(),
            reverse_port: self.reverse_port.clone(),
            lambda: self.lambda,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionGroupRecord {
    pub identifier: ConnectPoint,
    #[serde(default)]
    pub paths: Vec<PathState>,
}

impl DeviceRecord {
    pub fn new(id: impl Into<DeviceId>, device_type: DeviceType) -> Self {
        Self {
            id: id.into(),
            device_type,
            name: None,
            available: true,
            ports: Vec::new(),
            protection: Vec::new(),
            connections: Vec::new(),
            last_switch: None,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: PortRecord) -> Self {
        self.ports.push(port);
        self
    }

    #[must_use]
    pub fn with_protection_group(mut self, identifier: ConnectPoint, paths: Vec<PathState>) -> Self {
        self.protection.push(ProtectionGroupRecord { identifier, paths });
        self
    }

    fn to_device(&self) -> Device {
        Device {
            id: self.id.clone(),
            device_type: self.device_type,
            name: self.name.clone(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A protection switch request as received by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionSwitch {
    pub operation: OpsOperation,
    pub identifier: ConnectPoint,
    pub index: i32,
}

// ── InMemoryBackend ─────────────────────────────────────────────────

/// Both backend services over an in-memory inventory.
pub struct InMemoryBackend {
    devices: DashMap<DeviceId, DeviceRecord>,
    calls: DashMap<&'static str, u64>,
}

impl InMemoryBackend {
    pub fn new(inventory: Inventory) -> Self {
        let devices = DashMap::new();
        for record in inventory.devices {
            devices.insert(record.id.clone(), record);
        }
        Self {
            devices,
            calls: DashMap::new(),
        }
    }

    /// Number of times the named trait method was invoked.
    pub fn call_count(&self, operation: &str) -> u64 {
        self.calls.get(operation).map_or(0, |c| *c)
    }

    pub fn set_available(&self, device_id: &DeviceId, available: bool) {
        if let Some(mut record) = self.devices.get_mut(device_id) {
            record.available = available;
        }
    }

    /// Stored target power, read without counting a backend call.
    pub fn stored_target_power(&self, device_id: &DeviceId, port: PortNumber) -> Option<f64> {
        self.devices.get(device_id).and_then(|record| {
            record
                .ports
                .iter()
                .find(|p| p.number == port)
                .and_then(|p| p.target_power)
        })
    }

    pub fn stored_modulation(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Option<ModulationScheme> {
        self.devices.get(device_id).and_then(|record| {
            record
                .ports
                .iter()
                .find(|p| p.number == port)
                .and_then(|p| p.modulation)
        })
    }

    pub fn connections(&self, device_id: &DeviceId) -> Vec<ConnectionRequest> {
        self.devices
            .get(device_id)
            .map(|record| record.connections.clone())
            .unwrap_or_default()
    }

    pub fn last_protection_switch(&self, device_id: &DeviceId) -> Option<ProtectionSwitch> {
        self.devices
            .get(device_id)
            .and_then(|record| record.last_switch.clone())
    }

    fn record(&self, operation: &'static str) {
        *self.calls.entry(operation).or_insert(0) += 1;
    }

    /// Run `f` against a reachable device.
    fn read_device<T>(
        &self,
        operation: &'static str,
        device_id: &DeviceId,
        f: impl FnOnce(&DeviceRecord) -> Result<T, BackendError>,
    ) -> Result<T, BackendError> {
        self.record(operation);
        let record = self
            .devices
            .get(device_id)
            .filter(|r| r.available)
            .ok_or_else(|| BackendError::Unreachable {
                device_id: device_id.clone(),
            })?;
        f(&record)
    }

    fn write_device<T>(
        &self,
        operation: &'static str,
        device_id: &DeviceId,
        f: impl FnOnce(&mut DeviceRecord) -> Result<T, BackendError>,
    ) -> Result<T, BackendError> {
        self.record(operation);
        let mut record = self
            .devices
            .get_mut(device_id)
            .filter(|r| r.available)
            .ok_or_else(|| BackendError::Unreachable {
                device_id: device_id.clone(),
            })?;
        f(&mut record)
    }

    fn read_port<T>(
        &self,
        operation: &'static str,
        device_id: &DeviceId,
        port: PortNumber,
        f: impl FnOnce(&PortRecord) -> T,
    ) -> Result<T, BackendError> {
        self.read_device(operation, device_id, |record| {
            let port = find_port(device_id, &record.ports, port)?;
            Ok(f(port))
        })
    }

    fn write_port<T>(
        &self,
        operation: &'static str,
        device_id: &DeviceId,
        port: PortNumber,
        f: impl FnOnce(&mut PortRecord) -> Result<T, BackendError>,
    ) -> Result<T, BackendError> {
        self.write_device(operation, device_id, |record| {
            let port = find_port_mut(device_id, &mut record.ports, port)?;
            f(port)
        })
    }
}

fn find_port<'a>(
    device_id: &DeviceId,
    ports: &'a [PortRecord],
    number: PortNumber,
) -> Result<&'a PortRecord, BackendError> {
    let port = ports
        .iter()
        .find(|p| p.number == number)
        .ok_or_else(|| no_such_port(device_id, number))?;
    if port.faulty {
        return Err(BackendError::Unreachable {
            device_id: device_id.clone(),
        });
    }
    Ok(port)
}

fn find_port_mut<'a>(
    device_id: &DeviceId,
    ports: &'a mut [PortRecord],
    number: PortNumber,
) -> Result<&'a mut PortRecord, BackendError> {
    let port = ports
        .iter_mut()
        .find(|p| p.number == number)
        .ok_or_else(|| no_such_port(device_id, number))?;
    if port.faulty {
        return Err(BackendError::Unreachable {
            device_id: device_id.clone(),
        });
    }
    Ok(port)
}

fn no_such_port(device_id: &DeviceId, number: PortNumber) -> BackendError {
    BackendError::Rejected {
        message: format!("no port {number} on {device_id}"),
    }
}

// ── DeviceService ───────────────────────────────────────────────────

#[async_trait]
impl DeviceService for InMemoryBackend {
    async fn device(&self, device_id: &DeviceId) -> Result<Option<Device>, BackendError> {
        self.record("device");
        Ok(self.devices.get(device_id).map(|r| r.to_device()))
    }

    async fn is_available(&self, device_id: &DeviceId) -> Result<bool, BackendError> {
        self.record("is_available");
        Ok(self.devices.get(device_id).is_some_and(|r| r.available))
    }

    async fn ports(&self, device_id: &DeviceId) -> Result<Vec<Port>, BackendError> {
        self.record("ports");
        Ok(self
            .devices
            .get(device_id)
            .map(|r| r.ports.iter().map(PortRecord::to_port).collect())
            .unwrap_or_default())
    }

    async fn port(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<Port>, BackendError> {
        self.record("port");
        Ok(self.devices.get(device_id).and_then(|r| {
            r.ports
                .iter()
                .find(|p| p.number == port)
                .map(PortRecord::to_port)
        }))
    }
}

// ── OpticalService ──────────────────────────────────────────────────

#[async_trait]
impl OpticalService for InMemoryBackend {
    async fn query_lambdas(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Vec<OchSignal>, BackendError> {
        self.read_port("query_lambdas", device_id, port, |p| p.signals.clone())
    }

    async fn input_power_range(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<PowerRange>, BackendError> {
        self.read_port("input_power_range", device_id, port, |p| p.input_power_range)
    }

    async fn target_power_range(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<PowerRange>, BackendError> {
        self.read_port("target_power_range", device_id, port, |p| p.target_power_range)
    }

    async fn current_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<f64>, BackendError> {
        self.read_port("current_power", device_id, port, |p| p.current_power)
    }

    async fn current_input_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<f64>, BackendError> {
        self.read_port("current_input_power", device_id, port, |p| p.current_input_power)
    }

    async fn has_target_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<bool, BackendError> {
        self.read_port("has_target_power", device_id, port, |p| {
            p.target_power_range.is_some()
        })
    }

    async fn target_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<f64>, BackendError> {
        self.read_port("target_power", device_id, port, |p| p.target_power)
    }

    async fn set_target_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
        power: f64,
    ) -> Result<(), BackendError> {
        self.write_port("set_target_power", device_id, port, |p| {
            if p.target_power_range.is_none() {
                return Err(BackendError::Unsupported {
                    operation: "set_target_power".into(),
                });
            }
            p.target_power = Some(power);
            Ok(())
        })
    }

    async fn sync_target_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<f64>, BackendError> {
        self.read_port("sync_target_power", device_id, port, |p| p.target_power)
    }

    async fn modulation(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<ModulationScheme>, BackendError> {
        self.read_port("modulation", device_id, port, |p| p.modulation)
    }

    async fn set_modulation(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
        scheme: &str,
    ) -> Result<(), BackendError> {
        self.write_port("set_modulation", device_id, port, |p| {
            let parsed: ModulationScheme =
                scheme.parse().map_err(|_| BackendError::Rejected {
                    message: format!("unsupported modulation scheme '{scheme}'"),
                })?;
            p.modulation = Some(parsed);
            Ok(())
        })
    }

    async fn wavelength(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<Frequency>, BackendError> {
        self.read_port("wavelength", device_id, port, |p| {
            p.frequency_thz.and_then(Frequency::from_thz)
        })
    }

    async fn create_connection(
        &self,
        device_id: &DeviceId,
        request: &ConnectionRequest,
    ) -> Result<(), BackendError> {
        self.write_device("create_connection", device_id, |record| {
            find_port(device_id, &record.ports, request.out_port)?;
            let port = find_port_mut(device_id, &mut record.ports, request.in_port)?;
            port.frequency_thz = Some(request.signal.central_frequency().as_thz());
            record.connections.push(*request);
            debug!(%device_id, signal = %request.signal, "connection created");
            Ok(())
        })
    }

    async fn protection_switch_states(
        &self,
        device_id: &DeviceId,
    ) -> Result<ProtectionStates, BackendError> {
        self.read_device("protection_switch_states", device_id, |record| {
            Ok(record
                .protection
                .iter()
                .map(|group| {
                    (
                        group.identifier.clone(),
                        ProtectionEndpointState {
                            path_states: group.paths.clone(),
                        },
                    )
                })
                .collect())
        })
    }

    async fn config_protection_switch(
        &self,
        device_id: &DeviceId,
        operation: OpsOperation,
        identifier: &ConnectPoint,
        index: i32,
    ) -> Result<(), BackendError> {
        self.write_device("config_protection_switch", device_id, |record| {
            let group = record
                .protection
                .iter()
                .find(|g| &g.identifier == identifier)
                .ok_or_else(|| BackendError::Rejected {
                    message: format!("no protection group {identifier}"),
                })?;
            let in_range = usize::try_from(index).is_ok_and(|i| i < group.paths.len());
            if operation != OpsOperation::Automatic && !in_range {
                return Err(BackendError::Rejected {
                    message: format!("path index {index} out of range for {identifier}"),
                });
            }
            record.last_switch = Some(ProtectionSwitch {
                operation,
                identifier: identifier.clone(),
                index,
            });
            Ok(())
        })
    }
}

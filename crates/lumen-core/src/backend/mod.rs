// ── Backend collaborators ──
//
// The core talks to two external services: the device inventory and the
// optical control plane. Both are injected once, at handler construction,
// as trait objects. Every method is a single backend call; absence of a
// value is `Ok(None)`, a failed call is `Err(BackendError)`.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    ConnectPoint, Device, DeviceId, Frequency, ModulationScheme, OchSignal, OpsOperation, Port,
    PortNumber, PowerRange, ProtectionStates,
};

pub use memory::{
    DeviceRecord, InMemoryBackend, Inventory, PortRecord, ProtectionGroupRecord, ProtectionSwitch,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("device {device_id} is unreachable")]
    Unreachable { device_id: DeviceId },

    #[error("operation '{operation}' is not supported by the device driver")]
    Unsupported { operation: String },

    #[error("request rejected by the device: {message}")]
    Rejected { message: String },
}

// ── Connection request ──────────────────────────────────────────────

/// Parameters of a cross-connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub priority: u32,
    pub permanent: bool,
    pub timeout_secs: u32,
    pub in_port: PortNumber,
    pub out_port: PortNumber,
    pub signal: OchSignal,
}

// ── Service traits ──────────────────────────────────────────────────

/// Device inventory and port enumeration.
#[async_trait]
pub trait DeviceService: Send + Sync {
    async fn device(&self, device_id: &DeviceId) -> Result<Option<Device>, BackendError>;

    async fn is_available(&self, device_id: &DeviceId) -> Result<bool, BackendError>;

    /// Ports in the backend's enumeration order.
    async fn ports(&self, device_id: &DeviceId) -> Result<Vec<Port>, BackendError>;

    async fn port(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<Port>, BackendError>;
}

/// Optical control plane: signals, power, modulation, connections and
/// protection switching.
#[async_trait]
pub trait OpticalService: Send + Sync {
    /// Signals usable on the port. Order is not significant.
    async fn query_lambdas(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Vec<OchSignal>, BackendError>;

    async fn input_power_range(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<PowerRange>, BackendError>;

    async fn target_power_range(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<PowerRange>, BackendError>;

    async fn current_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<f64>, BackendError>;

    async fn current_input_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<f64>, BackendError>;

    async fn has_target_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<bool, BackendError>;

    async fn target_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<f64>, BackendError>;

    async fn set_target_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
        power: f64,
    ) -> Result<(), BackendError>;

    /// Re-read the target power from the device and return it.
    async fn sync_target_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<f64>, BackendError>;

    async fn modulation(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<ModulationScheme>, BackendError>;

    /// The scheme is passed through unvalidated; the driver decides.
    async fn set_modulation(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
        scheme: &str,
    ) -> Result<(), BackendError>;

    async fn wavelength(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
    ) -> Result<Option<Frequency>, BackendError>;

    async fn create_connection(
        &self,
        device_id: &DeviceId,
        request: &ConnectionRequest,
    ) -> Result<(), BackendError>;

    async fn protection_switch_states(
        &self,
        device_id: &DeviceId,
    ) -> Result<ProtectionStates, BackendError>;

    async fn config_protection_switch(
        &self,
        device_id: &DeviceId,
        operation: OpsOperation,
        identifier: &ConnectPoint,
        index: i32,
    ) -> Result<(), BackendError>;
}

// ── Backends ────────────────────────────────────────────────────────

/// The pair of collaborators, resolved once at startup. Cheap to clone.
#[derive(Clone)]
pub struct Backends {
    pub devices: Arc<dyn DeviceService>,
    pub optical: Arc<dyn OpticalService>,
}

impl Backends {
    pub fn new(devices: Arc<dyn DeviceService>, optical: Arc<dyn OpticalService>) -> Self {
        Self { devices, optical }
    }

    /// Use one object for both services.
    pub fn shared<B>(backend: Arc<B>) -> Self
    where
        B: DeviceService + OpticalService + 'static,
    {
        Self {
            devices: backend.clone(),
            optical: backend,
        }
    }

    /// Availability, with a failed query treated as unavailable.
    pub(crate) async fn is_available(&self, device_id: &DeviceId) -> bool {
        match self.devices.is_available(device_id).await {
            Ok(available) => available,
            Err(e) => {
                tracing::debug!(%device_id, error = %e, "availability query failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends").finish_non_exhaustive()
    }
}

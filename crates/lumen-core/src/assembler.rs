// ── Port row assembly ──
//
// One `PortView` per port of an available device, in enumeration order.
// Facts for a port are resolved concurrently, as are the ports themselves.

use futures_util::future::join_all;
use tracing::debug;

use crate::backend::Backends;
use crate::model::{
    DeviceId, DeviceType, Fact, ModulationScheme, Port, PortPowerRange,
};
use crate::resolver::{FrequencyLimits, PortFactResolver, Wavelength};

/// Every resolved fact about one port.
#[derive(Debug, Clone, PartialEq)]
pub struct PortView {
    pub port: Port,
    pub limits: FrequencyLimits,
    pub wavelength: Wavelength,
    pub power_range: Fact<PortPowerRange>,
    pub current_power: Fact<f64>,
    pub current_input_power: Fact<f64>,
    pub service_state: Fact<String>,
    pub target_power: Fact<f64>,
    pub modulation: Fact<ModulationScheme>,
    pub has_target_power: bool,
}

pub struct PortRowAssembler<'a> {
    backends: &'a Backends,
}

impl<'a> PortRowAssembler<'a> {
    pub fn new(backends: &'a Backends) -> Self {
        Self { backends }
    }

    /// Views for every port, or none when the device is unavailable.
    /// Ports are not enumerated for an unavailable device.
    pub async fn assemble(&self, device_id: &DeviceId) -> Vec<PortView> {
        if !self.backends.is_available(device_id).await {
            debug!(%device_id, "device unavailable, no port rows");
            return Vec::new();
        }

        let ports = match self.backends.devices.ports(device_id).await {
            Ok(ports) => ports,
            Err(e) => {
                debug!(%device_id, error = %e, "port enumeration failed");
                return Vec::new();
            }
        };
        let device_type = match self.backends.devices.device(device_id).await {
            Ok(device) => device.map(|d| d.device_type),
            Err(e) => {
                debug!(%device_id, error = %e, "device lookup failed");
                None
            }
        };

        join_all(
            ports
                .into_iter()
                .map(|port| self.assemble_port(device_id, device_type, port)),
        )
        .await
    }

    async fn assemble_port(
        &self,
        device_id: &DeviceId,
        device_type: Option<DeviceType>,
        port: Port,
    ) -> PortView {
        let resolver = PortFactResolver::new(self.backends, device_id, port.number);
        let (
            limits,
            wavelength,
            power_range,
            current_power,
            current_input_power,
            service_state,
            target_power,
            modulation,
            has_target_power,
        ) = tokio::join!(
            resolver.frequency_limits(),
            resolver.wavelength(),
            resolver.power_range(),
            resolver.current_power(),
            resolver.current_input_power(),
            resolver.service_state(device_type),
            resolver.target_power(),
            resolver.modulation(port.port_type),
            resolver.has_target_power(),
        );

        PortView {
            port,
            limits,
            wavelength,
            power_range,
            current_power,
            current_input_power,
            service_state,
            target_power,
            modulation,
            has_target_power,
        }
    }
}

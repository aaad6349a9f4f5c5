// ── Command validation and execution ──

use tracing::{debug, info, warn};

use super::{Command, CommandResult, OpsRejection};
use crate::backend::{BackendError, Backends, ConnectionRequest};
use crate::config::HandlerConfig;
use crate::error::CoreError;
use crate::model::{
    ConnectPoint, DeviceId, DeviceType, Fact, Frequency, OchSignal, OpsOperation, PortNumber,
    fmt_double,
};
use crate::resolver::PortFactResolver;

/// Checks each command against device state, then issues at most one
/// backend mutation. Nothing is retried.
pub(crate) struct CommandValidator<'a> {
    backends: &'a Backends,
    config: &'a HandlerConfig,
}

impl<'a> CommandValidator<'a> {
    pub(crate) fn new(backends: &'a Backends, config: &'a HandlerConfig) -> Self {
        Self { backends, config }
    }

    pub(crate) async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        match cmd {
            Command::SetTargetPower {
                device_id,
                port,
                power,
            } => self.set_target_power(&device_id, port, power).await,

            Command::SyncTargetPower { device_id, port } => {
                let synced = match self.backends.optical.sync_target_power(&device_id, port).await {
                    Ok(power) => power,
                    Err(e) => {
                        debug!(%device_id, %port, error = %e, "target power sync failed");
                        None
                    }
                };
                let power = Fact::from_option(synced);
                let message = format!(
                    "Synced target power is {}.",
                    power.render_with(|v| fmt_double(*v))
                );
                Ok(CommandResult::SyncedTargetPower {
                    port,
                    power,
                    message,
                })
            }

            Command::SetModulation {
                device_id,
                port,
                scheme,
            } => {
                let outcome = self
                    .backends
                    .optical
                    .set_modulation(&device_id, port, &scheme)
                    .await;
                log_mutation("set_modulation", &device_id, outcome);
                let message = format!("Target modulation is {scheme}.");
                Ok(CommandResult::Modulation {
                    port,
                    scheme,
                    message,
                })
            }

            Command::SetFrequency {
                device_id,
                port,
                frequency,
            } => self.set_frequency(&device_id, port, frequency).await,

            Command::SetProtectionMode {
                device_id,
                operation,
                index,
                group,
            } => Ok(CommandResult::ProtectionMode(
                self.set_protection_mode(&device_id, &operation, index, group)
                    .await,
            )),
        }
    }

    async fn set_target_power(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
        power: f64,
    ) -> Result<CommandResult, CoreError> {
        let resolver = PortFactResolver::new(self.backends, device_id, port);
        let Some(range) = resolver.target_power_range().await else {
            warn!(%device_id, %port, "unable to determine target power range");
            return Err(CoreError::RangeUnavailable {
                device_id: device_id.clone(),
                port,
            });
        };

        let valid = range.contains(power);
        if valid {
            let outcome = self
                .backends
                .optical
                .set_target_power(device_id, port, power)
                .await;
            log_mutation("set_target_power", device_id, outcome);
        } else {
            debug!(%device_id, %port, power, %range, "target power out of range");
        }

        Ok(CommandResult::TargetPower {
            port,
            valid,
            message: format!("Target power range is {range}."),
        })
    }

    async fn set_frequency(
        &self,
        device_id: &DeviceId,
        port: PortNumber,
        text: String,
    ) -> Result<CommandResult, CoreError> {
        let frequency = parse_thz(&text)?;

        let template = match self.backends.devices.port(device_id, port).await {
            Ok(found) => found.and_then(|p| p.lambda),
            Err(e) => {
                debug!(%device_id, %port, error = %e, "port lookup failed, using default grid");
                None
            }
        }
        .unwrap_or_else(OchSignal::dwdm_50ghz);
        let signal = OchSignal::anchored_at(&template, frequency);

        let defaults = self.config.connection;
        let request = ConnectionRequest {
            priority: defaults.priority,
            permanent: defaults.permanent,
            timeout_secs: defaults.timeout_secs,
            in_port: port,
            out_port: port,
            signal,
        };
        let outcome = self
            .backends
            .optical
            .create_connection(device_id, &request)
            .await;
        log_mutation("create_connection", device_id, outcome);

        let message = format!("Target frequency is {text}.");
        Ok(CommandResult::Frequency {
            port,
            frequency: text,
            message,
        })
    }

    async fn set_protection_mode(
        &self,
        device_id: &DeviceId,
        operation: &str,
        index: i32,
        group: Option<ConnectPoint>,
    ) -> Result<(), OpsRejection> {
        if !self.backends.is_available(device_id).await {
            return Err(OpsRejection::DeviceUnavailable);
        }

        let device_type = match self.backends.devices.device(device_id).await {
            Ok(device) => device.map(|d| d.device_type),
            Err(e) => {
                debug!(%device_id, error = %e, "device lookup failed");
                None
            }
        };
        if device_type != Some(DeviceType::FiberSwitch) {
            return Err(OpsRejection::InvalidDeviceType);
        }

        let operation: OpsOperation = operation
            .parse()
            .map_err(|_| OpsRejection::InvalidOperation)?;

        let states = match self.backends.optical.protection_switch_states(device_id).await {
            Ok(states) => states,
            Err(e) => {
                debug!(%device_id, error = %e, "protection state query failed");
                return Err(OpsRejection::NoProtectionGroup);
            }
        };
        let identifier = match group {
            Some(group) => states.contains_key(&group).then_some(group),
            None => states.keys().next().cloned(),
        }
        .ok_or(OpsRejection::NoProtectionGroup)?;

        let outcome = self
            .backends
            .optical
            .config_protection_switch(device_id, operation, &identifier, index)
            .await;
        log_mutation("config_protection_switch", device_id, outcome);
        Ok(())
    }
}

/// Parse operator frequency text given in THz.
fn parse_thz(text: &str) -> Result<Frequency, CoreError> {
    let invalid = |reason: &str| CoreError::InvalidFrequency {
        input: text.to_owned(),
        reason: reason.to_owned(),
    };
    let thz: f64 = text
        .trim()
        .parse()
        .map_err(|_| invalid("not a decimal number"))?;
    if !thz.is_finite() || thz <= 0.0 {
        return Err(invalid("must be a positive THz value"));
    }
    Frequency::from_thz(thz).ok_or_else(|| invalid("out of range"))
}

/// Mutation failures are not reported to the operator; the response
/// reflects acceptance of the request only.
fn log_mutation(operation: &str, device_id: &DeviceId, outcome: Result<(), BackendError>) {
    match outcome {
        Ok(()) => info!(%device_id, operation, "device updated"),
        Err(e) => warn!(%device_id, operation, error = %e, "device update failed"),
    }
}

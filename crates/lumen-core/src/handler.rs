// ── Port view message handler ──
//
// Facade the transport layer talks to. Routes each inbound request to
// row assembly, item visibility, or command validation, and shapes the
// outcome into a response. Holds no per-request state.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::assembler::{PortRowAssembler, PortView};
use crate::backend::Backends;
use crate::command::{Command, CommandResult, CommandValidator};
use crate::config::HandlerConfig;
use crate::error::CoreError;
use crate::model::DeviceId;
use crate::protection::ops_operations;
use crate::request::Request;
use crate::response::{self, PortDataPayload, Response, ShowItemsPayload};

/// Cheaply cloneable; concurrent requests share the collaborators.
#[derive(Debug, Clone)]
pub struct PortViewHandler {
    inner: Arc<HandlerInner>,
}

#[derive(Debug)]
struct HandlerInner {
    backends: Backends,
    config: HandlerConfig,
}

impl PortViewHandler {
    pub fn new(backends: Backends, config: HandlerConfig) -> Self {
        Self {
            inner: Arc::new(HandlerInner { backends, config }),
        }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.inner.config
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Resolved views of every port, empty for an unavailable device.
    pub async fn port_views(&self, device_id: &DeviceId) -> Vec<PortView> {
        PortRowAssembler::new(&self.inner.backends)
            .assemble(device_id)
            .await
    }

    pub async fn port_data(&self, device_id: &DeviceId) -> PortDataPayload {
        response::port_data(&self.port_views(device_id).await)
    }

    /// Which columns and protection operations the UI should show.
    pub async fn show_items(&self, device_id: &DeviceId) -> Result<ShowItemsPayload, CoreError> {
        let backends = &self.inner.backends;
        let device = backends
            .devices
            .device(device_id)
            .await?
            .ok_or_else(|| CoreError::DeviceNotFound {
                device_id: device_id.clone(),
            })?;

        let operations = if device.device_type.is_protection_switch() {
            match backends.optical.protection_switch_states(device_id).await {
                Ok(states) => ops_operations(&states),
                Err(e) => {
                    debug!(%device_id, error = %e, "protection state query failed");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Ok(response::show_items(device.device_type, operations))
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Validate and run one command.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        debug!(device_id = %cmd.device_id(), ?cmd, "executing command");
        CommandValidator::new(&self.inner.backends, &self.inner.config)
            .execute(cmd)
            .await
    }

    // ── Message routing ──────────────────────────────────────────

    /// Handle a decoded request. `Ok(None)` means no response is sent.
    pub async fn handle(&self, request: Request) -> Result<Option<Response>, CoreError> {
        let response = match request {
            Request::PortData(p) => Response::PortData(self.port_data(&p.dev_id).await),
            Request::ShowPortItems(p) => Response::ShowPortItems(self.show_items(&p.dev_id).await?),
            other => {
                let Some(cmd) = other.into_command() else {
                    return Err(CoreError::Internal("request carries no command".into()));
                };
                match self.execute(cmd).await {
                    Ok(result) => response::command(result),
                    Err(e) if e.is_soft() => {
                        warn!(error = %e, "request dropped without response");
                        return Ok(None);
                    }
                    Err(e) => return Err(e),
                }
            }
        };
        Ok(Some(response))
    }

    /// Decode a JSON envelope, handle it, encode the response.
    pub async fn handle_json(&self, message: &str) -> Result<Option<String>, CoreError> {
        let request: Request = serde_json::from_str(message)?;
        match self.handle(request).await? {
            Some(response) => Ok(Some(serde_json::to_string(&response)?)),
            None => Ok(None),
        }
    }
}

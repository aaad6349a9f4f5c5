// ── Core error types ──
//
// Hard failures only. Missing data never becomes an error: the resolver
// turns it into `Fact::Unknown` / `Fact::NotApplicable`, and validation
// outcomes travel as `valid=false` inside a normal response.

use thiserror::Error;

use crate::backend::BackendError;
use crate::model::{DeviceId, PortNumber};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {device_id}")]
    DeviceNotFound { device_id: DeviceId },

    #[error("Target power range unavailable for port {port} on {device_id}")]
    RangeUnavailable {
        device_id: DeviceId,
        port: PortNumber,
    },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid frequency '{input}': {reason}")]
    InvalidFrequency { input: String, reason: String },

    #[error("Malformed request: {0}")]
    Codec(#[from] serde_json::Error),

    // ── Backend errors (only where a lookup cannot degrade) ──────────
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Soft failures are logged and answered with silence rather than
    /// surfaced to the caller as a fatal request error.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::RangeUnavailable { .. })
    }
}

//! Port-view aggregation and command validation for optical network devices.
//!
//! This crate sits between an operator UI and the device backends:
//!
//! - **[`PortViewHandler`]** — Facade routing typed [`Request`]s to the
//!   pieces below and shaping the outcome into a [`Response`]. Cheaply
//!   cloneable; serves concurrent requests without shared mutable state.
//!
//! - **Resolution** ([`resolver`], [`assembler`]) — Per-port backend reads
//!   normalized into [`Fact`] values (`Known` / `Unknown` / `NotApplicable`)
//!   and assembled into one row per port, in enumeration order.
//!
//! - **[`protection`]** — Flattens protection-switch state into the ordered
//!   AUTOMATIC / FORCE / MANUAL operation list.
//!
//! - **[`Command`]** — Operator mutations (target power, modulation,
//!   frequency, protection mode), validated before any backend write.
//!
//! - **Backends** ([`backend`]) — The [`DeviceService`] and
//!   [`OpticalService`] traits the core consumes, plus an
//!   [`InMemoryBackend`] loaded from an [`Inventory`] document.

pub mod assembler;
pub mod backend;
pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod protection;
pub mod request;
pub mod resolver;
pub mod response;

// ── Primary re-exports ──────────────────────────────────────────────
pub use assembler::PortView;
pub use backend::{
    BackendError, Backends, ConnectionRequest, DeviceService, InMemoryBackend, Inventory,
    OpticalService,
};
pub use command::{Command, CommandResult, OpsRejection};
pub use config::{ConnectionDefaults, HandlerConfig};
pub use error::CoreError;
pub use handler::PortViewHandler;
pub use protection::{Operation, ops_operations};
pub use request::Request;
pub use resolver::{FrequencyLimits, Wavelength};
pub use response::{PortRow, Response};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ChannelSpacing, ConnectPoint, Device, DeviceId, DeviceType, Fact, Frequency, GridType,
    ModulationScheme, OchSignal, OpsOperation, PathState, Port, PortNumber, PortType, PowerRange,
    ProtectionEndpointState, ProtectionStates,
};

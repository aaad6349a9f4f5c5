//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use lumen_config::ConfigError;
use lumen_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const BACKEND: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(lumen::not_found),
        help("Check the device identifiers in your inventory file.")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── Backend ──────────────────────────────────────────────────────

    #[error("Backend error: {message}")]
    #[diagnostic(code(lumen::backend))]
    Backend { message: String },

    #[error("No response: {reason}")]
    #[diagnostic(
        code(lumen::no_response),
        help("The port reports no target power range; it cannot be set.")
    )]
    NoResponse { reason: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(lumen::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(lumen::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: lumen config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No inventory configured")]
    #[diagnostic(
        code(lumen::no_inventory),
        help(
            "Pass --inventory <FILE>, set LUMEN_INVENTORY, or create a profile with: lumen config init\n\
             Config expected at: {path}"
        )
    )]
    NoInventory { path: String },

    #[error("Failed to load inventory {path}")]
    #[diagnostic(
        code(lumen::inventory),
        help("{reason}")
    )]
    Inventory { path: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(lumen::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(lumen::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(lumen::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to write config: {0}")]
    #[diagnostic(code(lumen::serialization))]
    Serialization(#[from] toml::ser::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(lumen::internal))]
    Internal(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Backend { .. } => exit_code::BACKEND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DeviceNotFound { device_id } => CliError::NotFound {
                resource_type: "device".into(),
                identifier: device_id.to_string(),
            },

            CoreError::RangeUnavailable { device_id, port } => CliError::NoResponse {
                reason: format!("target power range unavailable for port {port} on {device_id}"),
            },

            CoreError::InvalidFrequency { input, reason } => CliError::Validation {
                field: format!("frequency '{input}'"),
                reason,
            },

            CoreError::Codec(e) => CliError::Json(e),

            CoreError::Backend(e) => CliError::Backend {
                message: e.to_string(),
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Inventory { path, reason } => CliError::Inventory {
                path: path.display().to_string(),
                reason,
            },
            ConfigError::Serialization(e) => CliError::Serialization(e),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

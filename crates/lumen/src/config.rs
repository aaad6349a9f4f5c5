//! CLI-side configuration: resolves the active profile plus global flags
//! into the handler and its backend.
//!
//! Delegates file loading and validation to `lumen_config`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;
use lumen_config::{Config, Profile};
use lumen_core::{Backends, HandlerConfig, InMemoryBackend, PortViewHandler};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use lumen_config::{config_path, load_config_or_default, save_config};

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The active profile. An explicitly requested profile must exist.
fn active_profile<'a>(
    global: &GlobalOpts,
    config: &'a Config,
) -> Result<Option<&'a Profile>, CliError> {
    let name = active_profile_name(global, config);
    match config.profiles.get(&name) {
        Some(profile) => Ok(Some(profile)),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            Err(CliError::ProfileNotFound {
                name,
                available: available.join(", "),
            })
        }
        None => Ok(None),
    }
}

/// Inventory path: flag > env > profile.
fn inventory_path(global: &GlobalOpts, profile: Option<&Profile>) -> Result<PathBuf, CliError> {
    global
        .inventory
        .clone()
        .or_else(|| profile.and_then(|p| p.inventory.clone()))
        .ok_or_else(|| CliError::NoInventory {
            path: config_path().display().to_string(),
        })
}

// ── Output defaults ──────────────────────────────────────────────────

/// Fill `--output` / `--color` from the config `[defaults]` table when
/// neither the flag nor its env var was given.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    if global.output.is_none() {
        global.output = Some(parse_default("defaults.output", &cfg.defaults.output)?);
    }
    if global.color.is_none() {
        global.color = Some(parse_default("defaults.color", &cfg.defaults.color)?);
    }
    Ok(())
}

fn parse_default<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

// ── Handler construction ─────────────────────────────────────────────

/// Build the port view handler from the config file, profile, and CLI
/// overrides. This is the single boundary where CLI config types cross
/// into core types.
pub fn build_handler(global: &GlobalOpts, cfg: &Config) -> Result<PortViewHandler, CliError> {
    let profile = active_profile(global, cfg)?;

    let handler_config = match profile {
        Some(profile) => lumen_config::profile_to_handler_config(profile)?,
        None => HandlerConfig::default(),
    };

    let path = inventory_path(global, profile)?;
    let inventory = lumen_config::load_inventory(&path)?;
    tracing::debug!(
        path = %path.display(),
        devices = inventory.devices.len(),
        "inventory loaded"
    );

    let backend = Arc::new(InMemoryBackend::new(inventory));
    Ok(PortViewHandler::new(Backends::shared(backend), handler_config))
}

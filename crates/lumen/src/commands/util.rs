//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};

use lumen_core::{DeviceId, PortNumber};

use crate::cli::PortArgs;
use crate::error::CliError;

/// Split port arguments into the core identifier types.
pub fn port(args: PortArgs) -> (DeviceId, PortNumber) {
    (DeviceId::new(args.device), PortNumber::from(args.port))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` becomes mandatory.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

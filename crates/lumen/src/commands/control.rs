//! Mutating command handlers: power, modulation, frequency, protection.
//!
//! Each builds a core `Command`, runs it through the handler and prints
//! the outcome. Validation rejections are outcomes, not process errors.

use std::str::FromStr;

use lumen_core::{Command, CommandResult, ConnectPoint, DeviceId, OpsOperation, PortViewHandler};

use crate::cli::{
    FrequencyArgs, FrequencyCommand, GlobalOpts, ModulationArgs, ModulationCommand, OutputFormat,
    PowerArgs, PowerCommand, ProtectionArgs, ProtectionCommand,
};
use crate::error::CliError;
use crate::output;

use super::{items, util};

// ── Outcome rendering ───────────────────────────────────────────────

fn accepted(result: &CommandResult) -> bool {
    match result {
        CommandResult::TargetPower { valid, .. } => *valid,
        CommandResult::ProtectionMode(outcome) => outcome.is_ok(),
        CommandResult::SyncedTargetPower { .. }
        | CommandResult::Modulation { .. }
        | CommandResult::Frequency { .. } => true,
    }
}

fn print_outcome(result: CommandResult, global: &GlobalOpts) {
    let out = match global.output_format() {
        OutputFormat::Table | OutputFormat::Plain => {
            let message = result
                .message()
                .unwrap_or_else(|| "Protection mode applied.".into());
            output::outcome_line(
                accepted(&result),
                &message,
                output::should_color(global.color_mode()),
            )
        }
        format => {
            let response = lumen_core::response::command(result);
            output::render_structured(format, &response).unwrap_or_default()
        }
    };
    output::print_output(&out, global.quiet);
}

async fn run(
    handler: &PortViewHandler,
    cmd: Command,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = handler.execute(cmd).await?;
    print_outcome(result, global);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn power(
    handler: &PortViewHandler,
    args: PowerArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let cmd = match args.command {
        PowerCommand::Set { port, dbm } => {
            let (device_id, port) = util::port(port);
            Command::SetTargetPower {
                device_id,
                port,
                power: dbm,
            }
        }
        PowerCommand::Sync { port } => {
            let (device_id, port) = util::port(port);
            Command::SyncTargetPower { device_id, port }
        }
    };
    run(handler, cmd, global).await
}

pub async fn modulation(
    handler: &PortViewHandler,
    args: ModulationArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ModulationCommand::Set { port, scheme } = args.command;
    let (device_id, port) = util::port(port);
    let cmd = Command::SetModulation {
        device_id,
        port,
        scheme,
    };
    run(handler, cmd, global).await
}

pub async fn frequency(
    handler: &PortViewHandler,
    args: FrequencyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let FrequencyCommand::Set { port, thz } = args.command;
    let (device_id, port) = util::port(port);
    let cmd = Command::SetFrequency {
        device_id,
        port,
        frequency: thz,
    };
    run(handler, cmd, global).await
}

pub async fn protection(
    handler: &PortViewHandler,
    args: ProtectionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProtectionCommand::List(args) => items::list_operations(handler, args.device, global).await,

        ProtectionCommand::Set {
            device,
            operation,
            index,
            group,
        } => {
            let group = group
                .map(|raw| {
                    ConnectPoint::from_str(&raw).map_err(|e| CliError::Validation {
                        field: "group".into(),
                        reason: e.to_string(),
                    })
                })
                .transpose()?;

            // FORCE pins a path even when its signal fails.
            if OpsOperation::from_str(&operation).ok() == Some(OpsOperation::Force)
                && !util::confirm(
                    &format!("Force protection path {index} on {device}?"),
                    "force a protection path",
                    global.yes,
                )?
            {
                return Ok(());
            }

            let cmd = Command::SetProtectionMode {
                device_id: DeviceId::new(device),
                operation,
                index,
                group,
            };
            run(handler, cmd, global).await
        }
    }
}

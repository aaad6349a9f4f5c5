//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod config_cmd;
pub mod control;
pub mod items;
pub mod ports;
pub mod serve;
pub mod util;

use lumen_core::PortViewHandler;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an inventory-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    handler: &PortViewHandler,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Ports(args) => ports::handle(handler, args, global).await,
        Command::Items(args) => items::handle(handler, args, global).await,
        Command::Power(args) => control::power(handler, args, global).await,
        Command::Modulation(args) => control::modulation(handler, args, global).await,
        Command::Frequency(args) => control::frequency(handler, args, global).await,
        Command::Protection(args) => control::protection(handler, args, global).await,
        Command::Serve => serve::handle(handler).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are not dispatched".into(),
        )),
    }
}

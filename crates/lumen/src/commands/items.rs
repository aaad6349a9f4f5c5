//! Port item visibility and protection operation listing.

use std::fmt::Write;

use tabled::Tabled;

use lumen_core::response::ShowItemsPayload;
use lumen_core::{DeviceId, Operation, PortViewHandler};

use crate::cli::{DeviceArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
pub(crate) struct OperationRow {
    #[tabled(rename = "Index")]
    index: i32,
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Group")]
    group: String,
}

impl From<&Operation> for OperationRow {
    fn from(op: &Operation) -> Self {
        Self {
            index: op.index,
            operation: op.operation.to_string(),
            name: op.name.clone(),
            group: op.group.to_string(),
        }
    }
}

fn detail(items: &ShowItemsPayload) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Target power:  {}", items.show_target_power);
    let _ = writeln!(out, "Service state: {}", items.show_service_state);
    let _ = write!(out, "Flow icon:     {}", items.show_flow_icon);
    if let Some(ref ops) = items.ops_operations {
        let _ = write!(out, "\nOperations:    {}", ops.len());
    }
    out
}

pub async fn handle(
    handler: &PortViewHandler,
    args: DeviceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let items = handler.show_items(&DeviceId::new(args.device)).await?;
    let out = output::render_single(global.output_format(), &items, detail, |i| {
        i.ops_operations
            .iter()
            .flatten()
            .map(|op| op.name.clone())
            .collect::<Vec<_>>()
            .join("\n")
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Render the switching operations of a device.
pub async fn list_operations(
    handler: &PortViewHandler,
    device: String,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let items = handler.show_items(&DeviceId::new(device.clone())).await?;
    let ops = items.ops_operations.ok_or_else(|| CliError::Validation {
        field: "device".into(),
        reason: format!("'{device}' is not a protection switch"),
    })?;
    let out = output::render_list(global.output_format(), &ops, |op| OperationRow::from(op), |op| {
        op.name.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

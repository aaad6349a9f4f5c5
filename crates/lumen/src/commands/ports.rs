//! Port table handler.

use tabled::Tabled;

use lumen_core::{DeviceId, PortRow, PortViewHandler};

use crate::cli::{DeviceArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PortTableRow {
    #[tabled(rename = "Port")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    port_type: String,
    #[tabled(rename = "On")]
    enabled: String,
    #[tabled(rename = "Min THz")]
    min_freq: String,
    #[tabled(rename = "Max THz")]
    max_freq: String,
    #[tabled(rename = "Grid GHz")]
    grid: String,
    #[tabled(rename = "Freq THz")]
    curr_freq: String,
    #[tabled(rename = "Range dBm")]
    power_range: String,
    #[tabled(rename = "Power")]
    current_power: String,
    #[tabled(rename = "Input")]
    current_input_power: String,
    #[tabled(rename = "Target")]
    target_power: String,
    #[tabled(rename = "Modulation")]
    modulation: String,
    #[tabled(rename = "Service")]
    service_state: String,
}

impl From<&PortRow> for PortTableRow {
    fn from(r: &PortRow) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            port_type: r.port_type.clone(),
            enabled: if r.enabled { "yes" } else { "no" }.into(),
            min_freq: r.min_freq.clone(),
            max_freq: r.max_freq.clone(),
            grid: r.grid.clone(),
            curr_freq: r.curr_freq.clone(),
            power_range: r.power_range.clone(),
            current_power: r.current_power.clone(),
            current_input_power: r.current_input_power.clone(),
            target_power: r.target_power.clone(),
            modulation: r.modulation.clone(),
            service_state: r.service_state.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    handler: &PortViewHandler,
    args: DeviceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device_id = DeviceId::new(args.device);
    let data = handler.port_data(&device_id).await;

    if let (Some(message), OutputFormat::Table) = (&data.no_rows_message, global.output_format()) {
        output::print_output(message, global.quiet);
        return Ok(());
    }

    let out = output::render_list(
        global.output_format(),
        &data.ports,
        |r| PortTableRow::from(r),
        |r| r.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

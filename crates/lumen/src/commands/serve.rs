//! Line-delimited JSON envelope loop over stdin/stdout.
//!
//! One request envelope per input line. Each answered request produces
//! exactly one response line; requests that warrant no answer produce none.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use lumen_core::PortViewHandler;

use crate::error::CliError;

pub async fn handle(handler: &PortViewHandler) -> Result<(), CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    info!("serving requests on stdin");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match handler.handle_json(line).await {
            Ok(Some(response)) => {
                stdout.write_all(response.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "request failed"),
        }
    }

    info!("stdin closed, stopping");
    Ok(())
}

//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the command handlers.
//! - Build the `SplunkClient` for commands that talk to a server.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `main()`).
//!
//! Invariants:
//! - Commands that need a connection receive a client built from a validated `Config`.

use anyhow::{Context, Result};
use splunk_dispatch_client::{CancellationToken, MetricsCollector, SplunkClient};
use splunk_dispatch_config::Config;

use crate::args::{Cli, Commands};
use crate::commands;

pub(crate) async fn run_command(
    cli: Cli,
    config: Option<Config>,
    cancel: &CancellationToken,
) -> Result<()> {
    match cli.command {
        Commands::Jobs { command } => {
            let config =
                config.context("Connection configuration is required for jobs commands")?;
            let mut builder = SplunkClient::builder().from_config(&config);
            if cli.metrics_bind.is_some() {
                builder = builder.metrics(MetricsCollector::new());
            }
            let client = builder.build().context("Failed to build Splunk client")?;
            commands::jobs::run(&client, command, cli.output, cancel).await?;
        }
        Commands::Events { command } => {
            commands::events::run(command)?;
        }
    }

    Ok(())
}

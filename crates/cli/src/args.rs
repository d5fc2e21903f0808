//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Bind global connection flags to their `SPLUNK_*` environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not validate configuration (see `splunk_dispatch_config::ConfigLoader`).

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands;

#[derive(Parser)]
#[command(name = "splunk-dispatch")]
#[command(about = "Dispatch Splunk search jobs and encode streamed events", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  splunk-dispatch jobs create 'search index=_internal | head 10' --wait-for done\n  splunk-dispatch jobs list --count 10 --sort-dir asc\n  splunk-dispatch jobs wait 1700000000.42 --state done --max-wait 300\n  printf 'a\\nb\\n' | splunk-dispatch events encode --sourcetype app:log\n"
)]
pub struct Cli {
    /// Base URL of the Splunk management port (e.g., https://localhost:8089)
    #[arg(short, long, global = true, env = "SPLUNK_BASE_URL")]
    pub base_url: Option<String>,

    /// Bearer token for authentication
    #[arg(short, long, global = true, env = "SPLUNK_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Maximum number of retries for rate-limited requests
    #[arg(long, global = true)]
    pub max_retries: Option<usize>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true)]
    pub skip_verify: bool,

    /// Namespace owner (`-` for any user)
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub owner: Option<String>,

    /// Namespace app (`-` for any app)
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub app: Option<String>,

    /// Give up any dispatch-state wait after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub max_wait: Option<u64>,

    /// Output format for job commands
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Serve Prometheus metrics on this address (e.g., 127.0.0.1:9090)
    #[arg(long, global = true, value_name = "ADDR")]
    pub metrics_bind: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create, list, wait on and cancel search jobs
    Jobs {
        #[command(subcommand)]
        command: commands::jobs::JobsCommand,
    },

    /// Encode event records for a streamed ingestion pipe (offline)
    Events {
        #[command(subcommand)]
        command: commands::events::EventsCommand,
    },
}

impl Cli {
    /// True when the command talks to a server and needs connection settings.
    pub fn needs_connection(&self) -> bool {
        matches!(self.command, Commands::Jobs { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_events_do_not_need_connection() {
        let cli = Cli::try_parse_from(["splunk-dispatch", "events", "encode", "hello"]).unwrap();
        assert!(!cli.needs_connection());

        let cli = Cli::try_parse_from(["splunk-dispatch", "jobs", "list"]).unwrap();
        assert!(cli.needs_connection());
    }

    #[test]
    fn test_namespace_wildcards_parse() {
        let cli = Cli::try_parse_from([
            "splunk-dispatch",
            "--owner",
            "-",
            "--app",
            "search",
            "jobs",
            "list",
        ])
        .unwrap();
        assert_eq!(cli.owner.as_deref(), Some("-"));
        assert_eq!(cli.app.as_deref(), Some("search"));
        assert_eq!(cli.output, OutputFormat::Table);
    }
}

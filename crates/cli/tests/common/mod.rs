//! Shared test utilities for splunk-dispatch integration tests.
//!
//! Invariants / Assumptions:
//! - Every command built here is hermetic: no `.env` loading and no
//!   `SPLUNK_*` variables leaking in from the host.
//! - Polling is fast so state waits against mock servers finish quickly.

use assert_cmd::Command;

#[allow(unused_imports)]
pub use splunk_dispatch_client::testing::job_status_body;

const HOST_VARS: [&str; 10] = [
    "SPLUNK_BASE_URL",
    "SPLUNK_API_TOKEN",
    "SPLUNK_SKIP_VERIFY",
    "SPLUNK_TIMEOUT",
    "SPLUNK_MAX_RETRIES",
    "SPLUNK_OWNER",
    "SPLUNK_APP",
    "SPLUNK_POLL_INTERVAL_MS",
    "SPLUNK_MAX_POLL_INTERVAL_MS",
    "SPLUNK_MAX_WAIT_SECS",
];

/// Returns a hermetic `splunk-dispatch` command.
pub fn dispatch_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("splunk-dispatch");
    cmd.env("DOTENV_DISABLED", "1").env_remove("RUST_LOG");
    for var in HOST_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Hermetic command pointed at `base_url` with a test token and fast polling.
#[allow(dead_code)]
pub fn dispatch_cmd_with_base_url(base_url: &str) -> Command {
    let mut cmd = dispatch_cmd();
    cmd.env("SPLUNK_BASE_URL", base_url)
        .env("SPLUNK_API_TOKEN", "test-token")
        .env("SPLUNK_POLL_INTERVAL_MS", "10")
        .env("SPLUNK_MAX_POLL_INTERVAL_MS", "20")
        .env("SPLUNK_MAX_RETRIES", "1");
    cmd
}

//! CLI cancellation utilities.
//!
//! Responsibilities:
//! - Install the Ctrl+C handler that fires the shared [`CancellationToken`].
//! - Recognize a cancellation anywhere in an `anyhow` error chain.
//! - Centralize the cancellation message printed on SIGINT.
//!
//! Does NOT handle:
//! - Deciding *when* to observe cancellation; the client library does that
//!   at request boundaries and between polls.

use splunk_dispatch_client::{CancellationToken, ClientError, ErrorKind};

/// Spawn a task that cancels `token` on the first Ctrl+C.
pub fn install_ctrl_c_handler(token: &CancellationToken) {
    let token = token.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        token.cancel();
    });
}

/// Returns true if this anyhow error represents a cancellation.
pub fn is_cancelled_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<ClientError>()
            .is_some_and(|e| e.kind() == ErrorKind::Cancelled)
    })
}

/// Print standard cancellation message to stderr.
pub fn print_cancelled_message() {
    eprintln!("^C\nOperation cancelled by user");
}

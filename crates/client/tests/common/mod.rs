//! Common test utilities for integration tests.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - Clients built here poll every few milliseconds so state waits finish quickly
//!
//! # What this does NOT handle
//! - Mock setup (use wiremock directly in tests)

use std::time::Duration;

#[allow(unused_imports)]
pub use splunk_dispatch_client::testing::{job_status_body, load_fixture};

#[allow(unused_imports)]
pub use splunk_dispatch_client::{
    CancellationToken, ClientError, DispatchState, ErrorKind, JobArgs, Namespace, PollPolicy,
    SliceFilter, SplunkClient,
};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Poll interval used by [`test_client`].
#[allow(dead_code)]
pub const TEST_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Client pointed at `server` with a bearer token and a fast poll policy.
#[allow(dead_code)]
pub fn test_client(server: &MockServer) -> SplunkClient {
    client_with_policy(server, PollPolicy::fixed(TEST_POLL_INTERVAL))
}

#[allow(dead_code)]
pub fn client_with_policy(server: &MockServer, policy: PollPolicy) -> SplunkClient {
    SplunkClient::builder()
        .base_url(server.uri())
        .api_token(secrecy::SecretString::new("test-token".to_string().into()))
        .poll_policy(policy)
        .max_retries(1)
        .build()
        .expect("test client should build")
}

/// Bodies of all requests received so far with the given method.
#[allow(dead_code)]
pub async fn received_bodies(server: &MockServer, http_method: &str) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == http_method)
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .collect()
}

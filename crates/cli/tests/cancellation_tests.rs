//! Integration tests for graceful Ctrl+C/SIGINT handling.
//!
//! These tests are Unix-only because they send SIGINT to a child process.
//! We assert:
//! - exit code is 130
//! - stderr contains the cancellation message
//! - no request is left polling after the process exits

#![cfg(unix)]

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use splunk_dispatch_client::testing::job_status_body;
use tokio::sync::Notify;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SID: &str = "1700000000.42";

fn dispatch_bin() -> &'static std::path::Path {
    assert_cmd::cargo::cargo_bin!("splunk-dispatch")
}

fn send_sigint(pid: u32) {
    // SAFETY: standard Unix kill syscall
    unsafe {
        libc::kill(pid as i32, libc::SIGINT);
    }
}

fn spawn_dispatch(server: &MockServer, args: &[&str]) -> tokio::process::Child {
    tokio::process::Command::new(dispatch_bin())
        .env("DOTENV_DISABLED", "1")
        .env("SPLUNK_BASE_URL", server.uri())
        .env("SPLUNK_API_TOKEN", "test-token")
        .env("SPLUNK_POLL_INTERVAL_MS", "10")
        .env("SPLUNK_MAX_POLL_INTERVAL_MS", "20")
        .env_remove("SPLUNK_MAX_WAIT_SECS")
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn splunk-dispatch")
}

async fn interrupt_and_collect(
    child: tokio::process::Child,
    request_seen: &Notify,
) -> std::process::Output {
    let pid = child.id().expect("child pid");
    tokio::time::timeout(Duration::from_secs(5), request_seen.notified())
        .await
        .expect("expected a job status request before SIGINT");
    send_sigint(pid);

    tokio::time::timeout(Duration::from_secs(5), child.wait_with_output())
        .await
        .expect("process should exit promptly")
        .expect("wait_with_output ok")
}

#[tokio::test]
async fn test_create_ctrl_c_during_in_flight_fetch_exits_130() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/search/jobs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "sid": SID })))
        .mount(&server)
        .await;

    // Status fetch hangs long enough to interrupt it mid-request.
    let request_seen = Arc::new(Notify::new());
    let request_seen_clone = Arc::clone(&request_seen);
    Mock::given(method("GET"))
        .and(path(format!("/services/search/jobs/{SID}")))
        .respond_with(move |_req: &wiremock::Request| {
            request_seen_clone.notify_one();
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(60))
                .set_body_json(job_status_body(SID, "RUNNING"))
        })
        .mount(&server)
        .await;

    let child = spawn_dispatch(&server, &["jobs", "create", "search index=main", "--wait-for", "done"]);
    let output = interrupt_and_collect(child, &request_seen).await;

    assert_eq!(output.status.code(), Some(130));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Operation cancelled by user"));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn test_wait_ctrl_c_between_polls_exits_130() {
    let server = MockServer::start().await;

    // Job never finishes; every poll answers immediately.
    let request_seen = Arc::new(Notify::new());
    let request_seen_clone = Arc::clone(&request_seen);
    Mock::given(method("GET"))
        .and(path(format!("/services/search/jobs/{SID}")))
        .respond_with(move |_req: &wiremock::Request| {
            request_seen_clone.notify_one();
            ResponseTemplate::new(200).set_body_json(job_status_body(SID, "RUNNING"))
        })
        .mount(&server)
        .await;

    let child = spawn_dispatch(&server, &["jobs", "wait", SID, "--state", "done"]);
    let output = interrupt_and_collect(child, &request_seen).await;

    assert_eq!(output.status.code(), Some(130));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Operation cancelled by user"));
}

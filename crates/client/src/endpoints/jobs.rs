//! Search job endpoints.

use reqwest::Client;
use tracing::debug;

use crate::endpoints::{authorize, extract_entry_content, send_request_with_retry};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::JobSnapshot;
use crate::namespace::{Namespace, encode_path_segment};

/// Collection path for search jobs.
pub const JOBS_PATH: &str = "search/jobs";

/// Actions accepted by `search/jobs/{sid}/control`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Cancel,
    Finalize,
    Pause,
    Unpause,
}

impl ControlAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ControlAction::Cancel => "cancel",
            ControlAction::Finalize => "finalize",
            ControlAction::Pause => "pause",
            ControlAction::Unpause => "unpause",
        }
    }
}

/// Extract the sid from a job creation response.
///
/// Splunk answers either `{"sid": "..."}` or an Atom-style entry list.
pub fn extract_sid(resp: &serde_json::Value) -> Result<String> {
    if let Some(sid) = resp.get("sid").and_then(|s| s.as_str()) {
        return Ok(sid.to_string());
    }

    extract_entry_content(resp)?
        .get("sid")
        .and_then(|s| s.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| ClientError::InvalidResponse("Missing sid in response".to_string()))
}

/// Map a 404 from a per-job endpoint onto [`ClientError::NotFound`].
fn not_found_as(sid: &str, err: ClientError) -> ClientError {
    match err {
        ClientError::ApiError { status: 404, .. } => ClientError::NotFound(sid.to_string()),
        other => other,
    }
}

/// Fetch the current snapshot of a search job.
#[allow(clippy::too_many_arguments)]
pub async fn get_job(
    client: &Client,
    base_url: &str,
    auth_token: Option<&str>,
    namespace: &Namespace,
    sid: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<JobSnapshot> {
    debug!(sid, "Fetching job snapshot");

    let url = namespace.url(
        base_url,
        &format!("{}/{}", JOBS_PATH, encode_path_segment(sid)),
    );

    let builder = authorize(client.get(&url), auth_token).query(&[("output_mode", "json")]);
    let response = send_request_with_retry(
        builder,
        max_retries,
        "search/jobs/{sid}",
        "GET",
        metrics,
    )
    .await
    .map_err(|e| not_found_as(sid, e))?;

    let resp: serde_json::Value = response.json().await?;

    let content = extract_entry_content(&resp)?;
    let mut snapshot: JobSnapshot = serde_json::from_value(content.clone())
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse job: {}", e)))?;
    if snapshot.sid.is_empty() {
        snapshot.sid = sid.to_string();
    }
    Ok(snapshot)
}

/// Post a control action for a search job.
#[allow(clippy::too_many_arguments)]
pub async fn control_job(
    client: &Client,
    base_url: &str,
    auth_token: Option<&str>,
    namespace: &Namespace,
    sid: &str,
    action: ControlAction,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<()> {
    debug!(sid, action = action.as_str(), "Controlling job");

    let url = namespace.url(
        base_url,
        &format!("{}/{}/control", JOBS_PATH, encode_path_segment(sid)),
    );

    let builder = authorize(client.post(&url), auth_token)
        .form(&[("action", action.as_str()), ("output_mode", "json")]);
    send_request_with_retry(
        builder,
        max_retries,
        "search/jobs/{sid}/control",
        "POST",
        metrics,
    )
    .await
    .map_err(|e| not_found_as(sid, e))?;

    Ok(())
}

/// Delete a search job.
pub async fn delete_job(
    client: &Client,
    base_url: &str,
    auth_token: Option<&str>,
    namespace: &Namespace,
    sid: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<()> {
    debug!(sid, "Deleting job");

    let url = namespace.url(
        base_url,
        &format!("{}/{}", JOBS_PATH, encode_path_segment(sid)),
    );

    let builder = authorize(client.delete(&url), auth_token);
    send_request_with_retry(builder, max_retries, "search/jobs/{sid}", "DELETE", metrics)
        .await
        .map_err(|e| not_found_as(sid, e))?;

    Ok(())
}

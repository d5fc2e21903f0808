//! Generic listing and creation endpoints shared by every resource kind.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::endpoints::{authorize, send_request_with_retry};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{Entry, SliceFilter, SplunkResponse};
use crate::namespace::Namespace;

/// Fetch one page of `resource` entries scoped by `filter`.
#[allow(clippy::too_many_arguments)]
pub async fn list_entities<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    auth_token: Option<&str>,
    namespace: &Namespace,
    resource: &str,
    filter: &SliceFilter,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<Entry<T>>> {
    filter.validate()?;

    let url = namespace.url(base_url, resource);
    debug!(
        resource,
        count = filter.count,
        offset = filter.offset,
        sort_key = %filter.sort_key,
        sort_dir = %filter.sort_direction,
        "Fetching collection slice"
    );

    let builder = authorize(client.get(&url), auth_token).query(&filter.query_params());
    let response = send_request_with_retry(builder, max_retries, resource, "GET", metrics).await?;

    let resp: SplunkResponse<T> = response.json().await.map_err(|e| {
        ClientError::InvalidResponse(format!("Failed to parse {} listing: {}", resource, e))
    })?;
    Ok(resp.entry)
}

/// POST a form to `resource` and require `201 Created`.
///
/// Returns the parsed JSON body so the caller can extract the new identity.
#[allow(clippy::too_many_arguments)]
pub async fn create_entity(
    client: &Client,
    base_url: &str,
    auth_token: Option<&str>,
    namespace: &Namespace,
    resource: &str,
    form: &[(String, String)],
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<serde_json::Value> {
    let url = namespace.url(base_url, resource);

    let builder = authorize(client.post(&url), auth_token).form(form);
    let response = send_request_with_retry(builder, max_retries, resource, "POST", metrics).await?;

    let status = response.status();
    if status != StatusCode::CREATED {
        return Err(ClientError::UnexpectedStatus {
            operation: "create",
            expected: StatusCode::CREATED.as_u16(),
            actual: status.as_u16(),
        });
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse creation response: {}", e)))
}

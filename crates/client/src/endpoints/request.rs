//! Retry helper for HTTP requests with exponential backoff.
//!
//! Requests that fail with HTTP 429 (Too Many Requests) are retried with
//! exponential backoff. Every other outcome is returned to the caller
//! unchanged: the client never retries transport failures on its own.

use std::time::{Duration, Instant};

use reqwest::{RequestBuilder, Response};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::SplunkMessages;

/// Retry budget used when the caller passes 0.
const DEFAULT_MAX_RETRIES: usize = 3;

/// Attach a bearer token when one is configured.
pub(crate) fn authorize(builder: RequestBuilder, auth_token: Option<&str>) -> RequestBuilder {
    match auth_token {
        Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
        None => builder,
    }
}

/// Sends an HTTP request with automatic retry for HTTP 429 responses.
///
/// - Backoff is `2^attempt` seconds (1s, 2s, 4s, ...).
/// - Non-success statuses become [`ClientError::ApiError`], with Splunk's
///   `messages` parsed when the body carries them.
/// - Every attempt is recorded on `metrics` under `endpoint`/`method`.
///
/// # Errors
///
/// Returns `ClientError::MaxRetriesExceeded` when every attempt was rate limited.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let max_retries = if max_retries == 0 {
        DEFAULT_MAX_RETRIES
    } else {
        max_retries
    };

    for attempt in 0..=max_retries {
        let attempt_builder = match builder.try_clone() {
            Some(cloned) => cloned,
            None if attempt == 0 => {
                debug!(endpoint, "Request builder cannot be cloned, single attempt only");
                return send_once(builder, endpoint, method, metrics).await;
            }
            None => {
                debug!(endpoint, "Cannot clone request builder for retry");
                return Err(ClientError::MaxRetriesExceeded(attempt));
            }
        };

        if attempt > 0
            && let Some(m) = metrics
        {
            m.record_retry(endpoint, method, attempt);
        }

        match send_once(attempt_builder, endpoint, method, metrics).await {
            Err(ClientError::ApiError { status: 429, .. }) if attempt < max_retries => {
                let backoff_secs = 2u64.pow(attempt as u32);
                debug!(
                    endpoint,
                    attempt = attempt + 1,
                    max_retries = max_retries + 1,
                    backoff_secs,
                    "Rate limited (HTTP 429), retrying with exponential backoff"
                );
                tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
            }
            Err(ClientError::ApiError { status: 429, .. }) => {
                debug!(
                    endpoint,
                    attempts = attempt + 1,
                    "Max retries exhausted for rate-limited request"
                );
                return Err(ClientError::MaxRetriesExceeded(max_retries + 1));
            }
            other => {
                if attempt > 0 && other.is_ok() {
                    debug!(endpoint, attempt = attempt + 1, "Request succeeded after retry");
                }
                return other;
            }
        }
    }

    Err(ClientError::MaxRetriesExceeded(max_retries + 1))
}

/// One attempt: send, time, record and classify.
async fn send_once(
    builder: RequestBuilder,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    if let Some(m) = metrics {
        m.record_request(endpoint, method);
    }

    let started = Instant::now();
    let result = builder.send().await;
    let elapsed = started.elapsed();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            let err = classify_transport_error(e, elapsed);
            if let Some(m) = metrics {
                m.record_request_duration(endpoint, method, elapsed, None);
                m.record_error(endpoint, method, &err);
            }
            return Err(err);
        }
    };

    let status = response.status().as_u16();
    if let Some(m) = metrics {
        m.record_request_duration(endpoint, method, elapsed, Some(status));
    }
    debug!(endpoint, method, status, elapsed_ms = elapsed.as_millis() as u64, "Request completed");

    if response.status().is_success() {
        return Ok(response);
    }

    let err = api_error(response).await;
    if let Some(m) = metrics
        && status != 429
    {
        m.record_error(endpoint, method, &err);
    }
    Err(err)
}

fn classify_transport_error(e: reqwest::Error, elapsed: Duration) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout(elapsed)
    } else if e.is_connect() {
        let target = e
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "server".to_string());
        ClientError::ConnectionRefused(target)
    } else {
        ClientError::HttpError(e)
    }
}

/// Convert a non-success response into [`ClientError::ApiError`].
async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let request_id = response
        .headers()
        .get("X-Splunk-Request-Id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    let message = match serde_json::from_str::<SplunkMessages>(&body) {
        Ok(m) if !m.messages.is_empty() => m.summary(),
        _ => body,
    };

    ClientError::ApiError {
        status,
        url,
        message,
        request_id,
    }
}

//! Metrics collection for API calls and job polling.
//!
//! This module records, through the `metrics` facade:
//! - Request latency histograms
//! - Request counters (total, retries, errors)
//! - State-wait poll iterations and outcomes
//!
//! # What this module does NOT handle:
//! - Metrics exposition (see [`crate::metrics_exporter`])
//!
//! # Invariants
//! - Label names are consistent: `endpoint`, `method`, `status`, `error_kind`,
//!   `target`, `outcome`
//! - Recording is infallible and zero-cost when no recorder is installed

use std::time::Duration;

use crate::error::ClientError;
use crate::models::DispatchState;

pub const METRIC_REQUEST_DURATION: &str = "splunk_dispatch_request_duration_seconds";
pub const METRIC_REQUESTS_TOTAL: &str = "splunk_dispatch_requests_total";
pub const METRIC_RETRIES_TOTAL: &str = "splunk_dispatch_retries_total";
pub const METRIC_ERRORS_TOTAL: &str = "splunk_dispatch_errors_total";

/// Counter of snapshot fetches performed while waiting for a state.
pub const METRIC_POLLS_TOTAL: &str = "splunk_dispatch_job_polls_total";

/// Histogram of total time spent waiting for a target state.
pub const METRIC_WAIT_DURATION: &str = "splunk_dispatch_job_wait_duration_seconds";

/// Metrics collector for client operations.
///
/// ```rust,ignore
/// let collector = MetricsCollector::new();
/// collector.record_request_duration("search/jobs", "POST", Duration::from_millis(150), Some(201));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create an enabled collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the duration of an API request.
    ///
    /// `status` is `None` when the request failed before a response arrived.
    pub fn record_request_duration(
        &self,
        endpoint: &str,
        method: &str,
        duration: Duration,
        status: Option<u16>,
    ) {
        if !self.enabled {
            return;
        }

        let status_label = status.map_or("error".to_string(), |s| s.to_string());

        metrics::histogram!(METRIC_REQUEST_DURATION,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "status" => status_label,
        )
        .record(duration.as_secs_f64());
    }

    /// Record a request attempt, including retries.
    pub fn record_request(&self, endpoint: &str, method: &str) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
        )
        .increment(1);
    }

    /// Record a retry attempt (1-based, excludes the initial request).
    pub fn record_retry(&self, endpoint: &str, method: &str, attempt: usize) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_RETRIES_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "attempt" => attempt.to_string(),
        )
        .increment(1);
    }

    /// Record a failed request, labelled by [`ClientError::kind`].
    pub fn record_error(&self, endpoint: &str, method: &str, error: &ClientError) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_ERRORS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "error_kind" => error.kind().as_str(),
        )
        .increment(1);
    }

    /// Record one snapshot fetch inside a state wait.
    pub fn record_poll(&self, target: DispatchState) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_POLLS_TOTAL, "target" => target.as_str()).increment(1);
    }

    /// Record how a state wait ended.
    ///
    /// `outcome` is `"reached"` or an error kind code.
    pub fn record_wait(&self, target: DispatchState, outcome: &'static str, duration: Duration) {
        if !self.enabled {
            return;
        }

        metrics::histogram!(METRIC_WAIT_DURATION,
            "target" => target.as_str(),
            "outcome" => outcome,
        )
        .record(duration.as_secs_f64());
    }
}

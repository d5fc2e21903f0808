//! Centralized constants for the Splunk dispatch workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed connection timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default Splunk management port.
pub const DEFAULT_SPLUNK_PORT: u16 = 8089;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default maximum number of retries for rate-limited requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Upper bound accepted for the retry count.
pub const MAX_MAX_RETRIES: usize = 10;

// =============================================================================
// Dispatch Polling Defaults
// =============================================================================

/// Default initial interval between job snapshot polls in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Default ceiling for the backed-off poll interval in milliseconds.
pub const DEFAULT_MAX_POLL_INTERVAL_MS: u64 = 5000;

/// Factor applied to the poll interval after every poll that did not reach the target.
pub const POLL_BACKOFF_FACTOR: u32 = 2;

// =============================================================================
// Collection Listing Defaults
// =============================================================================

/// Default number of entries requested per slice.
pub const DEFAULT_SLICE_COUNT: usize = 30;

/// Default sort key for job listings.
pub const DEFAULT_JOB_SORT_KEY: &str = "dispatch_time";

//! Splunk search-job dispatch client.
//!
//! This crate submits searches to the Splunk REST API, tracks each job through
//! its dispatch states, lists jobs page by page, and encodes event records for
//! streamed ingestion.
//!
//! - [`SplunkClient`] owns the connection and defaults.
//! - [`JobCollection::create`] submits a search and waits for a target state.
//! - [`Job::await_state`] polls until a state is reached, the job fails, or the
//!   caller cancels.
//! - [`events`] holds the `<event>` codec and the `<stream>` writer.

pub mod cancellation;
pub mod client;
pub mod collection;
pub mod endpoints;
pub mod error;
pub mod events;
pub mod jobs;
pub mod metrics;
pub mod metrics_exporter;
pub mod models;
pub mod namespace;
mod redact;
mod serde_helpers;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use cancellation::CancellationToken;
pub use client::SplunkClient;
pub use client::builder::SplunkClientBuilder;
pub use collection::{Resource, ResourceCollection};
pub use error::{ClientError, ErrorKind, Result};
pub use events::{EventRecord, EventStreamWriter, decode_events, parse_epoch_seconds};
pub use jobs::{Job, JobCollection, PollPolicy};
pub use metrics::MetricsCollector;
pub use metrics_exporter::{MetricsExporter, MetricsExporterError};
pub use models::{
    DispatchState, ExecMode, JobArgs, JobSnapshot, SearchMode, SliceFilter, SortDirection,
};
pub use namespace::Namespace;
pub use redact::redact_search;

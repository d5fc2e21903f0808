//! Main Splunk REST API client.
//!
//! [`SplunkClient`] owns the HTTP connection pool, the base URL, the bearer
//! token and the defaults (namespace, retry budget, poll policy) that the
//! collection and job handles borrow.
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - State-machine logic (see [`crate::jobs`])
//!
//! # Invariants
//! - The base URL never ends with a slash.
//! - Handles borrow the client; no handle outlives it.

pub mod builder;

use secrecy::{ExposeSecret, SecretString};

use crate::collection::{Resource, ResourceCollection};
use crate::error::Result;
use crate::jobs::{Job, JobCollection, PollPolicy};
use crate::metrics::MetricsCollector;
use crate::namespace::Namespace;

/// Splunk REST API client.
///
/// ```rust,ignore
/// use splunk_dispatch_client::{DispatchState, JobArgs, SplunkClient};
///
/// let client = SplunkClient::builder()
///     .base_url("https://localhost:8089".to_string())
///     .api_token(token)
///     .build()?;
/// let job = client
///     .jobs()
///     .create("search index=main", &JobArgs::new(), DispatchState::Running, &cancel)
///     .await?;
/// ```
#[derive(Debug)]
pub struct SplunkClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) auth_token: Option<SecretString>,
    pub(crate) max_retries: usize,
    pub(crate) metrics: Option<MetricsCollector>,
    pub(crate) poll_policy: PollPolicy,
    pub(crate) namespace: Namespace,
}

impl SplunkClient {
    /// Create a new client builder.
    pub fn builder() -> builder::SplunkClientBuilder {
        builder::SplunkClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Namespace used by [`Self::jobs`].
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll_policy
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    pub(crate) fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_ref().map(|t| t.expose_secret())
    }

    pub(crate) fn metrics(&self) -> Option<&MetricsCollector> {
        self.metrics.as_ref()
    }

    /// Jobs in the client's default namespace.
    pub fn jobs(&self) -> JobCollection<'_> {
        JobCollection::new(self, self.namespace.clone())
    }

    /// Jobs in an explicit namespace.
    pub fn jobs_in(&self, namespace: Namespace) -> JobCollection<'_> {
        JobCollection::new(self, namespace)
    }

    /// A generic collection of `R` in `namespace`.
    pub fn collection<R: Resource>(&self, namespace: Namespace) -> ResourceCollection<'_, R> {
        ResourceCollection::new(self, namespace)
    }

    /// Attach to an existing job by sid and fetch its snapshot.
    pub async fn job(&self, sid: &str) -> Result<Job<'_>> {
        Job::attach(self, self.namespace.clone(), sid).await
    }
}

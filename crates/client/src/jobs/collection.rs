//! The `search/jobs` collection.
//!
//! Specializes [`ResourceCollection`] with the job creation form, sid
//! extraction and the wait for the requested initial state.

use splunk_dispatch_config::constants::DEFAULT_JOB_SORT_KEY;
use tracing::debug;

use crate::cancellation::CancellationToken;
use crate::client::SplunkClient;
use crate::collection::{Resource, ResourceCollection};
use crate::endpoints::{extract_sid, jobs::JOBS_PATH};
use crate::error::{ClientError, Result};
use crate::jobs::Job;
use crate::models::{DispatchState, JobArgs, JobSnapshot, SliceFilter};
use crate::namespace::Namespace;
use crate::redact::redact_search;

impl Resource for JobSnapshot {
    const PATH: &'static str = JOBS_PATH;
    const DEFAULT_SORT_KEY: &'static str = DEFAULT_JOB_SORT_KEY;

    fn identity_from_created(resp: &serde_json::Value) -> Result<String> {
        extract_sid(resp)
    }
}

/// Search jobs in one namespace.
#[derive(Debug)]
pub struct JobCollection<'c> {
    inner: ResourceCollection<'c, JobSnapshot>,
}

impl<'c> JobCollection<'c> {
    pub(crate) fn new(client: &'c SplunkClient, namespace: Namespace) -> Self {
        Self {
            inner: ResourceCollection::new(client, namespace),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        self.inner.namespace()
    }

    /// Count 30, offset 0, sorted by `dispatch_time` descending.
    pub fn default_filter() -> SliceFilter {
        JobSnapshot::default_filter()
    }

    /// Snapshots from the most recent [`Self::fetch_slice`].
    pub fn snapshots(&self) -> &[JobSnapshot] {
        self.inner.items()
    }

    /// Fetch one page of jobs, replacing the current page.
    pub async fn fetch_slice(&mut self, filter: &SliceFilter) -> Result<&[JobSnapshot]> {
        self.inner.fetch_slice(filter).await
    }

    /// Job handles over the current page.
    pub fn jobs(&self) -> Vec<Job<'c>> {
        self.inner
            .items()
            .iter()
            .map(|snapshot| self.job(snapshot))
            .collect()
    }

    /// A handle for one listed snapshot.
    pub fn job(&self, snapshot: &JobSnapshot) -> Job<'c> {
        Job::from_snapshot(self.inner.client(), self.namespace().clone(), snapshot.clone())
    }

    /// Submit `search` and return the job once it has reached `target`.
    ///
    /// The form is `search`, then the options in `args`, then `args.extra`.
    /// One fetch is made right after submission, then the job is polled.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Configuration`] for an empty search or
    ///   `exec_mode=oneshot`; nothing is submitted.
    /// - [`ClientError::UnexpectedStatus`] when the server does not answer
    ///   `201 Created`.
    /// - Everything [`Job::await_state`] can return.
    pub async fn create(
        &self,
        search: &str,
        args: &JobArgs,
        target: DispatchState,
        cancel: &CancellationToken,
    ) -> Result<Job<'c>> {
        if search.trim().is_empty() {
            return Err(ClientError::Configuration(
                "search must not be empty".to_string(),
            ));
        }
        if args.is_oneshot() {
            return Err(ClientError::Configuration(format!(
                "exec_mode=oneshot creates no job that can reach {}",
                target
            )));
        }
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        debug!(
            search = %redact_search(search),
            namespace = %self.namespace(),
            %target,
            "Creating search job"
        );

        let form = args.form_params(search);
        let sid = tokio::select! {
            result = self.inner.submit(&form) => result?,
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
        };
        debug!(%sid, "Search job created");

        let mut job = Job::new(self.inner.client(), self.namespace().clone(), sid);
        job.fetch_snapshot_cancellable(cancel).await?;
        job.await_state(target, cancel).await?;
        Ok(job)
    }
}

//! A single search job and its dispatch-state machine.
//!
//! Responsibilities:
//! - Refresh the local [`JobSnapshot`] from the server.
//! - Wait, by polling, until the job reaches a target [`DispatchState`].
//! - Send control actions (cancel, finalize, pause, unpause) and delete.
//!
//! Does NOT handle:
//! - Submission (see [`super::JobCollection::create`]).
//!
//! Invariants:
//! - The local snapshot is only accurate immediately after a fetch.
//! - A wait returns `Ok` only once the fetched state is at or past the target.
//! - A wait never outlives its call: no background task is spawned, and
//!   cancellation is observed both during requests and between polls.

use std::time::Instant;

use tokio::time::Instant as TokioInstant;
use tracing::debug;

use crate::cancellation::CancellationToken;
use crate::client::SplunkClient;
use crate::endpoints::{self, ControlAction};
use crate::error::{ClientError, Result};
use crate::models::{DispatchState, JobSnapshot};
use crate::namespace::Namespace;

/// Handle to one dispatched search, borrowed from a [`SplunkClient`].
#[derive(Debug, Clone)]
pub struct Job<'c> {
    client: &'c SplunkClient,
    namespace: Namespace,
    sid: String,
    snapshot: JobSnapshot,
}

impl<'c> Job<'c> {
    /// Handle with an empty snapshot; nothing is fetched.
    pub(crate) fn new(client: &'c SplunkClient, namespace: Namespace, sid: String) -> Self {
        let snapshot = JobSnapshot {
            sid: sid.clone(),
            ..JobSnapshot::default()
        };
        Self {
            client,
            namespace,
            sid,
            snapshot,
        }
    }

    /// Handle over an already-fetched snapshot, e.g. from a listing.
    pub(crate) fn from_snapshot(
        client: &'c SplunkClient,
        namespace: Namespace,
        snapshot: JobSnapshot,
    ) -> Self {
        Self {
            client,
            namespace,
            sid: snapshot.sid.clone(),
            snapshot,
        }
    }

    /// Handle for an existing sid, with its snapshot fetched.
    pub async fn attach(
        client: &'c SplunkClient,
        namespace: Namespace,
        sid: &str,
    ) -> Result<Job<'c>> {
        let mut job = Self::new(client, namespace, sid.to_string());
        job.refresh().await?;
        Ok(job)
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The most recently fetched snapshot.
    pub fn snapshot(&self) -> &JobSnapshot {
        &self.snapshot
    }

    /// State from the most recent fetch; may be stale.
    pub fn state(&self) -> DispatchState {
        self.snapshot.state()
    }

    /// Retrieve the current snapshot and replace the local one.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] when the sid no longer exists server-side;
    /// communication errors are returned unchanged.
    pub async fn fetch_snapshot(&mut self) -> Result<&JobSnapshot> {
        self.refresh().await?;
        Ok(&self.snapshot)
    }

    /// [`Self::fetch_snapshot`], abandoning the request if `cancel` fires.
    pub async fn fetch_snapshot_cancellable(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<&JobSnapshot> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        tokio::select! {
            result = self.refresh() => result?,
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
        }
        Ok(&self.snapshot)
    }

    async fn refresh(&mut self) -> Result<()> {
        let snapshot = endpoints::get_job(
            &self.client.http,
            &self.client.base_url,
            self.client.auth_token(),
            &self.namespace,
            &self.sid,
            self.client.max_retries,
            self.client.metrics(),
        )
        .await?;

        if snapshot.state() != self.snapshot.state() {
            debug!(
                sid = %self.sid,
                from = %self.snapshot.state(),
                to = %snapshot.state(),
                "Job state changed"
            );
        }
        self.snapshot = snapshot;
        Ok(())
    }

    /// Wait until the job reaches `target` or a later state.
    ///
    /// Polls with the client's [`crate::jobs::PollPolicy`]. Intermediate
    /// states between polls may go unobserved.
    ///
    /// # Errors
    ///
    /// - [`ClientError::TerminalState`] if the job ends (fails, or finishes
    ///   when `target` is `FAILED`) without reaching `target`.
    /// - [`ClientError::Cancelled`] if `cancel` fires.
    /// - [`ClientError::OperationTimeout`] if the policy's `max_wait` elapses.
    /// - Any error from [`Self::fetch_snapshot`].
    pub async fn await_state(
        &mut self,
        target: DispatchState,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.await_state_with_progress(target, cancel, |_| {}).await
    }

    /// [`Self::await_state`], reporting every polled snapshot to `on_progress`.
    pub async fn await_state_with_progress<F>(
        &mut self,
        target: DispatchState,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> Result<()>
    where
        F: FnMut(&JobSnapshot),
    {
        let started = Instant::now();
        let result = self.poll_until(target, cancel, &mut on_progress).await;

        if let Some(m) = self.client.metrics() {
            let outcome = match &result {
                Ok(()) => "reached",
                Err(e) => e.kind().as_str(),
            };
            m.record_wait(target, outcome, started.elapsed());
        }
        result
    }

    async fn poll_until<F>(
        &mut self,
        target: DispatchState,
        cancel: &CancellationToken,
        on_progress: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&JobSnapshot),
    {
        let policy = self.client.poll_policy.clone();
        let mut delay = policy.interval;
        let mut polls: u64 = 0;
        let deadline = policy.max_wait.map(|max_wait| TokioInstant::now() + max_wait);
        let timed_out = || ClientError::OperationTimeout {
            operation: "await job state",
            timeout: policy.max_wait.unwrap_or_default(),
        };

        loop {
            let state = self.state();
            if state.has_reached(target) {
                debug!(sid = %self.sid, %state, %target, polls, "Job reached target state");
                return Ok(());
            }
            if state.is_terminal() {
                debug!(sid = %self.sid, %state, %target, polls, "Job ended before target state");
                return Err(ClientError::TerminalState {
                    sid: self.sid.clone(),
                    state,
                    target,
                });
            }
            if cancel.is_cancelled() {
                return Err(ClientError::Cancelled);
            }

            if deadline.is_some_and(|d| TokioInstant::now() >= d) {
                return Err(timed_out());
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                _ = until(deadline) => return Err(timed_out()),
            }
            tokio::select! {
                result = self.fetch_snapshot_cancellable(cancel) => {
                    result?;
                }
                _ = until(deadline) => return Err(timed_out()),
            }
            polls += 1;
            if let Some(m) = self.client.metrics() {
                m.record_poll(target);
            }
            debug!(
                sid = %self.sid,
                state = %self.state(),
                progress = self.snapshot.done_progress,
                poll = polls,
                "Polled job"
            );
            on_progress(&self.snapshot);

            delay = policy.next_interval(delay);
        }
    }

    async fn control(&self, action: ControlAction) -> Result<()> {
        endpoints::control_job(
            &self.client.http,
            &self.client.base_url,
            self.client.auth_token(),
            &self.namespace,
            &self.sid,
            action,
            self.client.max_retries,
            self.client.metrics(),
        )
        .await
    }

    /// Ask the server to cancel the job. The snapshot is not refreshed.
    pub async fn cancel(&self) -> Result<()> {
        self.control(ControlAction::Cancel).await
    }

    /// Stop the search and keep the results gathered so far.
    pub async fn finalize(&self) -> Result<()> {
        self.control(ControlAction::Finalize).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.control(ControlAction::Pause).await
    }

    pub async fn unpause(&self) -> Result<()> {
        self.control(ControlAction::Unpause).await
    }

    /// Delete the job and its artifacts server-side.
    pub async fn remove(self) -> Result<()> {
        endpoints::delete_job(
            &self.client.http,
            &self.client.base_url,
            self.client.auth_token(),
            &self.namespace,
            &self.sid,
            self.client.max_retries,
            self.client.metrics(),
        )
        .await
    }
}

/// Resolves at `deadline`, or never when there is none.
async fn until(deadline: Option<TokioInstant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

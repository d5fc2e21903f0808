//! Jobs command implementation.
//!
//! Responsibilities:
//! - Submit a search and wait for a target dispatch state (`create`).
//! - Print one page of jobs (`list`).
//! - Wait on, or cancel, an existing job by sid (`wait`, `cancel`).
//!
//! Does NOT handle:
//! - Result retrieval; the sid printed by `create` is the handle for that.
//!
//! Invariants:
//! - Job data goes to stdout; progress and diagnostics go to stderr.

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use splunk_dispatch_client::{
    CancellationToken, ClientError, DispatchState, ExecMode, Job, JobArgs, JobSnapshot, SliceFilter,
    SortDirection, SplunkClient,
};
use tracing::info;

use crate::args::OutputFormat;

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// Submit a search and wait until the job reaches a dispatch state
    Create {
        /// The search to run (e.g., 'search index=main | head 10')
        search: String,

        /// Dispatch state to wait for before returning
        #[arg(long, default_value = "running", value_parser = parse_state)]
        wait_for: DispatchState,

        /// Earliest time for the search (e.g., '-24h')
        #[arg(short, long, allow_hyphen_values = true)]
        earliest: Option<String>,

        /// Latest time for the search (e.g., 'now')
        #[arg(short, long, allow_hyphen_values = true)]
        latest: Option<String>,

        /// Maximum number of results the job retains
        #[arg(long)]
        max_count: Option<u64>,

        /// Execution mode
        #[arg(long, value_enum, default_value_t = ExecModeArg::Normal)]
        exec_mode: ExecModeArg,

        /// Seconds the job's artifacts are kept after it finishes
        #[arg(long)]
        ttl: Option<u64>,

        /// Caller-chosen sid
        #[arg(long)]
        id: Option<String>,

        /// Additional job argument as KEY=VALUE (repeatable)
        #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        args: Vec<(String, String)>,

        /// Print each polled state to stderr while waiting
        #[arg(long)]
        progress: bool,
    },

    /// List one page of search jobs
    List {
        /// Maximum number of jobs to list (0 for all)
        #[arg(short, long, default_value = "30")]
        count: usize,

        /// Offset into the job list (zero-based)
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Server-side filter over job properties
        #[arg(short, long)]
        search: Option<String>,

        /// Property to sort by
        #[arg(long, default_value = "dispatch_time")]
        sort_key: String,

        /// Sort direction
        #[arg(long, value_enum, default_value_t = SortDirArg::Desc)]
        sort_dir: SortDirArg,
    },

    /// Wait until an existing job reaches a dispatch state
    Wait {
        /// Search ID
        sid: String,

        /// Dispatch state to wait for
        #[arg(long, default_value = "done", value_parser = parse_state)]
        state: DispatchState,

        /// Print each polled state to stderr while waiting
        #[arg(long)]
        progress: bool,
    },

    /// Cancel a running job
    Cancel {
        /// Search ID
        sid: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecModeArg {
    Normal,
    Blocking,
    Oneshot,
}

impl From<ExecModeArg> for ExecMode {
    fn from(mode: ExecModeArg) -> Self {
        match mode {
            ExecModeArg::Normal => ExecMode::Normal,
            ExecModeArg::Blocking => ExecMode::Blocking,
            ExecModeArg::Oneshot => ExecMode::Oneshot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortDirArg {
    Asc,
    Desc,
}

impl From<SortDirArg> for SortDirection {
    fn from(dir: SortDirArg) -> Self {
        match dir {
            SortDirArg::Asc => SortDirection::Asc,
            SortDirArg::Desc => SortDirection::Desc,
        }
    }
}

fn parse_state(raw: &str) -> Result<DispatchState, String> {
    raw.parse::<DispatchState>().map_err(|e| e.to_string())
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

pub async fn run(
    client: &SplunkClient,
    command: JobsCommand,
    output: OutputFormat,
    cancel: &CancellationToken,
) -> Result<()> {
    match command {
        JobsCommand::Create {
            search,
            wait_for,
            earliest,
            latest,
            max_count,
            exec_mode,
            ttl,
            id,
            args,
            progress,
        } => {
            let mut job_args = JobArgs::new().exec_mode(exec_mode.into());
            if let Some(earliest) = earliest {
                job_args = job_args.earliest_time(earliest);
            }
            if let Some(latest) = latest {
                job_args = job_args.latest_time(latest);
            }
            if let Some(max_count) = max_count {
                job_args = job_args.max_count(max_count);
            }
            if let Some(ttl) = ttl {
                job_args = job_args.ttl(ttl);
            }
            if let Some(id) = id {
                job_args = job_args.id(id);
            }
            for (key, value) in args {
                job_args = job_args.arg(key, value);
            }

            info!(target_state = %wait_for, "Creating search job");
            let jobs = client.jobs();
            let job = if progress {
                // Submit first without waiting, then wait with progress reporting.
                let mut job = jobs
                    .create(&search, &job_args, DispatchState::None, cancel)
                    .await
                    .context("Failed to create search job")?;
                job.await_state_with_progress(wait_for, cancel, print_progress)
                    .await
                    .with_context(|| format!("Job {} did not reach {}", job.sid(), wait_for))?;
                job
            } else {
                jobs.create(&search, &job_args, wait_for, cancel)
                    .await
                    .context("Failed to create search job")?
            };

            print_snapshot(job.snapshot(), output)?;
        }
        JobsCommand::List {
            count,
            offset,
            search,
            sort_key,
            sort_dir,
        } => {
            let mut filter = SliceFilter::default()
                .count(count)
                .offset(offset)
                .sort(sort_key, sort_dir.into());
            if let Some(search) = search {
                filter = filter.search(search);
            }

            info!("Listing search jobs");
            let mut jobs = client.jobs();
            let page = jobs
                .fetch_slice(&filter)
                .await
                .context("Failed to list search jobs")?;
            print_page(page, output)?;
        }
        JobsCommand::Wait {
            sid,
            state,
            progress,
        } => {
            let mut job = attach(client, &sid, cancel)
                .await
                .with_context(|| format!("Failed to fetch job {sid}"))?;

            let result = if progress {
                job.await_state_with_progress(state, cancel, print_progress)
                    .await
            } else {
                job.await_state(state, cancel).await
            };
            result.with_context(|| format!("Job {sid} did not reach {state}"))?;

            print_snapshot(job.snapshot(), output)?;
        }
        JobsCommand::Cancel { sid } => {
            info!(%sid, "Cancelling job");
            let job = attach(client, &sid, cancel)
                .await
                .with_context(|| format!("Failed to fetch job {sid}"))?;
            job.cancel()
                .await
                .with_context(|| format!("Failed to cancel job {sid}"))?;
            println!("Job {} cancelled.", sid);
        }
    }

    Ok(())
}

/// Fetch an existing job, giving up if `cancel` fires first.
async fn attach<'c>(
    client: &'c SplunkClient,
    sid: &str,
    cancel: &CancellationToken,
) -> splunk_dispatch_client::Result<Job<'c>> {
    tokio::select! {
        result = client.job(sid) => result,
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
    }
}

fn print_progress(snapshot: &JobSnapshot) {
    eprintln!(
        "{} {} {:.1}%",
        snapshot.sid,
        snapshot.state(),
        snapshot.done_progress * 100.0
    );
}

fn print_snapshot(snapshot: &JobSnapshot, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(snapshot)
                .context("Failed to serialize job snapshot")?;
            println!("{json}");
        }
        OutputFormat::Table => {
            println!("SID: {}", snapshot.sid);
            println!("  State: {}", snapshot.state());
            println!("  Progress: {:.1}%", snapshot.done_progress * 100.0);
            println!("  Events: {}", snapshot.event_count);
            println!("  Results: {}", snapshot.result_count);
            println!("  Scanned: {}", snapshot.scan_count);
            println!("  Run duration: {:.3}s", snapshot.run_duration);
            for message in snapshot.error_messages() {
                println!("  Error: {message}");
            }
        }
    }
    Ok(())
}

fn print_page(page: &[JobSnapshot], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(page).context("Failed to serialize job list")?;
            println!("{json}");
        }
        OutputFormat::Table => {
            println!("Found {} jobs:\n", page.len());
            for snapshot in page {
                println!("  SID: {}", snapshot.sid);
                println!("    State: {}", snapshot.state());
                println!("    Progress: {:.1}%", snapshot.done_progress * 100.0);
                println!("    Results: {}", snapshot.result_count);
                println!("    Events: {}", snapshot.event_count);
                println!();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("auto_cancel=60").unwrap(),
            ("auto_cancel".to_string(), "60".to_string())
        );
        assert_eq!(
            parse_key_value("label=a=b").unwrap(),
            ("label".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_parse_state_accepts_any_case() {
        assert_eq!(parse_state("done").unwrap(), DispatchState::Done);
        assert_eq!(parse_state("RUNNING").unwrap(), DispatchState::Running);
        assert!(parse_state("exploded").is_err());
    }
}

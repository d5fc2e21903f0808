//! Data models for Splunk API requests and responses.
//!
//! Types are organized by concern in submodules and re-exported here.

pub mod args;
pub mod common;
pub mod filter;
pub mod jobs;

pub use args::{ExecMode, JobArgs, SearchMode};
pub use common::{Acl, Entry, MessageType, Paging, SplunkMessage, SplunkMessages, SplunkResponse};
pub use filter::{SliceFilter, SortDirection};
pub use jobs::{DispatchState, JobSnapshot, UnknownDispatchState};

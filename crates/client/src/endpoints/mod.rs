//! REST API endpoint implementations.
//!
//! Free functions over a `reqwest::Client`. Higher-level types in
//! [`crate::collection`] and [`crate::jobs`] supply the base URL, token,
//! namespace and retry budget.

mod entities;
pub mod jobs;
mod request;

pub use entities::{create_entity, list_entities};
pub use jobs::{ControlAction, control_job, delete_job, extract_sid, get_job};
pub use request::send_request_with_retry;

pub(crate) use request::authorize;

use crate::error::{ClientError, Result};

/// Extract `entry[0].content` from an Atom-style JSON response.
pub fn extract_entry_content(resp: &serde_json::Value) -> Result<&serde_json::Value> {
    resp.get("entry")
        .and_then(|e| e.as_array())
        .and_then(|entries| entries.first())
        .and_then(|entry| entry.get("content"))
        .ok_or_else(|| ClientError::InvalidResponse("Missing entry content in response".to_string()))
}

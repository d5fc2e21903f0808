//! Search job models: dispatch states and job snapshots.
//!
//! # What this module handles:
//! - The ordered [`DispatchState`] enumeration and its comparison rules
//! - Deserializing the `content` block of a `search/jobs/{sid}` entry
//!
//! # What this module does NOT handle:
//! - Polling or waiting (see [`crate::jobs`])
//! - HTTP transport (see [`crate::endpoints::jobs`])
//!
//! # Invariants
//! - Progress states are totally ordered: `NONE < QUEUED < PARSING < RUNNING
//!   < PAUSED < FINALIZING < DONE`.
//! - `FAILED` is terminal and incomparable with every other state, so
//!   `state >= target` is never satisfied by a failed job.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Server-side execution stage of a search job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DispatchState {
    /// No state observed yet.
    #[default]
    None,
    Queued,
    Parsing,
    Running,
    Paused,
    Finalizing,
    Done,
    /// Terminal failure, including user and internal cancellation.
    Failed,
}

impl DispatchState {
    /// Position along the progress order; `None` for the failure state.
    fn progress_rank(self) -> Option<u8> {
        match self {
            Self::None => Some(0),
            Self::Queued => Some(1),
            Self::Parsing => Some(2),
            Self::Running => Some(3),
            Self::Paused => Some(4),
            Self::Finalizing => Some(5),
            Self::Done => Some(6),
            Self::Failed => None,
        }
    }

    /// True for states a job never leaves.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// True when a job in this state has reached or passed `target`.
    pub fn has_reached(self, target: DispatchState) -> bool {
        self >= target
    }

    /// Wire label, as reported in `dispatchState`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Queued => "QUEUED",
            Self::Parsing => "PARSING",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
            Self::Finalizing => "FINALIZING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }
}

impl PartialOrd for DispatchState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self.progress_rank(), other.progress_rank()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => None,
        }
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a dispatch-state label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDispatchState(pub String);

impl fmt::Display for UnknownDispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dispatch state '{}'", self.0)
    }
}

impl std::error::Error for UnknownDispatchState {}

impl FromStr for DispatchState {
    type Err = UnknownDispatchState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_uppercase();
        match label.as_str() {
            "" | "NONE" => Ok(Self::None),
            "QUEUED" => Ok(Self::Queued),
            "PARSING" => Ok(Self::Parsing),
            "RUNNING" => Ok(Self::Running),
            "PAUSED" => Ok(Self::Paused),
            "FINALIZING" => Ok(Self::Finalizing),
            "DONE" => Ok(Self::Done),
            "FAILED" | "QUIT" => Ok(Self::Failed),
            other if other.ends_with("_CANCEL") => Ok(Self::Failed),
            _ => Err(UnknownDispatchState(s.to_string())),
        }
    }
}

impl Serialize for DispatchState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DispatchState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Point-in-time view of a search job, as returned by `search/jobs/{sid}`.
///
/// Only accurate immediately after the fetch that produced it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobSnapshot {
    #[serde(default)]
    pub sid: String,
    #[serde(rename = "dispatchState", default)]
    pub dispatch_state: DispatchState,
    #[serde(
        rename = "doneProgress",
        default,
        deserialize_with = "crate::serde_helpers::f64_from_string_or_number"
    )]
    pub done_progress: f64,
    #[serde(
        rename = "isDone",
        default,
        deserialize_with = "crate::serde_helpers::bool_from_flag"
    )]
    pub is_done: bool,
    #[serde(
        rename = "isFailed",
        default,
        deserialize_with = "crate::serde_helpers::bool_from_flag"
    )]
    pub is_failed: bool,
    #[serde(
        rename = "isFinalized",
        default,
        deserialize_with = "crate::serde_helpers::bool_from_flag"
    )]
    pub is_finalized: bool,
    #[serde(
        rename = "isPaused",
        default,
        deserialize_with = "crate::serde_helpers::bool_from_flag"
    )]
    pub is_paused: bool,
    #[serde(
        rename = "eventCount",
        default,
        deserialize_with = "crate::serde_helpers::usize_from_string_or_number"
    )]
    pub event_count: usize,
    #[serde(
        rename = "resultCount",
        default,
        deserialize_with = "crate::serde_helpers::usize_from_string_or_number"
    )]
    pub result_count: usize,
    #[serde(
        rename = "scanCount",
        default,
        deserialize_with = "crate::serde_helpers::usize_from_string_or_number"
    )]
    pub scan_count: usize,
    #[serde(
        rename = "runDuration",
        default,
        deserialize_with = "crate::serde_helpers::f64_from_string_or_number"
    )]
    pub run_duration: f64,
    #[serde(
        default,
        deserialize_with = "crate::serde_helpers::opt_u64_from_string_or_number"
    )]
    pub ttl: Option<u64>,
    #[serde(default)]
    pub label: Option<String>,
    /// Raw `messages` block; Splunk sends either a list of `{type, text}` or a
    /// map keyed by severity.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub messages: serde_json::Value,
}

impl JobSnapshot {
    /// The state to act on: `isFailed` overrides whatever `dispatchState` says.
    pub fn state(&self) -> DispatchState {
        if self.is_failed {
            DispatchState::Failed
        } else {
            self.dispatch_state
        }
    }

    /// Texts of `FATAL` and `ERROR` messages, in server order.
    pub fn error_messages(&self) -> Vec<String> {
        const SEVERE: [&str; 2] = ["fatal", "error"];

        match &self.messages {
            serde_json::Value::Array(items) => items
                .iter()
                .filter(|m| {
                    m.get("type")
                        .and_then(|t| t.as_str())
                        .is_some_and(|t| SEVERE.contains(&t.to_ascii_lowercase().as_str()))
                })
                .filter_map(|m| m.get("text").and_then(|t| t.as_str()).map(str::to_string))
                .collect(),
            serde_json::Value::Object(map) => map
                .iter()
                .filter(|(severity, _)| SEVERE.contains(&severity.to_ascii_lowercase().as_str()))
                .flat_map(|(_, texts)| match texts {
                    serde_json::Value::Array(list) => list
                        .iter()
                        .filter_map(|t| t.as_str().map(str::to_string))
                        .collect::<Vec<_>>(),
                    serde_json::Value::String(s) => vec![s.clone()],
                    _ => Vec::new(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_states_are_ordered() {
        let ordered = [
            DispatchState::None,
            DispatchState::Queued,
            DispatchState::Parsing,
            DispatchState::Running,
            DispatchState::Paused,
            DispatchState::Finalizing,
            DispatchState::Done,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0] < pair[1], "{} should precede {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_failed_is_incomparable() {
        for state in [
            DispatchState::None,
            DispatchState::Queued,
            DispatchState::Running,
            DispatchState::Done,
        ] {
            assert_eq!(DispatchState::Failed.partial_cmp(&state), None);
            assert!(!DispatchState::Failed.has_reached(state));
            assert!(!state.has_reached(DispatchState::Failed));
        }
        assert!(DispatchState::Failed.has_reached(DispatchState::Failed));
    }

    #[test]
    fn test_has_reached_includes_later_states() {
        assert!(DispatchState::Running.has_reached(DispatchState::Running));
        assert!(DispatchState::Done.has_reached(DispatchState::Running));
        assert!(!DispatchState::Parsing.has_reached(DispatchState::Running));
    }

    #[test]
    fn test_terminal_states() {
        assert!(DispatchState::Done.is_terminal());
        assert!(DispatchState::Failed.is_terminal());
        assert!(!DispatchState::Finalizing.is_terminal());
        assert!(!DispatchState::Paused.is_terminal());
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("QUEUED".parse(), Ok(DispatchState::Queued));
        assert_eq!("running".parse(), Ok(DispatchState::Running));
        assert_eq!(" Done ".parse(), Ok(DispatchState::Done));
        assert_eq!("USER_CANCEL".parse(), Ok(DispatchState::Failed));
        assert_eq!("INTERNAL_CANCEL".parse(), Ok(DispatchState::Failed));
        assert_eq!("QUIT".parse(), Ok(DispatchState::Failed));
        assert!("SLEEPING".parse::<DispatchState>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for state in [
            DispatchState::Queued,
            DispatchState::Finalizing,
            DispatchState::Failed,
        ] {
            assert_eq!(state.to_string().parse(), Ok(state));
        }
    }

    #[test]
    fn test_deserialize_snapshot_with_string_numbers() {
        let json = r#"{
            "sid": "1700000000.42",
            "dispatchState": "RUNNING",
            "doneProgress": "0.4",
            "isDone": "0",
            "isFailed": false,
            "eventCount": "120",
            "resultCount": 10,
            "scanCount": "500",
            "runDuration": 1.25,
            "ttl": "600",
            "label": "nightly"
        }"#;
        let snapshot: JobSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.sid, "1700000000.42");
        assert_eq!(snapshot.state(), DispatchState::Running);
        assert_eq!(snapshot.done_progress, 0.4);
        assert!(!snapshot.is_done);
        assert_eq!(snapshot.event_count, 120);
        assert_eq!(snapshot.scan_count, 500);
        assert_eq!(snapshot.ttl, Some(600));
        assert_eq!(snapshot.label.as_deref(), Some("nightly"));
    }

    #[test]
    fn test_deserialize_snapshot_minimal() {
        let snapshot: JobSnapshot = serde_json::from_str(r#"{ "sid": "abc" }"#).unwrap();
        assert_eq!(snapshot.state(), DispatchState::None);
        assert_eq!(snapshot.result_count, 0);
        assert!(snapshot.messages.is_null());
    }

    #[test]
    fn test_is_failed_overrides_dispatch_state() {
        let snapshot: JobSnapshot =
            serde_json::from_str(r#"{ "sid": "abc", "dispatchState": "DONE", "isFailed": "1" }"#)
                .unwrap();
        assert_eq!(snapshot.state(), DispatchState::Failed);
    }

    #[test]
    fn test_error_messages_from_list() {
        let snapshot: JobSnapshot = serde_json::from_str(
            r#"{
                "sid": "abc",
                "messages": [
                    { "type": "FATAL", "text": "Unknown search command 'bogus'." },
                    { "type": "INFO", "text": "ignored" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(
            snapshot.error_messages(),
            vec!["Unknown search command 'bogus'.".to_string()]
        );
    }

    #[test]
    fn test_error_messages_from_map() {
        let snapshot: JobSnapshot = serde_json::from_str(
            r#"{ "sid": "abc", "messages": { "error": ["disk full"], "info": ["ok"] } }"#,
        )
        .unwrap();
        assert_eq!(snapshot.error_messages(), vec!["disk full".to_string()]);
    }
}

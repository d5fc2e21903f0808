//! Common types shared across Splunk API models.
//!
//! This module contains the Atom-style `entry` wrappers returned by collection
//! endpoints and the `messages` payload Splunk attaches to error responses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of message from Splunk API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MessageType {
    #[serde(rename = "FATAL", alias = "fatal")]
    Fatal,
    #[serde(rename = "ERROR", alias = "error")]
    Error,
    #[serde(rename = "WARN", alias = "warn")]
    Warn,
    #[serde(rename = "INFO", alias = "info")]
    Info,
    /// Unknown or unrecognized message type.
    #[serde(other)]
    #[default]
    Unknown,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fatal => write!(f, "FATAL"),
            Self::Error => write!(f, "ERROR"),
            Self::Warn => write!(f, "WARN"),
            Self::Info => write!(f, "INFO"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Generic Splunk REST API collection response.
#[derive(Debug, Deserialize, Clone)]
pub struct SplunkResponse<T> {
    #[serde(default = "Vec::new")]
    pub entry: Vec<Entry<T>>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

/// One `entry` of a collection response.
#[derive(Debug, Deserialize, Clone)]
pub struct Entry<T> {
    pub name: String,
    pub content: T,
    #[serde(default)]
    pub acl: Option<Acl>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Acl {
    pub app: String,
    pub owner: String,
}

/// Paging block of a collection response.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    #[serde(default)]
    pub total: usize,
    #[serde(rename = "perPage", default)]
    pub per_page: usize,
    #[serde(default)]
    pub offset: usize,
}

/// A single message from Splunk (usually in error responses).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SplunkMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub text: String,
}

/// A collection of messages from Splunk.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SplunkMessages {
    pub messages: Vec<SplunkMessage>,
}

impl SplunkMessages {
    /// Join all messages into one `TYPE: text; TYPE: text` line.
    pub fn summary(&self) -> String {
        self.messages
            .iter()
            .map(|msg| format!("{}: {}", msg.message_type, msg.text))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_deserialization() {
        assert_eq!(
            serde_json::from_str::<MessageType>("\"ERROR\"").unwrap(),
            MessageType::Error
        );
        assert_eq!(
            serde_json::from_str::<MessageType>("\"fatal\"").unwrap(),
            MessageType::Fatal
        );
        assert_eq!(
            serde_json::from_str::<MessageType>("\"invalid\"").unwrap(),
            MessageType::Unknown
        );
    }

    #[test]
    fn test_splunk_messages_summary() {
        let json = r#"{
            "messages": [
                { "type": "ERROR", "text": "Unknown sid." },
                { "type": "WARN", "text": "Second line" }
            ]
        }"#;
        let msgs: SplunkMessages = serde_json::from_str(json).unwrap();
        assert_eq!(msgs.summary(), "ERROR: Unknown sid.; WARN: Second line");
    }

    #[test]
    fn test_response_without_entries() {
        let resp: SplunkResponse<serde_json::Value> =
            serde_json::from_str(r#"{ "paging": { "total": 0, "perPage": 30, "offset": 0 } }"#)
                .unwrap();
        assert!(resp.entry.is_empty());
        assert_eq!(resp.paging.map(|p| p.per_page), Some(30));
    }
}

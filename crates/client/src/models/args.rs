//! Job creation arguments.
//!
//! Arguments are sent as an ordered form body. The base `search` argument
//! always comes first, then the typed options, then caller-supplied extras.
//! Repeated names are sent as-is; nothing is merged or overridden.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the server executes a submitted search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    /// Return the sid immediately and run asynchronously.
    #[default]
    Normal,
    /// Return the sid only after the search completes.
    Blocking,
    /// Run the search inline and stream results; no job is retained.
    Oneshot,
}

impl ExecMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ExecMode::Normal => "normal",
            ExecMode::Blocking => "blocking",
            ExecMode::Oneshot => "oneshot",
        }
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Normal,
    Realtime,
}

impl SearchMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Normal => "normal",
            SearchMode::Realtime => "realtime",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for creating a search job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobArgs {
    pub exec_mode: Option<ExecMode>,
    /// Earliest time bound (e.g., "-24h", "2024-01-01T00:00:00").
    pub earliest_time: Option<String>,
    /// Latest time bound (e.g., "now").
    pub latest_time: Option<String>,
    pub max_count: Option<u64>,
    /// Maximum run time in seconds; 0 means unlimited.
    pub max_time: Option<u64>,
    pub search_mode: Option<SearchMode>,
    pub status_buckets: Option<u32>,
    /// Seconds the job is retained after it finishes.
    pub ttl: Option<u64>,
    /// Caller-chosen sid.
    pub id: Option<String>,
    /// Additional raw arguments, appended after the typed options.
    #[serde(default)]
    pub extra: Vec<(String, String)>,
}

impl JobArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_mode(mut self, mode: ExecMode) -> Self {
        self.exec_mode = Some(mode);
        self
    }

    pub fn earliest_time(mut self, earliest: impl Into<String>) -> Self {
        self.earliest_time = Some(earliest.into());
        self
    }

    pub fn latest_time(mut self, latest: impl Into<String>) -> Self {
        self.latest_time = Some(latest.into());
        self
    }

    pub fn max_count(mut self, max_count: u64) -> Self {
        self.max_count = Some(max_count);
        self
    }

    pub fn ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Append a raw argument. Repeated names are preserved in order.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    /// True when the typed mode or any raw `exec_mode` argument asks for oneshot.
    pub fn is_oneshot(&self) -> bool {
        self.exec_mode == Some(ExecMode::Oneshot)
            || self.extra.iter().any(|(name, value)| {
                name.trim() == "exec_mode" && value.trim().eq_ignore_ascii_case("oneshot")
            })
    }

    /// Build the ordered form body for `search`.
    ///
    /// Blank time bounds are skipped. `output_mode=json` is always last.
    pub fn form_params(&self, search: &str) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![("search".to_string(), search.to_string())];

        let mut push = |name: &str, value: String| params.push((name.to_string(), value));

        if let Some(mode) = self.exec_mode {
            push("exec_mode", mode.to_string());
        }
        if let Some(earliest) = self.earliest_time.as_deref().filter(|s| !s.trim().is_empty()) {
            push("earliest_time", earliest.to_string());
        }
        if let Some(latest) = self.latest_time.as_deref().filter(|s| !s.trim().is_empty()) {
            push("latest_time", latest.to_string());
        }
        if let Some(max_count) = self.max_count {
            push("max_count", max_count.to_string());
        }
        if let Some(max_time) = self.max_time {
            push("max_time", max_time.to_string());
        }
        if let Some(mode) = self.search_mode {
            push("search_mode", mode.to_string());
        }
        if let Some(buckets) = self.status_buckets {
            push("status_buckets", buckets.to_string());
        }
        if let Some(ttl) = self.ttl {
            push("timeout", ttl.to_string());
        }
        if let Some(id) = &self.id {
            push("id", id.clone());
        }

        params.extend(self.extra.iter().cloned());
        params.push(("output_mode".to_string(), "json".to_string()));
        params
    }
}

//! Slice filters for collection listings.
//!
//! A [`SliceFilter`] is a plain request-parameter bundle. It maps one-to-one
//! onto the `count`, `offset`, `search`, `sort_dir` and `sort_key` query
//! parameters of a listing request.

use std::fmt;

use serde::{Deserialize, Serialize};
use splunk_dispatch_config::constants::{DEFAULT_JOB_SORT_KEY, DEFAULT_SLICE_COUNT};

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count/offset/search/sort criteria for one page of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceFilter {
    /// Maximum entries to return; 0 means unlimited.
    pub count: usize,
    /// Zero-based index of the first entry.
    pub offset: usize,
    /// Server-side filter expression over entry properties.
    pub search: Option<String>,
    pub sort_direction: SortDirection,
    pub sort_key: String,
}

impl Default for SliceFilter {
    fn default() -> Self {
        Self::with_sort_key(DEFAULT_JOB_SORT_KEY)
    }
}

impl SliceFilter {
    /// Default count, offset and direction with the given sort key.
    pub fn with_sort_key(sort_key: impl Into<String>) -> Self {
        Self {
            count: DEFAULT_SLICE_COUNT,
            offset: 0,
            search: None,
            sort_direction: SortDirection::default(),
            sort_key: sort_key.into(),
        }
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sort(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_key = key.into();
        self.sort_direction = direction;
        self
    }

    /// Reject values the server would silently misinterpret.
    pub fn validate(&self) -> Result<()> {
        if self.sort_key.trim().is_empty() {
            return Err(ClientError::Configuration(
                "sort key must not be empty".to_string(),
            ));
        }
        if self.search.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(ClientError::Configuration(
                "search filter must not be blank; omit it instead".to_string(),
            ));
        }
        Ok(())
    }

    /// Query parameters for a listing request, in a stable order.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("count", self.count.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params.push(("sort_dir", self.sort_direction.to_string()));
        params.push(("sort_key", self.sort_key.clone()));
        params.push(("output_mode", "json".to_string()));
        params
    }
}

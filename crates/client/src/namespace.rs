//! Owner/app addressing for REST paths.
//!
//! Splunk scopes most resources by namespace. The system namespace lives
//! under `/services/`; a user/app namespace lives under
//! `/servicesNS/{owner}/{app}/`. Either part may be the `-` wildcard.
//!
//! Invariants:
//! - Every dynamic path segment is percent-encoded, so identifiers cannot
//!   introduce extra segments, queries or fragments.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};

/// Wildcard accepted by Splunk for owner or app.
pub const WILDCARD: &str = "-";

/// Characters percent-encoded in a path segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'~')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'#')
    .add(b'+')
    .add(b',')
    .add(b';')
    .add(b'[')
    .add(b']');

/// Percent-encode a single path segment (sid, owner, app).
pub fn encode_path_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), PATH_SEGMENT_ENCODE_SET).to_string()
}

/// Resource namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Namespace {
    owner: Option<String>,
    app: Option<String>,
}

impl Namespace {
    /// The `/services/` namespace.
    pub fn system() -> Self {
        Self::default()
    }

    /// A `/servicesNS/{owner}/{app}/` namespace.
    pub fn user_app(owner: impl Into<String>, app: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            app: Some(app.into()),
        }
    }

    /// Build from optional parts; a missing part becomes the wildcard
    /// unless both are missing, which yields the system namespace.
    pub fn from_parts(owner: Option<&str>, app: Option<&str>) -> Self {
        match (owner, app) {
            (None, None) => Self::system(),
            (owner, app) => Self::user_app(owner.unwrap_or(WILDCARD), app.unwrap_or(WILDCARD)),
        }
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn app(&self) -> Option<&str> {
        self.app.as_deref()
    }

    pub fn is_system(&self) -> bool {
        self.owner.is_none() && self.app.is_none()
    }

    /// Path prefix without leading or trailing slash.
    fn prefix(&self) -> String {
        if self.is_system() {
            return "services".to_string();
        }
        format!(
            "servicesNS/{}/{}",
            encode_path_segment(self.owner.as_deref().unwrap_or(WILDCARD)),
            encode_path_segment(self.app.as_deref().unwrap_or(WILDCARD)),
        )
    }

    /// Absolute URL of `resource` (e.g. `search/jobs`) under `base_url`.
    ///
    /// `resource` is trusted; encode caller-supplied segments before joining.
    pub fn url(&self, base_url: &str, resource: &str) -> String {
        format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.prefix(),
            resource.trim_start_matches('/')
        )
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_namespace_url() {
        let ns = Namespace::system();
        assert_eq!(
            ns.url("https://localhost:8089", "search/jobs"),
            "https://localhost:8089/services/search/jobs"
        );
    }

    #[test]
    fn test_user_app_namespace_url() {
        let ns = Namespace::user_app("admin", "search");
        assert_eq!(
            ns.url("https://localhost:8089/", "/search/jobs"),
            "https://localhost:8089/servicesNS/admin/search/search/jobs"
        );
    }

    #[test]
    fn test_wildcards() {
        let ns = Namespace::from_parts(None, Some("search"));
        assert_eq!(ns.to_string(), "servicesNS/-/search");
        assert!(Namespace::from_parts(None, None).is_system());
    }

    #[test]
    fn test_segments_are_encoded() {
        let ns = Namespace::user_app("jane doe", "my/app");
        assert_eq!(ns.to_string(), "servicesNS/jane%20doe/my%2Fapp");
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("1700000000.42"), "1700000000.42");
        assert_eq!(
            encode_path_segment("scheduler__admin__search__RMD5"),
            "scheduler__admin__search__RMD5"
        );
        assert_eq!(encode_path_segment("a/../b"), "a%2F..%2Fb");
        assert_eq!(encode_path_segment("x?y#z"), "x%3Fy%23z");
        assert_eq!(encode_path_segment("50%"), "50%25");
    }
}

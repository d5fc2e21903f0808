//! Testing utilities for client tests.
//!
//! Available when running tests or when the `test-utils` feature is enabled.
//!
//! ```ignore
//! use splunk_dispatch_client::testing::load_fixture;
//!
//! let fixture = load_fixture("jobs/create_job_created.json");
//! ```

use std::path::Path;

use serde_json::{Value, json};

/// Load a JSON fixture file from the fixtures directory.
///
/// # Panics
/// - If the fixture file cannot be read
/// - If the file content is not valid JSON
pub fn load_fixture(fixture_path: &str) -> Value {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let full_path = manifest_dir.join("fixtures").join(fixture_path);
    let content = std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", full_path.display()));
    serde_json::from_str(&content).expect("Invalid JSON in fixture")
}

/// A `search/jobs/{sid}` response body in the given dispatch state.
pub fn job_status_body(sid: &str, dispatch_state: &str) -> Value {
    let done = dispatch_state.eq_ignore_ascii_case("DONE");
    let failed = dispatch_state.eq_ignore_ascii_case("FAILED");
    json!({
        "entry": [{
            "name": sid,
            "content": {
                "sid": sid,
                "dispatchState": dispatch_state,
                "doneProgress": if done { 1.0 } else { 0.0 },
                "isDone": if done || failed { "1" } else { "0" },
                "isFailed": failed,
                "eventCount": 0,
                "resultCount": 0,
                "scanCount": 0,
                "runDuration": 0.0
            }
        }]
    })
}

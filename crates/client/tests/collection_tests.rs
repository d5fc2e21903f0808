//! Collection slice tests.
//!
//! # Invariants
//! - The default filter requests count=30, offset=0, sort_dir=desc, sort_key=dispatch_time
//! - count=0 is sent verbatim and means unlimited
//! - Each fetch replaces the page; nothing is merged
//! - Invalid filters are rejected before any request

mod common;

use common::*;
use splunk_dispatch_client::{JobCollection, SortDirection};
use wiremock::matchers::{method, path, query_param};

#[tokio::test]
async fn test_fetch_slice_default_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs"))
        .and(query_param("count", "30"))
        .and(query_param("offset", "0"))
        .and(query_param("sort_dir", "desc"))
        .and(query_param("sort_key", "dispatch_time"))
        .and(query_param("output_mode", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("jobs/list_jobs.json")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut jobs = client.jobs();
    let page = jobs
        .fetch_slice(&JobCollection::default_filter())
        .await
        .unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].sid, "1700000100.2");
    assert_eq!(page[0].state(), DispatchState::Done);
    assert_eq!(page[0].scan_count, 250);
    assert_eq!(page[1].state(), DispatchState::Running);
    assert_eq!(page[1].event_count, 1200);
    assert_eq!(page[1].done_progress, 0.35);
}

#[tokio::test]
async fn test_fetch_slice_zero_count_means_unlimited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs"))
        .and(query_param("count", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("jobs/list_jobs.json")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut jobs = client.jobs();
    jobs.fetch_slice(&SliceFilter::default().count(0))
        .await
        .unwrap();
    assert_eq!(jobs.snapshots().len(), 2);
}

#[tokio::test]
async fn test_fetch_slice_search_and_sort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs"))
        .and(query_param("offset", "30"))
        .and(query_param("search", "isDone=1"))
        .and(query_param("sort_dir", "asc"))
        .and(query_param("sort_key", "runDuration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("jobs/list_jobs.json")))
        .expect(1)
        .mount(&server)
        .await;

    let filter = SliceFilter::default()
        .offset(30)
        .search("isDone=1")
        .sort("runDuration", SortDirection::Asc);
    let client = test_client(&server);
    let mut jobs = client.jobs();
    jobs.fetch_slice(&filter).await.unwrap();
}

#[tokio::test]
async fn test_fetch_slice_replaces_previous_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("jobs/list_jobs.json")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "paging": { "total": 2, "perPage": 30, "offset": 30 },
            "entry": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut jobs = client.jobs();
    jobs.fetch_slice(&SliceFilter::default()).await.unwrap();
    assert_eq!(jobs.snapshots().len(), 2);

    jobs.fetch_slice(&SliceFilter::default().offset(30))
        .await
        .unwrap();
    assert!(jobs.snapshots().is_empty());
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("jobs/list_jobs.json")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut jobs = client.jobs();
    jobs.fetch_slice(&SliceFilter::default()).await.unwrap();

    let err = jobs.fetch_slice(&SliceFilter::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
    assert_eq!(jobs.snapshots().len(), 2);
}

#[tokio::test]
async fn test_invalid_filter_is_rejected_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut jobs = client.jobs();
    let err = jobs
        .fetch_slice(&SliceFilter::with_sort_key(""))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_listed_snapshots_become_job_handles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/search/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("jobs/list_jobs.json")))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut jobs = client.jobs();
    jobs.fetch_slice(&SliceFilter::default()).await.unwrap();

    let handles = jobs.jobs();
    assert_eq!(handles.len(), 2);
    assert_eq!(handles[1].sid(), "1700000050.1");
    assert_eq!(handles[1].state(), DispatchState::Running);
}

#[tokio::test]
async fn test_generic_collection_lists_other_resources() {
    #[derive(Debug, serde::Deserialize)]
    struct SavedSearch {
        search: String,
    }

    impl splunk_dispatch_client::Resource for SavedSearch {
        const PATH: &'static str = "saved/searches";
        const DEFAULT_SORT_KEY: &'static str = "name";
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servicesNS/-/search/saved/searches"))
        .and(query_param("sort_key", "name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entry": [ { "name": "errors", "content": { "search": "index=main error" } } ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut saved = client.collection::<SavedSearch>(Namespace::from_parts(None, Some("search")));
    saved
        .fetch_slice(&<SavedSearch as splunk_dispatch_client::Resource>::default_filter())
        .await
        .unwrap();
    assert_eq!(saved.items()[0].search, "index=main error");
}

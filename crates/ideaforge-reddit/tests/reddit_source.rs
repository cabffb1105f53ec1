//! Integration tests for `RedditClient` and `RedditSource`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made. Covers the OAuth token exchange and its
//! caching, the hot-listing field mapping, per-channel failure isolation,
//! and the fixture fallback when live retrieval yields nothing.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ideaforge_reddit::{RedditClient, RedditSource};

/// Builds a `RedditClient` pointed at the mock server for both the token
/// exchange and the listing API.
fn test_client(server: &MockServer) -> RedditClient {
    RedditClient::with_base_urls(
        "test-id",
        "test-secret",
        "ideaforge-test/0.1",
        5,
        &server.uri(),
        &server.uri(),
    )
    .expect("failed to build test RedditClient")
}

/// Standard successful token-exchange response body.
fn token_json() -> serde_json::Value {
    json!({
        "access_token": "test-token",
        "token_type": "bearer",
        "expires_in": 3600,
        "scope": "*"
    })
}

/// One complete post payload as Reddit nests it under `children[].data`.
fn post_json(id: &str, subreddit: &str, title: &str, ups: i64) -> serde_json::Value {
    json!({
        "id": id,
        "subreddit": subreddit,
        "title": title,
        "selftext": "post body text",
        "ups": ups,
        "num_comments": 4,
        "created_utc": 1_700_000_000.0
    })
}

fn listing_json(posts: Vec<serde_json::Value>) -> serde_json::Value {
    let children: Vec<serde_json::Value> = posts
        .into_iter()
        .map(|data| json!({"kind": "t3", "data": data}))
        .collect();
    json!({"kind": "Listing", "data": {"children": children, "after": null}})
}

async fn mount_token_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&token_json()))
        .mount(server)
        .await;
}

/// Writes a one-record fixture file into `dir` with a distinctive title so
/// tests can tell fixture data from live data.
fn write_fixture(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("reddit-fixture.json");
    let contents = json!([{
        "id": "fx1",
        "subreddit": "startups",
        "title": "FIXTURE ONLY",
        "body": "canned post",
        "upvotes": 42,
        "num_comments": 7,
        "created_utc": 1_690_000_000.0
    }]);
    let mut file = std::fs::File::create(&path).expect("create fixture");
    file.write_all(contents.to_string().as_bytes())
        .expect("write fixture");
    path
}

// ---------------------------------------------------------------------------
// Test 1 – hot listing happy path and field mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_hot_maps_listing_fields_into_signals() {
    let server = MockServer::start().await;
    mount_token_success(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/startups/hot.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&listing_json(vec![post_json("p1", "startups", "Pain", 17)])),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.fetch_hot("startups", 25).await;

    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let signals = result.unwrap();
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].id, "p1");
    assert_eq!(signals[0].body, "post body text", "selftext maps to body");
    assert_eq!(signals[0].upvotes, 17, "ups maps to upvotes");
    assert_eq!(signals[0].num_comments, 4);
}

// ---------------------------------------------------------------------------
// Test 2 – leading r/ prefix is stripped before building the listing URL
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_hot_accepts_channel_name_with_r_prefix() {
    let server = MockServer::start().await;
    mount_token_success(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/SaaS/hot.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&listing_json(vec![post_json("p2", "SaaS", "T", 3)])),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.fetch_hot("r/SaaS", 25).await;

    assert!(result.is_ok(), "expected Ok for r/-prefixed name, got: {result:?}");
    assert_eq!(result.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test 3 – malformed posts drop individually, rest of the listing survives
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_hot_drops_malformed_posts_individually() {
    let server = MockServer::start().await;
    mount_token_success(&server).await;

    let incomplete = json!({"id": "p-broken", "subreddit": "startups"});
    Mock::given(method("GET"))
        .and(path("/r/startups/hot.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&listing_json(vec![
            post_json("p1", "startups", "Keep me", 5),
            incomplete,
            post_json("p3", "startups", "Keep me too", 8),
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let signals = client.fetch_hot("startups", 25).await.expect("fetch_hot");

    assert_eq!(signals.len(), 2, "incomplete post should drop, not fail the batch");
    assert_eq!(signals[0].id, "p1");
    assert_eq!(signals[1].id, "p3");
}

// ---------------------------------------------------------------------------
// Test 4 – token is cached: two listings, one token exchange
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_fetch_within_expiry_reuses_cached_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&token_json()))
        .expect(1) // the whole test must perform exactly one exchange
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/startups/hot.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&listing_json(vec![post_json("p1", "startups", "T", 1)])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.fetch_hot("startups", 25).await.expect("first fetch");
    client.fetch_hot("startups", 25).await.expect("second fetch");
}

// ---------------------------------------------------------------------------
// Test 5 – non-success listing status surfaces as an error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_hot_propagates_listing_failure() {
    let server = MockServer::start().await;
    mount_token_success(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/startups/hot.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client.fetch_hot("startups", 25).await;

    assert!(result.is_err(), "expected Err for 503 listing, got: {result:?}");
}

// ---------------------------------------------------------------------------
// Test 6 – channel failures are isolated; survivors suppress the fixture
// ---------------------------------------------------------------------------

#[tokio::test]
async fn surviving_channel_signals_are_returned_without_fixture_fallback() {
    let server = MockServer::start().await;
    mount_token_success(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/alpha/hot.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/beta/hot.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/gamma/hot.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&listing_json(vec![
            post_json("g1", "gamma", "Live one", 9),
            post_json("g2", "gamma", "Live two", 3),
        ])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let fixture_path = write_fixture(&dir);

    let source = RedditSource::new(
        Some(test_client(&server)),
        vec!["alpha".into(), "beta".into(), "gamma".into()],
        25,
        fixture_path,
        Duration::ZERO,
    );

    let signals = source.fetch().await;
    assert_eq!(signals.len(), 2, "only the surviving channel contributes");
    assert!(
        signals.iter().all(|s| s.title != "FIXTURE ONLY"),
        "fixture must not kick in while live data exists"
    );
}

// ---------------------------------------------------------------------------
// Test 7 – every channel fails: fixture fallback serves the batch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn all_channels_failing_falls_back_to_fixture() {
    let server = MockServer::start().await;
    mount_token_success(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/alpha/hot.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/beta/hot.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let fixture_path = write_fixture(&dir);

    let source = RedditSource::new(
        Some(test_client(&server)),
        vec!["alpha".into(), "beta".into()],
        25,
        fixture_path,
        Duration::ZERO,
    );

    let signals = source.fetch().await;
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].title, "FIXTURE ONLY");
}

// ---------------------------------------------------------------------------
// Test 8 – token exchange failure also degrades to the fixture
// ---------------------------------------------------------------------------

#[tokio::test]
async fn token_exchange_failure_falls_back_to_fixture() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let fixture_path = write_fixture(&dir);

    let source = RedditSource::new(
        Some(test_client(&server)),
        vec!["alpha".into()],
        25,
        fixture_path,
        Duration::ZERO,
    );

    let signals = source.fetch().await;
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].title, "FIXTURE ONLY");
}

// ---------------------------------------------------------------------------
// Test 9 – no credentials configured: fixture served without any HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn absent_credentials_serve_fixture_directly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fixture_path = write_fixture(&dir);

    let source = RedditSource::new(
        None,
        vec!["startups".into()],
        25,
        fixture_path,
        Duration::ZERO,
    );

    let signals = source.fetch().await;
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].title, "FIXTURE ONLY");
}

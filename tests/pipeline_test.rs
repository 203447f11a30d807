//! Integration tests for the full report pipeline.

mod common;

use std::sync::atomic::Ordering;

use bsky_post_reporter::config::Config;
use bsky_post_reporter::report::CSV_COLUMNS;
use bsky_post_reporter::{
    build_user_report, generate_report, BlueskyClient, FetchErrorKind, OutputFormat, Report,
    ReportError, ReportRow,
};
use common::{feed_page_json, profile_json, StubFeed};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_invalid_actor_fails_before_any_call() {
    let stub = StubFeed::uniform(2, 10);

    let err = generate_report(&stub, "", 10, OutputFormat::Json)
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::InvalidActor { .. }));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(stub.total_calls(), 0);
}

#[tokio::test]
async fn test_empty_feed_is_not_an_error() {
    let stub = StubFeed::new(vec![]);

    let user_report = build_user_report(&stub, "alice", 50).await.unwrap();

    assert_eq!(user_report.report.post_count(), 0);
    assert!(user_report.report.posts().is_empty());
    assert_eq!(user_report.report.did(), "did:plc:testuser");
    assert_eq!(stub.profile_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_post_count_never_exceeds_limit() {
    let stub = StubFeed::uniform(5, 30);

    for limit in [1, 29, 30, 31, 149, 150, 151] {
        let user_report = build_user_report(&stub, "alice.bsky.social", limit)
            .await
            .unwrap();
        let expected = limit.min(150);
        assert_eq!(user_report.report.post_count(), expected, "limit {limit}");
        assert_eq!(user_report.report.posts().len(), expected, "limit {limit}");
    }
}

#[tokio::test]
async fn test_json_report_round_trips() {
    let stub = StubFeed::uniform(1, 3);

    let bytes = generate_report(&stub, "@alice.bsky.social", 10, OutputFormat::Json)
        .await
        .unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let report: Report = serde_json::from_str(&text).expect("report JSON should parse back");

    assert!(text.ends_with('\n'));
    assert_eq!(report.handle(), "alice.bsky.social");
    assert_eq!(report.post_count(), 3);

    let first = &report.posts()[0];
    assert_eq!(first.post_date, "2024-01-01 00:00:00 UTC");
    assert_eq!(first.first_line, "post 0");
    assert_eq!(first.post_url, "https://bsky.app/profile/alice.bsky.social/post/p0");
    assert_eq!(first.reposts, 0);
    assert_eq!(first.replies, 1);
}

#[tokio::test]
async fn test_csv_report_reads_back() {
    let stub = StubFeed::uniform(1, 4);

    let bytes = generate_report(&stub, "alice.bsky.social", 10, OutputFormat::Csv)
        .await
        .unwrap();

    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(headers, CSV_COLUMNS);

    let rows: Vec<ReportRow> = reader.deserialize().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3].likes, 3);
    assert_eq!(rows[3].uri, "at://did:plc:testuser/app.bsky.feed.post/p3");
}

#[tokio::test]
async fn test_profile_failure_skips_feed() {
    let mut stub = StubFeed::uniform(1, 5);
    stub.profile_error = Some(429);

    let err = build_user_report(&stub, "alice.bsky.social", 10)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReportError::Fetch {
            kind: FetchErrorKind::RateLimited,
            ..
        }
    ));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(stub.feed_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_end_to_end_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.actor.getProfile"))
        .and(query_param("actor", "alice.bsky.social"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("alice.bsky.social")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.feed.getAuthorFeed"))
        .and(query_param("actor", "did:plc:testuser"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_page_json(0, 5, Some("next"))))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        api_base: format!("{}/xrpc", server.uri()),
        ..Config::for_testing()
    };
    let client = BlueskyClient::new(&config).unwrap();

    let user_report = build_user_report(&client, "alice", 5).await.unwrap();

    assert_eq!(user_report.profile.display_name.as_deref(), Some("Test User"));
    assert_eq!(user_report.profile.followers_count, Some(10));
    assert_eq!(user_report.report.post_count(), 5);
    assert_eq!(user_report.report.posts()[4].likes, 4);
}

#[tokio::test]
async fn test_unknown_actor_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.actor.getProfile"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "InvalidRequest",
            "message": "Profile not found"
        })))
        .mount(&server)
        .await;

    let config = Config {
        api_base: format!("{}/xrpc", server.uri()),
        ..Config::for_testing()
    };
    let client = BlueskyClient::new(&config).unwrap();

    let err = build_user_report(&client, "nobody.bsky.social", 5)
        .await
        .unwrap_err();

    assert_eq!(err.http_status(), 404);
    assert!(err.to_string().contains("Profile not found"), "{err}");
}

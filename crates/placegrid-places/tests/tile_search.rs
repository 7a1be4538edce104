//! Integration tests for tile pagination using wiremock HTTP mocks.

use std::time::{Duration, Instant};

use placegrid_core::{LatLng, SweepDelays, SweepLimits};
use placegrid_places::{NearbyQuery, PlacesClient, PlacesError, RequestGate, TileSearch};
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NEARBY_PATH: &str = "/place/nearbysearch/json";

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 5, "placegrid-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn query() -> NearbyQuery {
    NearbyQuery {
        radius_m: 1500,
        category: "cafe".to_owned(),
        language: "zh-TW".to_owned(),
    }
}

fn page(ids: &[&str], next: Option<&str>) -> serde_json::Value {
    let results: Vec<_> = ids
        .iter()
        .map(|id| json!({"place_id": id, "name": format!("Cafe {id}"), "vicinity": "Somewhere"}))
        .collect();
    let mut body = json!({"status": "OK", "results": results});
    if let Some(token) = next {
        body["next_page_token"] = json!(token);
    }
    body
}

async fn run_tile(
    server: &MockServer,
    limits: SweepLimits,
) -> Result<Vec<placegrid_places::LightweightPlace>, PlacesError> {
    run_tile_with_delays(server, limits, SweepDelays::none()).await
}

async fn run_tile_with_delays(
    server: &MockServer,
    limits: SweepLimits,
    delays: SweepDelays,
) -> Result<Vec<placegrid_places::LightweightPlace>, PlacesError> {
    let client = test_client(&server.uri());
    let gate = RequestGate::new(1);
    let query = query();
    let search = TileSearch {
        client: &client,
        gate: &gate,
        query: &query,
        delays: &delays,
        limits: &limits,
    };
    search.run(1, LatLng::new(24.0, 120.5)).await
}

#[tokio::test]
async fn single_page_sends_expected_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("key", "test-key"))
        .and(query_param("location", "24,120.5"))
        .and(query_param("radius", "1500"))
        .and(query_param("type", "cafe"))
        .and(query_param("language", "zh-TW"))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["A", "B"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let places = run_tile(&server, SweepLimits::default()).await.unwrap();
    let ids: Vec<_> = places.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(ids, ["A", "B"]);
}

#[tokio::test]
async fn zero_results_yields_empty_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .mount(&server)
        .await;

    let places = run_tile(&server, SweepLimits::default()).await.unwrap();
    assert!(places.is_empty());
}

#[tokio::test]
async fn follows_continuation_tokens_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["A"], Some("tok-2"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["B"], Some("tok-3"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["C"], None)))
        .mount(&server)
        .await;

    let places = run_tile(&server, SweepLimits::default()).await.unwrap();
    let ids: Vec<_> = places.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(ids, ["A", "B", "C"]);
}

#[tokio::test]
async fn stops_at_page_cap_even_with_token_left() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["A"], Some("tok-2"))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["B"], Some("tok-3"))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["C"], None)))
        .expect(0)
        .mount(&server)
        .await;

    let limits = SweepLimits {
        max_pages: 2,
        ..SweepLimits::default()
    };
    let places = run_tile(&server, limits).await.unwrap();
    assert_eq!(places.len(), 2);
}

#[tokio::test]
async fn default_cap_is_three_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["X"], Some("again"))))
        .expect(3)
        .mount(&server)
        .await;

    let places = run_tile(&server, SweepLimits::default()).await.unwrap();
    assert_eq!(places.len(), 3);
}

#[tokio::test]
async fn retries_same_page_while_token_not_ready() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["A"], Some("tok-2"))))
        .mount(&server)
        .await;
    // Not ready twice, then valid.
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "INVALID_REQUEST", "results": []})),
        )
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["B"], None)))
        .expect(1)
        .mount(&server)
        .await;

    let places = run_tile(&server, SweepLimits::default()).await.unwrap();
    let ids: Vec<_> = places.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(ids, ["A", "B"]);
}

#[tokio::test]
async fn token_that_never_becomes_ready_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["A"], Some("tok-2"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "INVALID_REQUEST", "results": []})),
        )
        .expect(4)
        .mount(&server)
        .await;

    let limits = SweepLimits {
        max_token_retries: 3,
        ..SweepLimits::default()
    };
    let err = run_tile(&server, limits).await.unwrap_err();
    assert!(
        matches!(err, PlacesError::TokenNeverReady { attempts: 3, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn invalid_request_without_token_is_a_search_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"status": "INVALID_REQUEST", "results": [], "error_message": "bad location"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let err = run_tile(&server, SweepLimits::default()).await.unwrap_err();
    assert!(
        matches!(err, PlacesError::SearchFailure { ref status, ref message, .. }
            if status == "INVALID_REQUEST" && message == "bad location"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn quota_status_is_fatal_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "OVER_QUERY_LIMIT", "results": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = run_tile(&server, SweepLimits::default()).await.unwrap_err();
    assert!(
        matches!(err, PlacesError::SearchFailure { ref status, .. } if status == "OVER_QUERY_LIMIT"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn http_error_status_surfaces_without_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = run_tile(&server, SweepLimits::default()).await.unwrap_err();
    match err {
        PlacesError::UnexpectedStatus { status, url } => {
            assert_eq!(status, 403);
            assert!(!url.contains("test-key"), "api key leaked into {url}");
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = run_tile(&server, SweepLimits::default()).await.unwrap_err();
    assert!(matches!(err, PlacesError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn transport_error_does_not_leak_api_key() {
    // Nothing listens on port 1.
    let client = PlacesClient::with_base_url(
        "SECRET-KEY-123",
        5,
        "placegrid-test/0.1",
        "http://127.0.0.1:1",
    )
    .expect("client construction should not fail");

    let err = client
        .nearby_search(&query(), LatLng::new(0.0, 0.0), None)
        .await
        .unwrap_err();

    assert!(matches!(err, PlacesError::Http(_)), "got {err:?}");
    let shown = format!("{err} / {err:?}");
    assert!(!shown.contains("SECRET-KEY-123"), "api key leaked into {shown}");
}

fn delays(token_ready_ms: u64, not_ready_ms: u64, after_page_ms: u64) -> SweepDelays {
    SweepDelays {
        token_ready: Duration::from_millis(token_ready_ms),
        not_ready: Duration::from_millis(not_ready_ms),
        after_page: Duration::from_millis(after_page_ms),
        ..SweepDelays::none()
    }
}

#[tokio::test]
async fn waits_for_token_and_after_every_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["A"], Some("tok-2"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["B"], None)))
        .mount(&server)
        .await;

    let started = Instant::now();
    let places = run_tile_with_delays(&server, SweepLimits::default(), delays(80, 0, 40))
        .await
        .unwrap();

    assert_eq!(places.len(), 2);
    // page 1, token wait, page 2
    assert!(
        started.elapsed() >= Duration::from_millis(40 + 80 + 40),
        "elapsed {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn failing_page_still_serves_page_delay() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "REQUEST_DENIED", "results": []})),
        )
        .mount(&server)
        .await;

    let started = Instant::now();
    let err = run_tile_with_delays(&server, SweepLimits::default(), delays(0, 0, 60))
        .await
        .unwrap_err();

    assert!(matches!(err, PlacesError::SearchFailure { .. }), "got {err:?}");
    assert!(started.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn not_ready_token_waits_before_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param_is_missing("pagetoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["A"], Some("tok-2"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "INVALID_REQUEST", "results": []})),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(NEARBY_PATH))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["B"], None)))
        .mount(&server)
        .await;

    let started = Instant::now();
    let places = run_tile_with_delays(&server, SweepLimits::default(), delays(0, 70, 0))
        .await
        .unwrap();

    assert_eq!(places.len(), 2);
    assert!(started.elapsed() >= Duration::from_millis(70));
}

//! Integration tests for the maps client and its cache (wiremock-based).

use departure_server::cache::{CacheConfig, CachedMapsClient};
use departure_server::domain::{DepartureTime, LatLng, OracleStatus, Place, RouteQuery};
use departure_server::maps::{MapsClient, MapsConfig, MapsError, Steps};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> MapsClient {
    MapsClient::new(
        MapsConfig::new("test-key")
            .with_base_url(server.uri())
            .with_timeout(2),
    )
    .unwrap()
}

fn route() -> RouteQuery {
    RouteQuery::new(
        Place::Address("MG Road, Bengaluru".into()),
        Place::Coordinates(LatLng::new(13.1986, 77.7066).unwrap()),
    )
}

fn matrix_json(duration: i64, traffic: Option<i64>) -> String {
    let traffic = traffic
        .map(|t| format!(r#", "duration_in_traffic": {{ "text": "{} mins", "value": {t} }}"#, t / 60))
        .unwrap_or_default();
    format!(
        r#"{{
            "status": "OK",
            "origin_addresses": ["MG Road, Bengaluru"],
            "destination_addresses": ["Kempegowda International Airport"],
            "rows": [{{ "elements": [{{
                "status": "OK",
                "distance": {{ "text": "35.2 km", "value": 35200 }},
                "duration": {{ "text": "{} mins", "value": {duration} }}
                {traffic}
            }}]}}]
        }}"#,
        duration / 60
    )
}

const fn directions_json() -> &'static str {
    r#"{
        "status": "OK",
        "routes": [{
            "summary": "NH 44",
            "legs": [{
                "distance": { "text": "35.2 km", "value": 35200 },
                "duration": { "text": "50 mins", "value": 3000 },
                "duration_in_traffic": { "text": "1 hour 5 mins", "value": 3900 },
                "steps": [
                    { "html_instructions": "Head <b>north</b> on MG Rd" },
                    { "html_instructions": "Merge onto <b>NH 44</b>" }
                ]
            }]
        }]
    }"#
}

#[tokio::test]
async fn estimate_prefers_traffic_and_sends_expected_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .and(query_param("origins", "MG Road, Bengaluru"))
        .and(query_param("destinations", "13.1986,77.7066"))
        .and(query_param("departure_time", "1714540200"))
        .and(query_param("traffic_model", "best_guess"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(matrix_json(3000, Some(3900))))
        .expect(1)
        .mount(&server)
        .await;

    let estimate = client_for(&server)
        .estimate(&route(), DepartureTime::At(1_714_540_200))
        .await
        .unwrap();

    assert_eq!(estimate.duration_secs, 3900);
    assert!(estimate.traffic_adjusted);
    assert_eq!(estimate.distance_text.as_deref(), Some("35.2 km"));
}

#[tokio::test]
async fn estimate_without_traffic_uses_baseline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(matrix_json(3000, None)))
        .mount(&server)
        .await;

    let estimate = client_for(&server)
        .estimate(&route(), DepartureTime::Now)
        .await
        .unwrap();

    assert_eq!(estimate.duration_secs, 3000);
    assert!(!estimate.traffic_adjusted);
}

#[tokio::test]
async fn element_error_is_distinct_from_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{ "status": "OK", "rows": [{ "elements": [{ "status": "ZERO_RESULTS" }] }] }"#,
        ))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .estimate(&route(), DepartureTime::Now)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MapsError::Element {
            status: OracleStatus::ZeroResults
        }
    ));
}

#[tokio::test]
async fn top_level_status_error_carries_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{ "status": "REQUEST_DENIED", "error_message": "The provided API key is invalid.", "rows": [] }"#,
        ))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .estimate(&route(), DepartureTime::Now)
        .await
        .unwrap_err();

    match err {
        MapsError::Status { status, message } => {
            assert_eq!(status, OracleStatus::RequestDenied);
            assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn http_error_status_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .estimate(&route(), DepartureTime::Now)
        .await
        .unwrap_err();

    match err {
        MapsError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream down");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn garbage_body_is_json_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .estimate(&route(), DepartureTime::Now)
        .await
        .unwrap_err();

    match err {
        MapsError::Json { body, .. } => assert_eq!(body.as_deref(), Some("<html>oops</html>")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn slow_response_times_out_as_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(matrix_json(600, None))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = MapsClient::new(
        MapsConfig::new("test-key")
            .with_base_url(server.uri())
            .with_timeout(1),
    )
    .unwrap();

    let err = client
        .estimate(&route(), DepartureTime::Now)
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err}");
}

#[tokio::test]
async fn summarize_collects_steps() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/directions/json"))
        .and(query_param("origin", "MG Road, Bengaluru"))
        .and(query_param("destination", "13.1986,77.7066"))
        .and(query_param("departure_time", "now"))
        .respond_with(ResponseTemplate::new(200).set_body_string(directions_json()))
        .mount(&server)
        .await;

    let summary = client_for(&server)
        .summarize(&route(), Some(DepartureTime::Now))
        .await
        .unwrap();

    assert_eq!(summary.summary, "NH 44");
    assert_eq!(summary.distance_text, "35.2 km");
    assert_eq!(summary.duration_text, "50 mins");
    assert_eq!(summary.duration_in_traffic_text, "1 hour 5 mins");
    assert_eq!(
        summary.steps,
        Steps::Parsed(vec![
            "Head <b>north</b> on MG Rd".to_string(),
            "Merge onto <b>NH 44</b>".to_string(),
        ])
    );
}

#[tokio::test]
async fn cache_deduplicates_identical_departures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .and(query_param("departure_time", "1714540200"))
        .respond_with(ResponseTemplate::new(200).set_body_string(matrix_json(1200, Some(1500))))
        .expect(1)
        .mount(&server)
        .await;

    let cached = CachedMapsClient::new(client_for(&server), &CacheConfig::default());
    let departure = DepartureTime::At(1_714_540_200);

    let first = cached.estimate(&route(), departure).await.unwrap();
    let second = cached.estimate(&route(), departure).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cached.cache_entry_count().await, 1);
    // MockServer verifies `expect(1)` on drop
}

#[tokio::test]
async fn cache_skips_now_and_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .and(query_param("departure_time", "now"))
        .respond_with(ResponseTemplate::new(200).set_body_string(matrix_json(1200, None)))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .and(query_param("departure_time", "1714540200"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{ "status": "OK", "rows": [{ "elements": [{ "status": "NOT_FOUND" }] }] }"#,
        ))
        .expect(2)
        .mount(&server)
        .await;

    let cached = CachedMapsClient::new(client_for(&server), &CacheConfig::default());

    for _ in 0..2 {
        cached.estimate(&route(), DepartureTime::Now).await.unwrap();
        assert!(
            cached
                .estimate(&route(), DepartureTime::At(1_714_540_200))
                .await
                .is_err()
        );
    }

    assert_eq!(cached.cache_entry_count().await, 0);
}

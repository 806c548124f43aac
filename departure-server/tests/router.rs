//! End-to-end tests for the HTTP router against a mocked maps service.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use departure_server::cache::{CacheConfig, CachedMapsClient};
use departure_server::maps::{MapsClient, MapsConfig};
use departure_server::planner::SearchConfig;
use departure_server::web::{AppState, NO_DEPARTURE_MESSAGE, create_router};

fn app_for(server: &MockServer) -> Router {
    let client = MapsClient::new(
        MapsConfig::new("test-key")
            .with_base_url(server.uri())
            .with_timeout(2),
    )
    .unwrap();
    let maps = CachedMapsClient::new(client, &CacheConfig::default());
    create_router(AppState::new(maps, SearchConfig::default()))
}

async fn mount_matrix(server: &MockServer, duration_secs: i64) {
    let body = json!({
        "status": "OK",
        "rows": [{ "elements": [{
            "status": "OK",
            "distance": { "text": "12.4 km", "value": 12400 },
            "duration": { "text": "18 mins", "value": 1080 },
            "duration_in_traffic": { "text": format!("{} mins", duration_secs / 60), "value": duration_secs }
        }]}]
    });
    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn directions_body() -> Value {
    json!({
        "status": "OK",
        "routes": [{
            "summary": "Old Airport Rd",
            "legs": [{
                "distance": { "text": "12.4 km", "value": 12400 },
                "duration": { "text": "18 mins", "value": 1080 },
                "duration_in_traffic": { "text": "20 mins", "value": 1200 },
                "steps": [{ "html_instructions": "Head <b>east</b>" }]
            }]
        }]
    })
}

async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_and_status() {
    let server = MockServer::start().await;

    let response = app_for(&server)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app_for(&server)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn route_reports_current_conditions() {
    let server = MockServer::start().await;
    mount_matrix(&server, 1320).await;
    Mock::given(method("GET"))
        .and(path("/directions/json"))
        .and(query_param("departure_time", "now"))
        .respond_with(ResponseTemplate::new(200).set_body_json(directions_body()))
        .mount(&server)
        .await;

    let (status, json) = post_json(
        app_for(&server),
        "/route",
        r#"{ "origin": "Indiranagar", "destination": "Whitefield" }"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["origin"], "Indiranagar");
    assert_eq!(json["distance"], "12.4 km");
    assert_eq!(json["duration"], "18 mins");
    assert_eq!(json["duration_in_traffic"], "22 mins");
    assert_eq!(json["suggested_departure"], "Now (real-time estimate)");
    assert_eq!(json["summary"], "Old Airport Rd");
    assert_eq!(json["steps"], json!(["Head <b>east</b>"]));
}

#[tokio::test]
async fn get_route_alias_matches_route() {
    let server = MockServer::start().await;
    mount_matrix(&server, 1320).await;
    Mock::given(method("GET"))
        .and(path("/directions/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(directions_body()))
        .mount(&server)
        .await;

    let (status, json) = post_json(
        app_for(&server),
        "/get_route",
        r#"{ "origin_coords": { "lat": 12.97, "lng": 77.64 }, "destination": "Whitefield" }"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"], "Old Airport Rd");
}

#[tokio::test]
async fn route_without_destination_is_bad_request() {
    let server = MockServer::start().await;

    let (status, json) = post_json(app_for(&server), "/route", r#"{ "origin": "Indiranagar" }"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn predict_returns_latest_safe_departure() {
    let server = MockServer::start().await;
    mount_matrix(&server, 1200).await;

    // 08:35 New York time on 2024-01-01
    Mock::given(method("GET"))
        .and(path("/directions/json"))
        .and(query_param("departure_time", "1704116100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(directions_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (status, json) = post_json(
        app_for(&server),
        "/predict",
        r#"{
            "origin": "Penn Station",
            "destination": "JFK",
            "arrival_time": "2024-01-01T09:00",
            "time_zone": "America/New_York",
            "max_search_hours": 1,
            "step_minutes": 10,
            "buffer_minutes": 5
        }"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {json}");
    assert_eq!(json["recommended_departure_epoch"], 1_704_116_100);
    assert_eq!(json["recommended_departure_iso"], "2024-01-01T08:35:00-05:00");
    assert_eq!(json["estimated_arrival_iso"], "2024-01-01T08:55:00-05:00");
    assert_eq!(json["candidates_evaluated"], 3);
    assert_eq!(json["distance"], "12.4 km");
    assert_eq!(json["duration_in_traffic"], "20 mins");
    assert_eq!(json["summary"], "Old Airport Rd");
}

#[tokio::test]
async fn predict_with_no_feasible_departure_is_not_found() {
    let server = MockServer::start().await;
    mount_matrix(&server, 7200).await;

    let (status, json) = post_json(
        app_for(&server),
        "/predict",
        r#"{
            "origin": "Penn Station",
            "destination": "JFK",
            "arrival_time": "2024-01-01T09:00",
            "time_zone": "America/New_York",
            "max_search_hours": 1
        }"#,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], NO_DEPARTURE_MESSAGE);
}

#[tokio::test]
async fn predict_rejects_bad_input() {
    let server = MockServer::start().await;

    let (status, _) = post_json(
        app_for(&server),
        "/predict",
        r#"{ "origin": "A", "destination": "B", "arrival_time": "2024-01-01T09:00", "time_zone": "Mars/Olympus" }"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        app_for(&server),
        "/predict",
        r#"{ "origin": "A", "destination": "B", "arrival_time": "tomorrow morning" }"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        app_for(&server),
        "/predict",
        r#"{ "origin": "A", "destination": "B", "arrival_time": "2024-01-01T09:00", "step_minutes": 0 }"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = post_json(app_for(&server), "/predict", "{ not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

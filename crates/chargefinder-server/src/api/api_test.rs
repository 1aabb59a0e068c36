use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use chargefinder_core::{parse_document, EntityCatalog};
use chargefinder_places::PlacesClient;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::chargers::normalize_limit;
use super::*;

fn app_with(places: Option<Arc<PlacesClient>>, rate_limit: RateLimitState) -> Router {
    let catalog = Arc::new(EntityCatalog::bundled().expect("bundled catalog"));
    build_app(AppState::new(catalog, places), rate_limit)
}

fn app() -> Router {
    app_with(None, RateLimitState::new(1_000, Duration::from_secs(60)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, headers, json)
}

#[test]
fn normalize_limit_applies_defaults_and_bounds() {
    assert_eq!(normalize_limit(None, 12), 5);
    assert_eq!(normalize_limit(None, 3), 3);
    assert_eq!(normalize_limit(Some(0), 12), 0);
    assert_eq!(normalize_limit(Some(-4), 12), 0);
    assert_eq!(normalize_limit(Some(8), 12), 8);
    assert_eq!(normalize_limit(Some(1_000), 12), 12);
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("bad_request", StatusCode::BAD_REQUEST),
        ("not_found", StatusCode::NOT_FOUND),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("not_configured", StatusCode::INTERNAL_SERVER_ERROR),
        ("upstream_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[tokio::test]
async fn health_reports_healthy() {
    let (status, headers, json) = get(app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "healthy");
    assert_eq!(json["data"]["chargers"], 12);
    assert!(json["data"]["uptime_secs"].as_f64().is_some());
    assert!(headers.contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn request_id_is_echoed() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header(REQUEST_ID_HEADER, "req-abc")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-abc");
}

#[tokio::test]
async fn chargers_route_serves_catalog_document() {
    let response = app()
        .oneshot(Request::builder().uri("/api/chargers").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let text = std::str::from_utf8(&body).expect("utf8");

    let document = parse_document(text).expect("served body is a catalog document");
    assert_eq!(document.chargers.len(), 12);
    assert!(document.last_updated.is_some());
    assert!(text.contains("\"stalls\""));
    assert!(text.contains("\"lastUpdated\""));
}

#[tokio::test]
async fn chargers_route_keeps_catalog_last_updated() {
    let catalog = EntityCatalog::bundled().expect("bundled catalog");
    let stamp = catalog.last_updated().expect("bundled document is stamped");
    let app = build_app(
        AppState::new(Arc::new(catalog), None),
        RateLimitState::new(1_000, Duration::from_secs(60)),
    );
    let response = app
        .oneshot(Request::builder().uri("/api/chargers").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let document = parse_document(std::str::from_utf8(&body).expect("utf8")).expect("document");
    assert_eq!(document.last_updated, Some(stamp));
}

#[tokio::test]
async fn chargers_route_stamps_unstamped_catalog_with_now() {
    let before = chrono::Utc::now();
    let catalog = EntityCatalog::new(Vec::new()).expect("empty catalog");
    let app = build_app(
        AppState::new(Arc::new(catalog), None),
        RateLimitState::new(1_000, Duration::from_secs(60)),
    );
    let (status, _, json) = get(app, "/api/chargers").await;
    assert_eq!(status, StatusCode::OK);
    let served: chrono::DateTime<chrono::Utc> = json["lastUpdated"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("lastUpdated timestamp");
    assert!(served >= before);
}

#[tokio::test]
async fn nearest_requires_coordinates() {
    let (status, _, json) = get(app(), "/api/chargers/nearest?lat=35.6").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn nearest_rejects_malformed_coordinates() {
    let (status, _, json) = get(app(), "/api/chargers/nearest?lat=north&lng=139.7").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn nearest_defaults_to_five_sorted_results() {
    let (status, _, json) = get(app(), "/api/chargers/nearest?lat=35.6812&lng=139.7671").await;
    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 5);
    assert_eq!(data[0]["id"], "sc-tokyo-yaesu");
    assert_eq!(data[0]["distance"], 0.0);
    let distances: Vec<f64> = data.iter().map(|r| r["distance"].as_f64().unwrap()).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn nearest_limit_is_clamped_and_non_positive_is_empty() {
    let (_, _, json) = get(app(), "/api/chargers/nearest?lat=0&lng=0&limit=500").await;
    assert_eq!(json["data"].as_array().map(Vec::len), Some(12));

    let (status, _, json) = get(app(), "/api/chargers/nearest?lat=0&lng=0&limit=-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn charger_by_id() {
    let (status, _, json) = get(app(), "/api/chargers/sc-tokyo-daikanyama").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["stalls"], 4);

    let (status, _, json) = get(app(), "/api/chargers/sc-nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn places_requires_coordinates_before_configuration() {
    let (status, _, json) = get(app(), "/api/places/nearby?lng=139.7").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn places_without_key_is_not_configured() {
    let (status, _, json) = get(app(), "/api/places/nearby?lat=35.66&lng=139.73").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "not_configured");
}

#[tokio::test]
async fn places_proxies_upstream_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("location", "35.66,139.73"))
        .and(query_param("radius", "400"))
        .and(query_param("type", "cafe"))
        .and(query_param("key", "server-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [{
                "place_id": "p1",
                "name": "Cafe One",
                "vicinity": "Roppongi",
                "types": ["cafe"],
                "geometry": { "location": { "lat": 35.661, "lng": 139.731 } }
            }]
        })))
        .mount(&server)
        .await;

    let client = PlacesClient::with_base_url("server-key", 5, &server.uri()).expect("client");
    let app = app_with(
        Some(Arc::new(client)),
        RateLimitState::new(1_000, Duration::from_secs(60)),
    );
    let (status, _, json) = get(app, "/api/places/nearby?lat=35.66&lng=139.73&type=cafe").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
    assert_eq!(json["results"][0]["name"], "Cafe One");
}

#[tokio::test]
async fn places_upstream_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OVER_QUERY_LIMIT",
            "results": []
        })))
        .mount(&server)
        .await;

    let client = PlacesClient::with_base_url("server-key", 5, &server.uri()).expect("client");
    let app = app_with(
        Some(Arc::new(client)),
        RateLimitState::new(1_000, Duration::from_secs(60)),
    );
    let (status, _, json) = get(app, "/api/places/nearby?lat=35.66&lng=139.73").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "upstream_error");
    assert!(json["error"]["message"]
        .as_str()
        .is_some_and(|m| m.contains("OVER_QUERY_LIMIT")));
}

#[tokio::test]
async fn rate_limit_rejects_after_budget() {
    let app = app_with(None, RateLimitState::new(2, Duration::from_secs(60)));
    for _ in 0..2 {
        let (status, _, _) = get(app.clone(), "/api/chargers/sc-tokyo-yaesu").await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _, json) = get(app.clone(), "/api/chargers/sc-tokyo-yaesu").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["error"]["code"], "rate_limited");

    let (status, _, _) = get(app, "/api/health").await;
    assert_eq!(status, StatusCode::OK, "health is outside the limiter");
}

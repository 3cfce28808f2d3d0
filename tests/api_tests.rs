//! Listing endpoint tests driven through the full router

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use propcast::api::AppState;
use propcast::cache::Cache;
use propcast::models::Property;
use propcast::properties::PropertyStore;
use propcast::weather::{OpenMeteoClient, WeatherEnricher};
use propcast::web;

fn property(id: i64, name: &str, city: &str, lat: Option<f64>, lng: Option<f64>) -> Property {
    Property {
        id,
        name: name.to_string(),
        city: Some(city.to_string()),
        state: None,
        lat,
        lng,
        // Higher ids are newer, so pages come back in id order
        created_at: Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap()
            - chrono::Duration::minutes(id),
    }
}

fn test_app(server: &MockServer, dir: &TempDir, properties: Vec<Property>) -> Router {
    let cache = Cache::open(dir.path().join("cache")).unwrap();
    let client = OpenMeteoClient::new(server.uri(), Duration::from_secs(2)).unwrap();
    let enricher = WeatherEnricher::new(Arc::new(client), cache, Duration::from_secs(300), 5);
    let store = PropertyStore::from_properties(properties);
    web::app(Arc::new(AppState { store, enricher }))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn batch_response(entries: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "current": entries }))
}

#[tokio::test]
async fn health_endpoint_responds() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = test_app(&server, &dir, Vec::new());

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn listing_returns_enriched_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(batch_response(serde_json::json!([
            {"temperature_2m": 15.0, "relative_humidity_2m": 60.0, "weather_code": 1},
            {"temperature_2m": 28.0, "relative_humidity_2m": 30.0, "weather_code": 0}
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let app = test_app(
        &server,
        &dir,
        vec![
            property(1, "City Loft", "Munich", Some(48.1), Some(11.6)),
            property(2, "Harbour Studio", "Hamburg", Some(53.5), Some(9.9)),
        ],
    );

    let (status, body) = get_json(app, "/api/properties").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["count"], 2);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["id"], 1);
    assert_eq!(results[0]["weather"]["temperature"], 15.0);
    assert_eq!(results[0]["weather_description"], "Mainly clear");
    assert_eq!(results[1]["weather"]["weather_code"], 0);
}

#[tokio::test]
async fn range_filter_keeps_unknown_weather() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(batch_response(serde_json::json!([
            {"temperature_2m": 30.0, "relative_humidity_2m": 50.0, "weather_code": 0},
            {"temperature_2m": 12.0, "relative_humidity_2m": 55.0, "weather_code": 3}
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let app = test_app(
        &server,
        &dir,
        vec![
            property(1, "Hot Flat", "Seville", Some(37.4), Some(-5.98)),
            property(2, "Mild Flat", "Porto", Some(41.15), Some(-8.6)),
            property(3, "No Coords", "Leipzig", None, None),
        ],
    );

    let (status, body) = get_json(app, "/api/properties?temp_max=20").await;
    assert_eq!(status, StatusCode::OK);
    // The hot listing is filtered out; the listing with unknown weather
    // passes the range filter.
    assert_eq!(body["count"], 2);
    let ids: Vec<i64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 3]);
}

#[tokio::test]
async fn code_filter_drops_unknown_weather() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(batch_response(serde_json::json!([
            {"temperature_2m": 15.0, "relative_humidity_2m": 60.0, "weather_code": 1}
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let app = test_app(
        &server,
        &dir,
        vec![
            property(1, "Clear Flat", "Munich", Some(48.1), Some(11.6)),
            property(2, "No Coords", "Leipzig", None, None),
        ],
    );

    let (_, body) = get_json(app, "/api/properties?weather_codes=0,1,2").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["id"], 1);
}

#[tokio::test]
async fn search_text_narrows_the_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(batch_response(serde_json::json!(
            {"temperature_2m": 15.0, "relative_humidity_2m": 60.0, "weather_code": 1}
        )))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let app = test_app(
        &server,
        &dir,
        vec![
            property(1, "City Loft", "Munich", Some(48.1), Some(11.6)),
            property(2, "Harbour Studio", "Hamburg", Some(53.5), Some(9.9)),
        ],
    );

    let (_, body) = get_json(app, "/api/properties?search_text=munich").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "City Loft");
}

#[tokio::test]
async fn empty_page_skips_enrichment() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let app = test_app(
        &server,
        &dir,
        vec![property(1, "City Loft", "Munich", Some(48.1), Some(11.6))],
    );

    let (status, body) = get_json(app, "/api/properties?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 2);
    assert_eq!(body["count"], 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn provider_outage_still_serves_the_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let app = test_app(
        &server,
        &dir,
        vec![
            property(1, "City Loft", "Munich", Some(48.1), Some(11.6)),
            property(2, "Harbour Studio", "Hamburg", Some(53.5), Some(9.9)),
        ],
    );

    let (status, body) = get_json(app, "/api/properties").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    for result in body["results"].as_array().unwrap() {
        assert_eq!(result["weather"]["temperature"], Value::Null);
        assert_eq!(result["weather"]["humidity"], Value::Null);
        assert_eq!(result["weather"]["weather_code"], Value::Null);
    }
}

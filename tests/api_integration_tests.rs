//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint. Reference-data tests
//! run against a stub backend bound to an ephemeral local port.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use hms_forms::{api::create_router, cache::ManualClock, ApiClient, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

const TTL_MS: u64 = 60_000;

// == Helper Functions ==

fn create_test_app() -> Router {
    // Nothing listens on port 9; upstream calls fail fast
    let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    create_router(AppState::new(client, TTL_MS))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
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
    (status, body_to_json(response.into_body()).await)
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Stub Backend ==

async fn stub_resource(
    State(calls): State<Arc<AtomicUsize>>,
    Path(resource): Path<String>,
) -> (StatusCode, Json<Value>) {
    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
    match resource.as_str() {
        "wards" => (
            StatusCode::OK,
            Json(json!({"success": true, "data": [{"name": "Ward A", "call": n}]})),
        ),
        "archived" => (StatusCode::OK, Json(json!({"success": true, "data": null}))),
        "locked" => (
            StatusCode::OK,
            Json(json!({"success": false, "message": "Resource locked"})),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "No such resource"})),
        ),
    }
}

/// Starts the stub backend and returns its base URL and call counter.
async fn spawn_upstream() -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/api/:resource", get(stub_resource))
        .with_state(calls.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), calls)
}

async fn create_upstream_app() -> (Router, ManualClock, Arc<AtomicUsize>) {
    let (base_url, calls) = spawn_upstream().await;
    let clock = ManualClock::new(1_000);
    let client = ApiClient::new(base_url, Duration::from_secs(5)).unwrap();
    let state = AppState::new(client, TTL_MS).with_clock(Arc::new(clock.clone()));
    (create_router(state), clock, calls)
}

// == Validate Endpoint Tests ==

#[tokio::test]
async fn test_validate_valid_patient() {
    let (status, json) = post_json(
        create_test_app(),
        "/validate/patient",
        json!({
            "first_name": "  Asha ",
            "last_name": "Rao",
            "mobile": "9876543210",
            "age": 34,
            "gender": "Female"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], true);
    assert_eq!(json["errors"], json!({}));
    assert_eq!(json["values"]["first_name"], "Asha");
}

#[tokio::test]
async fn test_validate_reports_field_errors() {
    let (status, json) = post_json(
        create_test_app(),
        "/validate/patient",
        json!({"first_name": "Asha", "mobile": "12345", "age": 200}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], false);
    assert!(json["errors"]["mobile"].is_string());
    assert!(json["errors"]["age"].is_string());
    assert!(json["errors"]["last_name"].is_string());
    assert!(json["errors"].get("first_name").is_none());
}

#[tokio::test]
async fn test_validate_unknown_form() {
    let (status, json) = post_json(create_test_app(), "/validate/invoice", json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["kind"], "NOT_FOUND");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_validate_rejects_object_value() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/validate/patient")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"first_name": {"given": "Asha"}, "last_name": "Rao"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_reference_success_without_data() {
    let (app, _clock, calls) = create_upstream_app().await;

    let (status, json) = send(app.clone(), "GET", "/reference/archived").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "success");
    assert!(json["data"].is_null());
    assert!(json["error"].is_null());

    send(app, "GET", "/reference/archived").await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// == Screening Endpoint Tests ==

#[tokio::test]
async fn test_screen_conflict() {
    let (status, json) = post_json(
        create_test_app(),
        "/patients/screen",
        json!({
            "values": {
                "first_name": "Asha",
                "last_name": "Rao",
                "mobile": "9876543210",
                "age": 34,
                "gender": "Female"
            },
            "existing": [{
                "id": "P-7",
                "first_name": "Meera",
                "last_name": "Iyer",
                "mobile": "98765 43210"
            }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "conflict");
    assert_eq!(json["candidates"][0]["id"], "P-7");
    assert_eq!(json["candidates"][0]["reasons"], json!(["mobile"]));
}

#[tokio::test]
async fn test_screen_invalid() {
    let (status, json) = post_json(
        create_test_app(),
        "/patients/screen",
        json!({"values": {"first_name": "Asha"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "invalid");
    assert_eq!(json["result"]["is_valid"], false);
}

// == Reference Endpoint Tests ==

#[tokio::test]
async fn test_reference_is_cached_until_expiry() {
    let (app, clock, calls) = create_upstream_app().await;

    let (status, first) = send(app.clone(), "GET", "/reference/wards").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["state"], "success");
    assert_eq!(first["data"][0]["call"], 1);
    assert_eq!(first["last_fetched"], 1_000);

    // Within the window the cached entry is served
    clock.advance(TTL_MS - 1);
    let (_, second) = send(app.clone(), "GET", "/reference/wards").await;
    assert_eq!(second["data"][0]["call"], 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Once the entry is as old as the window it is refetched
    clock.advance(1);
    let (_, third) = send(app.clone(), "GET", "/reference/wards").await;
    assert_eq!(third["data"][0]["call"], 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let (_, stats) = send(app, "GET", "/stats").await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 2);
    assert_eq!(stats["expirations"], 1);
    assert_eq!(stats["total_entries"], 1);
}

#[tokio::test]
async fn test_reference_clear_forces_refetch() {
    let (app, _clock, calls) = create_upstream_app().await;

    send(app.clone(), "GET", "/reference/wards").await;
    let (status, cleared) = send(app.clone(), "DELETE", "/cache/wards").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["removed"], 1);

    send(app, "GET", "/reference/wards").await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_reference_upstream_not_found() {
    let (app, _clock, _calls) = create_upstream_app().await;

    let (status, json) = send(app.clone(), "GET", "/reference/beds").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "error");
    assert_eq!(json["error"], "The requested resource was not found.");
    assert!(json["data"].is_null());

    let (_, stats) = send(app, "GET", "/stats").await;
    assert_eq!(stats["total_entries"], 0);
}

#[tokio::test]
async fn test_reference_tagged_failure_is_not_cached() {
    let (app, _clock, calls) = create_upstream_app().await;

    let (_, json) = send(app.clone(), "GET", "/reference/locked").await;
    assert_eq!(json["state"], "error");
    assert_eq!(json["error"], "Server error. Please try again later.");

    send(app, "GET", "/reference/locked").await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_reference_rejects_bad_resource_name() {
    let (status, json) = send(create_test_app(), "GET", "/reference/bad.name").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "VALIDATION_ERROR");
    assert_eq!(json["field"], "resource");
}

// == Utility Endpoint Tests ==

#[tokio::test]
async fn test_schemas_endpoint() {
    let (status, json) = send(create_test_app(), "GET", "/schemas").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json["schemas"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(names.contains(&"patient"));
    assert!(names.contains(&"appointment"));
}

#[tokio::test]
async fn test_clear_all_on_empty_cache() {
    let (status, json) = send(create_test_app(), "DELETE", "/cache").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = send(create_test_app(), "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

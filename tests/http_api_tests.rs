use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use cartlist::{AppState, InMemoryStore, ItemStore, JsonFileStore, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

const ORIGIN: &str = "http://localhost:5173";

fn app_with(store: Arc<dyn ItemStore>) -> axum::Router {
    build_router(AppState::new(store), &[ORIGIN.to_string()])
}

fn app() -> (axum::Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    (app_with(store.clone()), store)
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("response expected");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");

    if body.is_empty() {
        return (status, Value::Null);
    }

    let json = serde_json::from_slice::<Value>(&body).expect("body should be valid JSON");
    (status, json)
}

async fn send_json(
    app: &axum::Router,
    method: Method,
    uri: &str,
    payload: Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request should build");
    send(app, request).await
}

async fn send_empty(app: &axum::Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

async fn create(app: &axum::Router, payload: Value) -> Value {
    let (status, body) = send_json(app, Method::POST, "/api/items", payload).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app();
    let (status, body) = send_empty(&app, Method::GET, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn create_normalizes_and_mints_unique_ids() {
    let (app, _) = app();

    let first = create(
        &app,
        json!({ "name": "  Milk ", "quantity": "2", "category": " Dairy ", "note": " 2% " }),
    )
    .await;
    assert_eq!(first["name"], "Milk");
    assert_eq!(first["quantity"], 2);
    assert_eq!(first["category"], "Dairy");
    assert_eq!(first["note"], "2%");

    let second = create(&app, json!({ "name": "Bread", "quantity": -4 })).await;
    assert_eq!(second["quantity"], 1);
    assert_eq!(second["category"], "General");
    assert_eq!(second["note"], "");

    let first_id = first["id"].as_str().expect("id should be a string");
    let second_id = second["id"].as_str().expect("id should be a string");
    assert!(!first_id.is_empty());
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn blank_name_is_rejected_without_touching_the_store() {
    let (app, store) = app();
    create(&app, json!({ "name": "Milk" })).await;

    for payload in [json!({}), json!({ "name": "   " }), json!({ "name": 5 })] {
        let (status, body) = send_json(&app, Method::POST, "/api/items", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Name is required" }));
    }

    let (status, body) = send_empty(&app, Method::POST, "/api/items").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");

    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let (app, _) = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/items")
        .header("content-type", "application/json")
        .body(Body::from("{ \"name\": "))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON body");
}

#[tokio::test]
async fn created_item_appears_exactly_once_in_list() {
    let (app, _) = app();
    create(&app, json!({ "name": "Eggs" })).await;
    let created = create(&app, json!({ "name": "Milk", "quantity": 3 })).await;

    let (status, list) = send_empty(&app, Method::GET, "/api/items").await;
    assert_eq!(status, StatusCode::OK);

    let matches: Vec<&Value> = list
        .as_array()
        .expect("list should be an array")
        .iter()
        .filter(|item| item["id"] == created["id"])
        .collect();
    assert_eq!(matches, vec![&created]);
    assert_eq!(list[0]["name"], "Eggs");
    assert_eq!(list[1]["name"], "Milk");
}

#[tokio::test]
async fn partial_update_leaves_other_fields_untouched() {
    let (app, _) = app();
    let created = create(
        &app,
        json!({ "name": "Milk", "quantity": 2, "category": "Dairy", "note": "whole" }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send_json(
        &app,
        Method::PUT,
        &format!("/api/items/{id}"),
        json!({ "note": " skimmed " }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["note"], "skimmed");
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["name"], created["name"]);
    assert_eq!(updated["quantity"], created["quantity"]);
    assert_eq!(updated["category"], created["category"]);
}

#[tokio::test]
async fn invalid_update_values_keep_prior_values() {
    let (app, _) = app();
    let created = create(&app, json!({ "name": "Milk", "quantity": 4 })).await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send_json(
        &app,
        Method::PUT,
        &format!("/api/items/{id}"),
        json!({ "name": "   ", "quantity": "lots", "category": 12 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Milk");
    assert_eq!(updated["quantity"], 4);
    assert_eq!(updated["category"], "12");
}

#[tokio::test]
async fn repeated_put_is_idempotent() {
    let (app, store) = app();
    let created = create(&app, json!({ "name": "Milk" })).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/items/{id}");
    let payload = json!({ "name": "Oat milk", "quantity": 2, "category": "Dairy" });

    let (_, first) = send_json(&app, Method::PUT, &uri, payload.clone()).await;
    let stored_after_first = store.list().await.unwrap();
    let (_, second) = send_json(&app, Method::PUT, &uri, payload).await;
    let stored_after_second = store.list().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(stored_after_first, stored_after_second);
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let (app, _) = app();
    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/api/items/missing",
        json!({ "name": "Ghost" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Item not found" }));
}

#[tokio::test]
async fn delete_returns_removed_item() {
    let (app, store) = app();
    let created = create(&app, json!({ "name": "Milk" })).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send_empty(&app, Method::DELETE, &format!("/api/items/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["removed"], created);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_unknown_id_keeps_collection_length() {
    let (app, store) = app();
    create(&app, json!({ "name": "Milk" })).await;
    create(&app, json!({ "name": "Bread" })).await;

    let (status, body) = send_empty(&app, Method::DELETE, "/api/items/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Item not found");
    assert_eq!(store.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn cors_allows_listed_origins_only() {
    let (app, _) = app();

    let allowed = Request::builder()
        .method(Method::GET)
        .uri("/api/items")
        .header(header::ORIGIN, ORIGIN)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(allowed).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some(ORIGIN)
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|value| value.to_str().ok()),
        Some("true")
    );

    let denied = Request::builder()
        .method(Method::GET)
        .uri("/api/items")
        .header(header::ORIGIN, "https://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(denied).await.unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );

    let (status, _) = send_empty(&app, Method::GET, "/api/items").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn file_backed_router_persists_between_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("items.json");

    let app = app_with(Arc::new(JsonFileStore::new(&path)));
    let created = create(&app, json!({ "name": "Milk", "quantity": 2 })).await;

    let reopened = app_with(Arc::new(JsonFileStore::new(&path)));
    let (status, list) = send_empty(&reopened, Method::GET, "/api/items").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([created]));
}

#[tokio::test]
async fn wildcard_origin_is_ignored_by_the_router() {
    let store: Arc<dyn ItemStore> = Arc::new(InMemoryStore::new());
    let app = build_router(
        AppState::new(store),
        &["*".to_string(), ORIGIN.to_string()],
    );

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/health")
        .header(header::ORIGIN, ORIGIN)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some(ORIGIN)
    );
}

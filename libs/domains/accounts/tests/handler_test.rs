//! CRUD lifecycle over the HTTP surface, backed by in-memory storage.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use domain_accounts::{Admin, InMemoryStorage, User, handlers};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::{TestDataBuilder, assertions::assert_object_id};
use tower::ServiceExt;

/// Nested the way the application nests it.
fn app() -> Router {
    Router::new()
        .nest("/users", handlers::router::<User, _>(InMemoryStorage::<User>::new()))
        .nest("/admins", handlers::router::<Admin, _>(InMemoryStorage::<Admin>::new()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let body = body.map_or_else(Body::empty, |v| Body::from(v.to_string()));
    send_body(app, method, uri, body).await
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: &'static str) -> (StatusCode, String) {
    send_body(app, method, uri, Body::from(body)).await
}

async fn send_body(app: &Router, method: &str, uri: &str, body: Body) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn account(builder: &TestDataBuilder, name: &str) -> Value {
    json!({
        "email": builder.email(name),
        "username": builder.username(name),
        "passwordHash": builder.password_hash(name),
    })
}

async fn create(app: &Router, collection: &str, payload: Value) -> String {
    let (status, body) = send(app, "POST", collection, Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");

    let created: Value = serde_json::from_str(&body).unwrap();
    created["id"].as_str().unwrap().to_string()
}

async fn get(app: &Router, uri: &str) -> Value {
    let (status, body) = send(app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK, "get failed: {body}");
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn test_create_then_get_round_trips_fields() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_create_then_get_round_trips_fields");
    let payload = account(&builder, "ann");

    let id = create(&app, "/users", payload.clone()).await;
    assert_object_id(&id, "created user id");

    let fetched = get(&app, &format!("/users/{id}")).await;
    assert_eq!(fetched["id"], id);
    assert_eq!(fetched["email"], payload["email"]);
    assert_eq!(fetched["username"], payload["username"]);
    assert_eq!(fetched["passwordHash"], payload["passwordHash"]);
}

#[tokio::test]
async fn test_creates_return_distinct_ids() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_creates_return_distinct_ids");

    let first = create(&app, "/users", account(&builder, "ann")).await;
    let second = create(&app, "/users", account(&builder, "ann")).await;
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_create_with_missing_field_is_404_and_not_persisted() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_create_with_missing_field");

    for field in ["email", "username", "passwordHash"] {
        let mut payload = account(&builder, "ann");
        payload[field] = json!("");

        let (status, body) = send(&app, "POST", "/users", Some(payload)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "missing required fields");
    }

    assert_eq!(get(&app, "/users").await, json!([]));
}

#[tokio::test]
async fn test_malformed_body_is_internal_error() {
    let app = app();
    let request = Request::post("/users")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"internal server error");
}

#[tokio::test]
async fn test_array_body_is_rejected_and_nothing_changes() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_array_body_is_rejected");

    let (status, body) = send_raw(&app, "POST", "/users", r#"["client-id","a@b.c","ann","h1"]"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "internal server error");
    assert_eq!(get(&app, "/users").await, json!([]));

    let before = account(&builder, "ann");
    let id = create(&app, "/users", before.clone()).await;

    let (status, body) = send_raw(&app, "PUT", &format!("/users/{id}"), "[]").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "internal server error");

    let fetched = get(&app, &format!("/users/{id}")).await;
    assert_eq!(fetched["email"], before["email"]);
    assert_eq!(fetched["username"], before["username"]);
    assert_eq!(fetched["passwordHash"], before["passwordHash"]);
}

#[tokio::test]
async fn test_null_body_on_create_is_missing_fields() {
    let app = app();

    let (status, body) = send_raw(&app, "POST", "/users", "null").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "missing required fields");
    assert_eq!(get(&app, "/users").await, json!([]));
}

#[tokio::test]
async fn test_get_unknown_or_malformed_id_is_404() {
    let app = app();

    for id in ["65a1f0c2e4b0a1b2c3d4e5f6", "not-an-object-id"] {
        let (status, body) = send(&app, "GET", &format!("/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "resource not found");
    }
}

#[tokio::test]
async fn test_full_update_blanks_absent_fields() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_full_update_blanks_absent_fields");
    let id = create(&app, "/users", account(&builder, "ann")).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{id}"),
        Some(json!({ "email": "x@example.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let fetched = get(&app, &format!("/users/{id}")).await;
    assert_eq!(fetched["email"], "x@example.test");
    assert_eq!(fetched["username"], "");
    assert_eq!(fetched["passwordHash"], "");
}

#[tokio::test]
async fn test_partial_update_keeps_absent_fields() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_partial_update_keeps_absent_fields");
    let before = account(&builder, "ann");
    let id = create(&app, "/users", before.clone()).await;

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/users/{id}"),
        Some(json!({ "username": "renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let fetched = get(&app, &format!("/users/{id}")).await;
    assert_eq!(fetched["username"], "renamed");
    assert_eq!(fetched["email"], before["email"]);
    assert_eq!(fetched["passwordHash"], before["passwordHash"]);
}

#[tokio::test]
async fn test_partial_update_with_empty_payload_changes_nothing() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_partial_update_with_empty_payload");
    let before = account(&builder, "ann");
    let id = create(&app, "/users", before.clone()).await;

    let (status, _) = send(&app, "PATCH", &format!("/users/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let fetched = get(&app, &format!("/users/{id}")).await;
    assert_eq!(fetched["email"], before["email"]);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_delete_is_idempotent");
    let id = create(&app, "/users", account(&builder, "ann")).await;

    for _ in 0..2 {
        let (status, body) = send(&app, "DELETE", &format!("/users/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    let (status, _) = send(&app, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_uppercase_id_reaches_the_same_entity() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_uppercase_id_reaches_the_same_entity");
    let id = create(&app, "/users", account(&builder, "ann")).await;
    let upper = id.to_ascii_uppercase();

    let fetched = get(&app, &format!("/users/{upper}")).await;
    assert_eq!(fetched["id"], id);

    let (status, _) = send(&app, "DELETE", &format!("/users/{upper}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(get(&app, "/users").await, json!([]));
}

#[tokio::test]
async fn test_delete_with_malformed_id_is_404() {
    let app = app();

    let (status, body) = send(&app, "DELETE", "/users/xyz", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "invalid identifier format");
}

#[tokio::test]
async fn test_list_returns_every_entity() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_list_returns_every_entity");

    let ann = create(&app, "/users", account(&builder, "ann")).await;
    let bob = create(&app, "/users", account(&builder, "bob")).await;

    let listed = get(&app, "/users").await;
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, [ann.as_str(), bob.as_str()]);
}

#[tokio::test]
async fn test_users_and_admins_are_separate_collections() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("test_users_and_admins_are_separate");

    let admin_id = create(&app, "/admins", account(&builder, "root")).await;

    assert_eq!(get(&app, "/users").await, json!([]));
    assert_eq!(get(&app, &format!("/admins/{admin_id}")).await["username"], builder.username("root"));

    let (status, _) = send(&app, "GET", &format!("/users/{admin_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

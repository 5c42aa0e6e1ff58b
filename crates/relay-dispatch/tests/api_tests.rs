//! API Surface Tests
//!
//! End-to-end tests driving the axum router directly: registration,
//! listing, ping fan-out, notification, and validation error mapping.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relay_dispatch::{api::create_router, Dispatcher, HttpTransport};
use relay_registry::{Registry, SubscriptionStore};

fn create_app() -> Router {
    let store = Arc::new(SubscriptionStore::new());
    let registry = Registry::new(store.clone());
    let dispatcher = Arc::new(Dispatcher::new(store, Arc::new(HttpTransport::new())));
    create_router(registry, dispatcher)
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_list_ping_unregister_roundtrip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_app();
    let webhook_url = format!("{}/wh", mock_server.uri());

    // Register
    let response = app
        .clone()
        .oneshot(json_post(
            "/register-webhook",
            serde_json::json!({"url": webhook_url, "events": ["payment_received"]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Webhook registered successfully");

    // List
    let response = app.clone().oneshot(get("/registered-webhooks")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let webhooks = body["webhooks"].as_array().unwrap();
    assert_eq!(webhooks.len(), 1);
    assert_eq!(webhooks[0]["url"], webhook_url);
    assert_eq!(webhooks[0]["events"], serde_json::json!(["payment_received"]));
    assert!(webhooks[0]["id"].is_string());
    assert!(webhooks[0]["created_at"].is_string());

    // Ping
    let response = app.clone().oneshot(get("/ping?testPayload=T")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Ping sent to all registered webhooks for all events with payload: T"
    );
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["url"], webhook_url);
    assert_eq!(results[0]["event"], "payment_received");
    assert_eq!(results[0]["status"], 200);

    // Unregister
    let response = app
        .clone()
        .oneshot(json_post(
            "/unregister-webhook",
            serde_json::json!({"url": webhook_url}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // List again: empty
    let response = app.oneshot(get("/registered-webhooks")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["webhooks"], serde_json::json!([]));
}

#[tokio::test]
async fn test_register_missing_url_returns_400() {
    let app = create_app();

    let response = app
        .oneshot(json_post(
            "/register-webhook",
            serde_json::json!({"events": ["a"]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_missing_events_returns_400() {
    let app = create_app();

    let response = app
        .oneshot(json_post(
            "/register-webhook",
            serde_json::json!({"url": "https://example.com/wh"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_events_not_an_array_returns_400() {
    let app = create_app();

    let response = app
        .clone()
        .oneshot(json_post(
            "/register-webhook",
            serde_json::json!({"url": "https://example.com/wh", "events": "payment_received"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Store must be unchanged
    let response = app.oneshot(get("/registered-webhooks")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["webhooks"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unregister_missing_url_returns_400() {
    let app = create_app();

    let response = app
        .oneshot(json_post("/unregister-webhook", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Validation error: URL is required");
}

#[tokio::test]
async fn test_unregister_unknown_url_returns_200() {
    let app = create_app();

    let response = app
        .oneshot(json_post(
            "/unregister-webhook",
            serde_json::json!({"url": "https://never-registered.example"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_send_notification_missing_message_returns_400() {
    let app = create_app();

    let response = app
        .oneshot(json_post("/send-notification", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_notification_delivers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_app();
    let webhook_url = format!("{}/wh", mock_server.uri());

    app.clone()
        .oneshot(json_post(
            "/register-webhook",
            serde_json::json!({"url": webhook_url, "events": []}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(json_post(
            "/send-notification",
            serde_json::json!({"message": "Payment of $100 received"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Notification sent to all registered webhooks");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0]["event"].is_null());
    assert_eq!(results[0]["status"], 200);
}

#[tokio::test]
async fn test_ping_uses_default_payload() {
    let app = create_app();

    let response = app.oneshot(get("/ping")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Ping sent to all registered webhooks for all events with payload: Default Ping Payload"
    );
    assert_eq!(body["results"], serde_json::json!([]));
}

#[tokio::test]
async fn test_ping_reports_failures_with_200() {
    let app = create_app();

    app.clone()
        .oneshot(json_post(
            "/register-webhook",
            serde_json::json!({"url": "http://127.0.0.1:9/dead", "events": ["a"]}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/ping?testPayload=T")).await.unwrap();

    // Delivery failure is captured in the body, not the status
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0]["error"].is_string());
    assert!(results[0].get("status").is_none());
}

#[tokio::test]
async fn test_health() {
    let app = create_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "UP");
}

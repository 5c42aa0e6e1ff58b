//! Relay HTTP API
//!
//! Thin request handlers translating inbound calls into registry and
//! dispatcher operations:
//! - Webhook registration / unregistration / listing
//! - Notification fan-out
//! - Liveness pings
//! - Health check and OpenAPI docs
//!
//! Malformed requests fail with a 400 before any mutation or dispatch; a
//! dispatch whose individual deliveries fail still returns 200 with the
//! failures captured in the response body.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use relay_common::RelayError;
use relay_registry::Registry;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{Dispatcher, DEFAULT_PING_PAYLOAD};

pub mod model;

use model::{
    DispatchResponse, ErrorResponse, HealthResponse, MessageResponse, PingQuery,
    RegisterWebhookRequest, SendNotificationRequest, UnregisterWebhookRequest,
    WebhookListResponse,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
    pub dispatcher: Arc<Dispatcher>,
}

/// API-boundary error wrapper mapping domain errors onto HTTP responses
pub struct ApiError(pub RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self.0 {
            RelayError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            RelayError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
            RelayError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Relay Webhook API",
        version = "0.1.0",
        description = "API to register, unregister, and send notifications to webhooks"
    ),
    paths(
        register_webhook,
        unregister_webhook,
        registered_webhooks,
        send_notification,
        ping,
        health,
    ),
    components(schemas(
        RegisterWebhookRequest,
        UnregisterWebhookRequest,
        SendNotificationRequest,
        MessageResponse,
        WebhookListResponse,
        DispatchResponse,
        ErrorResponse,
        HealthResponse,
        relay_common::Subscription,
        relay_common::DeliveryOutcome,
    )),
    tags(
        (name = "webhooks", description = "Webhook registration and delivery"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Create the full router with all endpoints
pub fn create_router(registry: Registry, dispatcher: Arc<Dispatcher>) -> Router {
    let state = AppState {
        registry,
        dispatcher,
    };

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Webhook registry
        .route("/register-webhook", post(register_webhook))
        .route("/unregister-webhook", post(unregister_webhook))
        .route("/registered-webhooks", get(registered_webhooks))
        // Delivery
        .route("/send-notification", post(send_notification))
        .route("/ping", get(ping))
        // Health
        .route("/health", get(health))
        .with_state(state)
}

/// Coerce the raw `events` value into an event list.
///
/// Returns `None` for anything that is not an array of strings, which the
/// registry rejects as a validation error.
fn parse_events(events: Option<serde_json::Value>) -> Option<Vec<String>> {
    match events? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

/// Register a webhook URL to listen for specific events
#[utoipa::path(
    post,
    path = "/register-webhook",
    tag = "webhooks",
    request_body = RegisterWebhookRequest,
    responses(
        (status = 200, description = "Webhook registered successfully", body = MessageResponse),
        (status = 400, description = "URL missing or events not an array", body = ErrorResponse)
    )
)]
async fn register_webhook(
    State(state): State<AppState>,
    Json(req): Json<RegisterWebhookRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let events = parse_events(req.events);
    state.registry.register(req.url, events, req.description)?;

    Ok(Json(MessageResponse {
        message: "Webhook registered successfully".to_string(),
    }))
}

/// Remove a previously registered webhook by its URL
#[utoipa::path(
    post,
    path = "/unregister-webhook",
    tag = "webhooks",
    request_body = UnregisterWebhookRequest,
    responses(
        (status = 200, description = "Webhook unregistered successfully", body = MessageResponse),
        (status = 400, description = "URL is required", body = ErrorResponse)
    )
)]
async fn unregister_webhook(
    State(state): State<AppState>,
    Json(req): Json<UnregisterWebhookRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.registry.unregister(req.url)?;

    Ok(Json(MessageResponse {
        message: "Webhook unregistered successfully".to_string(),
    }))
}

/// Get all registered webhooks
#[utoipa::path(
    get,
    path = "/registered-webhooks",
    tag = "webhooks",
    responses(
        (status = 200, description = "List of registered webhooks", body = WebhookListResponse)
    )
)]
async fn registered_webhooks(State(state): State<AppState>) -> Json<WebhookListResponse> {
    Json(WebhookListResponse {
        webhooks: state.registry.list(),
    })
}

/// Send a notification to all registered webhooks
#[utoipa::path(
    post,
    path = "/send-notification",
    tag = "webhooks",
    request_body = SendNotificationRequest,
    responses(
        (status = 200, description = "Notification sent to all registered webhooks", body = DispatchResponse),
        (status = 400, description = "Message is required", body = ErrorResponse)
    )
)]
async fn send_notification(
    State(state): State<AppState>,
    Json(req): Json<SendNotificationRequest>,
) -> Result<Json<DispatchResponse>, ApiError> {
    let results = state.dispatcher.notify(req.message.as_deref()).await?;

    Ok(Json(DispatchResponse {
        message: "Notification sent to all registered webhooks".to_string(),
        results,
    }))
}

/// Ping all registered webhooks with a test payload
#[utoipa::path(
    get,
    path = "/ping",
    tag = "webhooks",
    params(PingQuery),
    responses(
        (status = 200, description = "Ping sent to all registered webhooks", body = DispatchResponse)
    )
)]
async fn ping(
    State(state): State<AppState>,
    Query(query): Query<PingQuery>,
) -> Json<DispatchResponse> {
    let test_payload = query
        .test_payload
        .as_deref()
        .unwrap_or(DEFAULT_PING_PAYLOAD);

    let results = state.dispatcher.ping(test_payload).await;

    Json(DispatchResponse {
        message: format!(
            "Ping sent to all registered webhooks for all events with payload: {}",
            test_payload
        ),
        results,
    })
}

/// Basic health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

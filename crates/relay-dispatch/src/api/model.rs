use relay_common::{DeliveryOutcome, Subscription};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Request to register a webhook.
///
/// Required fields are `Option` on purpose: presence is a validation
/// concern owned by the registry, surfaced as a 400, not a framework-level
/// deserialization rejection.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterWebhookRequest {
    /// The URL where webhooks will be sent
    pub url: Option<String>,
    /// Event types to subscribe to (empty = all events). Kept as raw JSON
    /// so a non-array value becomes a 400, not a deserialization rejection.
    #[schema(value_type = Option<Vec<String>>)]
    pub events: Option<serde_json::Value>,
    /// Optional description for the webhook
    pub description: Option<String>,
}

/// Request to unregister a webhook by url
#[derive(Debug, Deserialize, ToSchema)]
pub struct UnregisterWebhookRequest {
    /// The URL of the webhook to unregister
    pub url: Option<String>,
}

/// Request to send a notification to all registered webhooks
#[derive(Debug, Deserialize, ToSchema)]
pub struct SendNotificationRequest {
    /// The message content to send to webhooks
    pub message: Option<String>,
}

/// Query parameters for the ping endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PingQuery {
    /// Optional test payload for the ping request
    #[serde(rename = "testPayload")]
    pub test_payload: Option<String>,
}

/// Simple confirmation response
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// List of registered webhooks
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookListResponse {
    pub webhooks: Vec<Subscription>,
}

/// Aggregate result of a fan-out dispatch.
///
/// Always returned with HTTP 200: failed delivery attempts are values in
/// `results`, not call failures.
#[derive(Debug, Serialize, ToSchema)]
pub struct DispatchResponse {
    pub message: String,
    pub results: Vec<DeliveryOutcome>,
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Basic health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status: UP
    pub status: String,
    /// Application version
    pub version: String,
}

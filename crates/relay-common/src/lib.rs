use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod logging;

// ============================================================================
// Core Domain Types
// ============================================================================

/// A registered webhook subscription.
///
/// The `url` is treated as an opaque key: it is the effective removal key for
/// unregistration and is never parsed or validated as a URI here. An empty
/// `events` list means the subscriber receives every dispatch unconditionally.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Subscription {
    /// Unique identifier, assigned at registration
    pub id: String,
    /// Destination endpoint for deliveries
    pub url: String,
    /// Event types the subscriber listens to (empty = all events)
    pub events: Vec<String>,
    /// Optional free-text annotation, no behavioral effect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(
        url: impl Into<String>,
        events: Vec<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: url.into(),
            events,
            description,
            created_at: Utc::now(),
        }
    }

    /// Resolve the fan-out list for this subscription: one entry per event,
    /// or a single `None` entry when no events are configured.
    pub fn delivery_events(&self) -> Vec<Option<&str>> {
        if self.events.is_empty() {
            vec![None]
        } else {
            self.events.iter().map(|e| Some(e.as_str())).collect()
        }
    }
}

/// Result of a single delivery attempt.
///
/// Exactly one of `status` / `error` is populated: `status` when the endpoint
/// produced an HTTP response (any status code), `error` when the attempt
/// failed before a response arrived (connection error, timeout).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliveryOutcome {
    /// Destination the attempt was sent to
    pub url: String,
    /// Event the attempt carried (null when the subscription has no events)
    pub event: Option<String>,
    /// HTTP status code returned by the endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Failure description when no response was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn response(url: impl Into<String>, event: Option<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            event,
            status: Some(status),
            error: None,
        }
    }

    pub fn failure(url: impl Into<String>, event: Option<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            event,
            status: None,
            error: Some(error.into()),
        }
    }

    /// Whether the endpoint acknowledged the delivery with a 2xx response
    pub fn is_success(&self) -> bool {
        self.status.is_some_and(|s| (200..300).contains(&s))
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RelayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
